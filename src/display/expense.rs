//! Expense display formatting
//!
//! Table and detail views for expenses, plus the budget summary.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::config::Settings;
use crate::models::Expense;
use crate::services::BudgetSummary;

use super::report::truncate;

const DESCRIPTION_WIDTH: usize = 32;

/// One table row
#[derive(Tabled)]
struct ExpenseRow {
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Tags")]
    tags: String,
}

impl ExpenseRow {
    fn new(expense: &Expense, settings: &Settings) -> Self {
        Self {
            id: expense.id().map(|id| id.to_string()).unwrap_or_default(),
            date: format_date(expense, settings),
            description: truncate(expense.description(), DESCRIPTION_WIDTH),
            amount: settings.format_amount(expense.amount()),
            tags: expense.tags().join(", "),
        }
    }
}

fn format_date(expense: &Expense, settings: &Settings) -> String {
    expense
        .timestamp()
        .with_timezone(&chrono::Local)
        .format(&settings.date_format)
        .to_string()
}

/// Format a list of expenses as a table, followed by the total
pub fn format_expense_table(expenses: &[Expense], settings: &Settings) -> String {
    if expenses.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let rows: Vec<ExpenseRow> = expenses
        .iter()
        .map(|e| ExpenseRow::new(e, settings))
        .collect();
    let total: f64 = expenses.iter().map(Expense::amount).sum();

    let mut output = Table::new(rows).with(Style::psql()).to_string();
    output.push('\n');
    output.push_str(&format!(
        "{} expense(s), total {}\n",
        expenses.len(),
        settings.format_amount(total)
    ));
    output
}

/// Format expense details for display
pub fn format_expense_details(expense: &Expense, settings: &Settings) -> String {
    let mut output = String::new();

    if let Some(id) = expense.id() {
        output.push_str(&format!("Expense: {}\n", id));
    }
    output.push_str(&format!("Description: {}\n", expense.description()));
    output.push_str(&format!("Amount:      {}\n", settings.format_amount(expense.amount())));
    output.push_str(&format!("Date:        {}\n", format_date(expense, settings)));

    if expense.tags().is_empty() {
        output.push_str("Tags:        (none)\n");
    } else {
        output.push_str("Tags:\n");
        for tag in expense.tags() {
            output.push_str(&format!("  - {}\n", tag));
        }
    }

    output
}

/// Format the budget, total spent and remaining balance
pub fn format_budget_summary(summary: &BudgetSummary, settings: &Settings) -> String {
    let mut output = String::new();
    output.push_str(&format!("Budget:   {:>14}\n", settings.format_amount(summary.budget)));
    output.push_str(&format!("Spent:    {:>14}\n", settings.format_amount(summary.total)));
    output.push_str(&format!("Balance:  {:>14}\n", settings.format_amount(summary.balance)));
    if summary.balance < 0.0 {
        output.push_str("Over budget!\n");
    }
    output
}
