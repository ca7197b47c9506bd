//! Expense CLI commands
//!
//! Implements CLI commands for recording, listing, editing and tagging
//! expenses.

use clap::{Args, Subcommand};

use crate::config::Settings;
use crate::display::{format_expense_details, format_expense_table};
use crate::error::{ExpenseError, ExpenseResult};
use crate::ledger::ExpenseFilter;
use crate::models::parse_date_like;
use crate::services::{CreateExpenseInput, ExpenseService, UpdateExpenseInput};
use crate::storage::Storage;

/// Criteria shared by every command that selects expenses
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Earliest date (inclusive)
    #[arg(long)]
    pub from: Option<String>,
    /// Latest date (inclusive)
    #[arg(long)]
    pub to: Option<String>,
    /// Minimum amount (inclusive)
    #[arg(long)]
    pub min: Option<f64>,
    /// Maximum amount (inclusive)
    #[arg(long)]
    pub max: Option<f64>,
    /// Case-insensitive text the description must contain
    #[arg(short, long)]
    pub search: Option<String>,
    /// Keep expenses carrying any of these tags (repeatable or comma-separated)
    #[arg(short, long = "tag", value_delimiter = ',')]
    pub tags: Vec<String>,
}

fn check_date(label: &str, value: &str) -> ExpenseResult<()> {
    match parse_date_like(value) {
        Some(_) => Ok(()),
        None => Err(ExpenseError::Validation(format!(
            "Invalid {} date: '{}'. Use YYYY-MM-DD",
            label, value
        ))),
    }
}

impl FilterArgs {
    /// Build the ledger filter, rejecting dates that do not parse
    pub fn to_filter(&self) -> ExpenseResult<ExpenseFilter> {
        let mut filter = ExpenseFilter::new();

        if let Some(from) = &self.from {
            check_date("start", from)?;
            filter = filter.date_from(from);
        }
        if let Some(to) = &self.to {
            check_date("end", to)?;
            filter = filter.date_to(to);
        }
        if let Some(min) = self.min {
            filter = filter.min_amount(min);
        }
        if let Some(max) = self.max {
            filter = filter.max_amount(max);
        }
        if let Some(search) = &self.search {
            filter = filter.description_contains(search.clone());
        }
        if !self.tags.is_empty() {
            filter = filter.any_tag(self.tags.iter().cloned());
        }

        Ok(filter)
    }
}

/// Expense subcommands
#[derive(Subcommand, Debug)]
pub enum ExpenseCommands {
    /// Record a new expense
    Add {
        /// What the money was spent on
        description: String,
        /// Amount spent
        #[arg(allow_negative_numbers = true)]
        amount: f64,
        /// Date of the expense (YYYY-MM-DD or RFC 3339), defaults to now
        #[arg(short, long)]
        date: Option<String>,
        /// Tags (repeatable or comma-separated)
        #[arg(short, long = "tag", value_delimiter = ',')]
        tags: Vec<String>,
    },
    /// List expenses
    List {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Show expense details
    Show {
        /// Expense ID (e.g. exp-3 or 3)
        id: String,
    },
    /// Edit an expense
    Edit {
        /// Expense ID
        id: String,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// New amount
        #[arg(short, long, allow_negative_numbers = true)]
        amount: Option<f64>,
        /// New date
        #[arg(short, long)]
        date: Option<String>,
        /// Replace all tags (comma-separated)
        #[arg(long, value_delimiter = ',')]
        tags: Option<Vec<String>>,
    },
    /// Delete an expense
    #[command(alias = "rm")]
    Delete {
        /// Expense ID
        id: String,
    },
    /// Add tags to an expense
    Tag {
        /// Expense ID
        id: String,
        /// Tags to add
        #[arg(required = true)]
        tags: Vec<String>,
    },
    /// Remove tags from an expense
    Untag {
        /// Expense ID
        id: String,
        /// Tags to remove
        #[arg(required = true)]
        tags: Vec<String>,
    },
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> ExpenseResult<()> {
    let service = ExpenseService::new(storage);

    match cmd {
        ExpenseCommands::Add {
            description,
            amount,
            date,
            tags,
        } => {
            let expense = service.create(CreateExpenseInput {
                description,
                amount,
                date,
                tags,
            })?;

            println!("Created expense:");
            print!("{}", format_expense_details(&expense, settings));
        }

        ExpenseCommands::List { filter } => {
            let expenses = service.list(&filter.to_filter()?)?;
            print!("{}", format_expense_table(&expenses, settings));
        }

        ExpenseCommands::Show { id } => {
            let expense = service.resolve(&id)?;
            print!("{}", format_expense_details(&expense, settings));
        }

        ExpenseCommands::Edit {
            id,
            description,
            amount,
            date,
            tags,
        } => {
            if description.is_none() && amount.is_none() && date.is_none() && tags.is_none() {
                println!("Nothing to change.");
                return Ok(());
            }

            let expense_id = service.resolve_id(&id)?;

            let expense = service.update(
                expense_id,
                UpdateExpenseInput {
                    description,
                    amount,
                    date,
                    tags,
                },
            )?;

            println!("Updated expense:");
            print!("{}", format_expense_details(&expense, settings));
        }

        ExpenseCommands::Delete { id } => {
            let expense_id = service.resolve_id(&id)?;

            let removed = service.delete(expense_id)?;
            println!("Deleted {}: {}", expense_id, removed.describe());
        }

        ExpenseCommands::Tag { id, tags } => {
            let expense_id = service.resolve_id(&id)?;

            let expense = service.add_tags(expense_id, tags)?;
            println!("Tags of {}: {}", expense_id, expense.tags().join(", "));
        }

        ExpenseCommands::Untag { id, tags } => {
            let expense_id = service.resolve_id(&id)?;

            let expense = service.remove_tags(expense_id, tags)?;
            if expense.tags().is_empty() {
                println!("{} has no tags left", expense_id);
            } else {
                println!("Tags of {}: {}", expense_id, expense.tags().join(", "));
            }
        }
    }

    Ok(())
}

/// Sample expenses recorded by `demo`
pub const DEMO_EXPENSES: [(&str, f64, &str, &str); 3] = [
    ("Constantinople", 35.0, "1453-05-24", "Fall"),
    ("Built land", 100000.0, "2019-07-21", "Land"),
    ("Bus", 3.0, "2025-11-07", "Transport"),
];

/// Record the sample expenses; does nothing if the ledger already has data
pub fn seed_demo(storage: &Storage) -> ExpenseResult<usize> {
    let service = ExpenseService::new(storage);
    if service.summary()?.expense_count > 0 {
        return Ok(0);
    }

    for (description, amount, date, tag) in DEMO_EXPENSES {
        service.create(CreateExpenseInput {
            description: description.to_string(),
            amount,
            date: Some(date.to_string()),
            tags: vec![tag.to_string()],
        })?;
    }

    Ok(DEMO_EXPENSES.len())
}
