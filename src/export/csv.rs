//! CSV Export functionality
//!
//! Exports expenses and grouped period totals to CSV format.

use std::io::Write;

use serde::Serialize;

use crate::error::ExpenseResult;
use crate::ledger::{ExpenseFilter, PeriodTotals};
use crate::models::Expense;
use crate::storage::Storage;

/// Separator between tags inside the single `Tags` column
pub const TAG_SEPARATOR: &str = ";";

#[derive(Serialize)]
struct ExpenseCsvRow<'a> {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Description")]
    description: &'a str,
    #[serde(rename = "Amount")]
    amount: String,
    #[serde(rename = "Tags")]
    tags: String,
}

impl<'a> From<&'a Expense> for ExpenseCsvRow<'a> {
    fn from(expense: &'a Expense) -> Self {
        Self {
            id: expense.id().map(|id| id.value().to_string()).unwrap_or_default(),
            date: expense
                .timestamp()
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d")
                .to_string(),
            description: expense.description(),
            amount: format!("{:.2}", expense.amount()),
            tags: expense.tags().join(TAG_SEPARATOR),
        }
    }
}

/// Export the expenses that match `filter` to CSV
pub fn export_expenses_csv<W: Write>(
    storage: &Storage,
    filter: &ExpenseFilter,
    writer: W,
) -> ExpenseResult<usize> {
    let expenses: Vec<Expense> = storage
        .ledger
        .read(|ledger| ledger.filter(filter).into_iter().cloned().collect())?;

    let mut csv_writer = csv::Writer::from_writer(writer);
    if expenses.is_empty() {
        csv_writer.write_record(["ID", "Date", "Description", "Amount", "Tags"])?;
    }
    for expense in &expenses {
        csv_writer.serialize(ExpenseCsvRow::from(expense))?;
    }
    csv_writer.flush()?;

    Ok(expenses.len())
}

/// Export grouped totals as `Period,Total` rows
pub fn export_period_totals_csv<W: Write>(totals: &PeriodTotals, writer: W) -> ExpenseResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["Period", "Total"])?;
    for (period, total) in totals {
        let total = format!("{:.2}", total);
        csv_writer.write_record([period.as_str(), total.as_str()])?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExpensePaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = ExpensePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_export_expenses_csv() {
        let (_temp_dir, storage) = create_test_storage();
        storage
            .ledger
            .write(|ledger| {
                ledger.add(Expense::new(
                    "Bus, night",
                    3.0,
                    Some("2025-11-07"),
                    ["Transport", "late"],
                ));
                ledger.add(Expense::new("Lunch", 11.5, Some("2025-11-08"), ["food"]));
            })
            .unwrap();

        let mut output = Vec::new();
        let count = export_expenses_csv(&storage, &ExpenseFilter::new(), &mut output).unwrap();
        let csv_string = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = csv_string.lines().collect();

        assert_eq!(count, 2);
        assert_eq!(lines[0], "ID,Date,Description,Amount,Tags");
        assert_eq!(lines[1], "0,2025-11-07,\"Bus, night\",3.00,Transport;late");
        assert_eq!(lines[2], "1,2025-11-08,Lunch,11.50,food");
    }

    #[test]
    fn test_export_respects_filter() {
        let (_temp_dir, storage) = create_test_storage();
        storage
            .ledger
            .write(|ledger| {
                ledger.add(Expense::new("Rent", 500.0, Some("2025-11-01"), ["home"]));
                ledger.add(Expense::new("Gum", 1.0, Some("2025-11-02"), ["snack"]));
            })
            .unwrap();

        let mut output = Vec::new();
        let filter = ExpenseFilter::new().min_amount(10.0);
        assert_eq!(export_expenses_csv(&storage, &filter, &mut output).unwrap(), 1);
        assert!(!String::from_utf8(output).unwrap().contains("Gum"));
    }

    #[test]
    fn test_empty_export_has_header() {
        let (_temp_dir, storage) = create_test_storage();
        let mut output = Vec::new();
        export_expenses_csv(&storage, &ExpenseFilter::new(), &mut output).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "ID,Date,Description,Amount,Tags\n");
    }

    #[test]
    fn test_export_period_totals() {
        let mut totals = PeriodTotals::new();
        totals.insert("2024-01".to_string(), 15.0);
        totals.insert("2024-02".to_string(), 7.25);

        let mut output = Vec::new();
        export_period_totals_csv(&totals, &mut output).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Period,Total\n2024-01,15.00\n2024-02,7.25\n"
        );
    }
}
