//! JSON Export functionality
//!
//! Exports the complete ledger to JSON format with schema versioning.

use std::collections::BTreeSet;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ExpenseError, ExpenseResult};
use crate::ledger::Ledger;
use crate::storage::{ExpenseRecord, Storage};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full ledger export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub budget: f64,

    /// All expenses as flat records
    pub expenses: Vec<ExpenseRecord>,

    /// Export metadata
    pub metadata: ExportMetadata,
}

/// Export metadata for reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub expense_count: usize,

    pub total_spent: f64,

    pub balance: f64,

    /// Every distinct tag, sorted
    pub tags: Vec<String>,

    /// Date range of expenses (earliest)
    pub earliest_expense: Option<String>,

    /// Date range of expenses (latest)
    pub latest_expense: Option<String>,
}

impl FullExport {
    /// Build an export from a ledger
    pub fn from_ledger(ledger: &Ledger) -> Self {
        let expenses = ledger.list();

        let tags: BTreeSet<String> = expenses
            .iter()
            .flat_map(|e| e.tags().iter().cloned())
            .collect();

        let earliest_expense = expenses
            .iter()
            .map(|e| e.timestamp())
            .min()
            .map(|t| t.to_rfc3339());

        let latest_expense = expenses
            .iter()
            .map(|e| e.timestamp())
            .max()
            .map(|t| t.to_rfc3339());

        let metadata = ExportMetadata {
            expense_count: expenses.len(),
            total_spent: ledger.total(),
            balance: ledger.balance(),
            tags: tags.into_iter().collect(),
            earliest_expense,
            latest_expense,
        };

        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            budget: ledger.budget(),
            expenses: expenses.iter().map(ExpenseRecord::from).collect(),
            metadata,
        }
    }

    /// Create a new full export from storage
    pub fn from_storage(storage: &Storage) -> ExpenseResult<Self> {
        storage.ledger.read(Self::from_ledger)
    }
}

/// Export the full ledger to JSON format
pub fn export_full_json<W: Write>(storage: &Storage, writer: &mut W) -> ExpenseResult<()> {
    let export = FullExport::from_storage(storage)?;

    serde_json::to_writer_pretty(&mut *writer, &export)
        .map_err(|e| ExpenseError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| ExpenseError::Export(e.to_string()))?;

    Ok(())
}
