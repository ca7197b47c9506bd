//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod budget;
pub mod expense;
pub mod export;
pub mod report;
pub mod sync;

pub use budget::{handle_budget_command, BudgetCommands};
pub use expense::{handle_expense_command, seed_demo, ExpenseCommands, FilterArgs};
pub use export::{handle_export_command, ExportCommands};
pub use report::{handle_report_command, ReportArgs};
pub use sync::{handle_sync_command, SyncArgs};
