//! Display formatting for terminal output
//!
//! Provides utilities for formatting expenses, budget figures and period
//! reports for terminal display.

pub mod expense;
pub mod report;

pub use expense::{format_budget_summary, format_expense_details, format_expense_table};
pub use report::format_period_report;
