//! Export module for the expense tracker
//!
//! Provides complete data export functionality in multiple formats:
//! - CSV: expenses and grouped period totals (spreadsheet-compatible)
//! - JSON: machine-readable full ledger export
//! - YAML: human-readable full ledger export

pub mod csv;
pub mod json;
pub mod yaml;

pub use csv::{export_expenses_csv, export_period_totals_csv};
pub use json::{export_full_json, FullExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_full_yaml;
