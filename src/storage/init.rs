//! Storage initialization
//!
//! Handles first-run setup: directories, default settings and an empty
//! ledger file.

use crate::config::{ExpensePaths, Settings};
use crate::error::ExpenseError;

use super::file_io::write_json_atomic;
use super::record::LedgerData;

/// Initialize storage for a fresh installation
///
/// Existing files are left alone, so running it twice is harmless.
pub fn initialize_storage(paths: &ExpensePaths) -> Result<(), ExpenseError> {
    paths.ensure_directories()?;

    if !paths.settings_file().exists() {
        Settings::default().save(paths)?;
    }

    if !paths.ledger_file().exists() {
        write_json_atomic(paths.ledger_file(), &LedgerData::default())?;
    }

    Ok(())
}
