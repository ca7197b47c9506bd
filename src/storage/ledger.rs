//! Ledger repository for JSON storage
//!
//! Manages loading and saving the budget and expense list to ledger.json

use std::path::PathBuf;
use std::sync::RwLock;

use tracing::info;

use crate::error::{ExpenseError, ExpenseResult};
use crate::ledger::Ledger;

use super::file_io::{read_json, write_json_atomic};
use super::record::LedgerData;

/// Repository holding the in-memory ledger and its backing file
pub struct LedgerRepository {
    path: PathBuf,
    data: RwLock<Ledger>,
}

impl LedgerRepository {
    /// Create a repository with an empty ledger
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Ledger::new()),
        }
    }

    /// Load the ledger from disk, replacing whatever is in memory
    ///
    /// A missing file yields an empty ledger.
    pub fn load(&self) -> ExpenseResult<()> {
        let file_data: LedgerData = read_json(&self.path)?;
        let ledger = file_data.into_ledger();

        info!(
            path = %self.path.display(),
            expenses = ledger.len(),
            "loaded ledger"
        );

        let mut data = self.data.write().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        *data = ledger;
        Ok(())
    }

    /// Save the ledger to disk
    pub fn save(&self) -> ExpenseResult<()> {
        let data = self.data.read().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        write_json_atomic(&self.path, &LedgerData::from_ledger(&data))?;
        info!(path = %self.path.display(), expenses = data.len(), "saved ledger");
        Ok(())
    }

    /// Run a read-only closure against the ledger
    pub fn read<F, R>(&self, f: F) -> ExpenseResult<R>
    where
        F: FnOnce(&Ledger) -> R,
    {
        let data = self.data.read().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(f(&data))
    }

    /// Run a mutating closure against the ledger
    ///
    /// Changes stay in memory until `save` is called.
    pub fn write<F, R>(&self, f: F) -> ExpenseResult<R>
    where
        F: FnOnce(&mut Ledger) -> R,
    {
        let mut data = self.data.write().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        Ok(f(&mut data))
    }

    /// Clone of the current ledger
    pub fn snapshot(&self) -> ExpenseResult<Ledger> {
        self.read(Ledger::clone)
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}
