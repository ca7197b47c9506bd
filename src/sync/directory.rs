//! File-backed remote store
//!
//! Keeps one JSON array of records per user in `<root>/<user>.json`.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::ids::lowest_unused;
use crate::models::ExpenseId;
use crate::storage::{read_json, write_json_atomic, ExpenseRecord};

use super::remote::RemoteStore;

/// Remote store living in a local directory
#[derive(Debug, Clone)]
pub struct DirectoryRemote {
    root: PathBuf,
}

impl DirectoryRemote {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn user_file(&self, user: &str) -> ExpenseResult<PathBuf> {
        let user = user.trim();
        if user.is_empty() {
            return Err(ExpenseError::Validation("User name cannot be empty".into()));
        }
        if user.contains(&['/', '\\'][..]) || user.starts_with('.') {
            return Err(ExpenseError::Validation(format!(
                "Invalid user name: '{}'",
                user
            )));
        }
        Ok(self.root.join(format!("{}.json", user)))
    }

    fn load(&self, user: &str) -> ExpenseResult<Vec<ExpenseRecord>> {
        read_json(self.user_file(user)?)
            .map_err(|e| ExpenseError::Remote(format!("Failed to read records of {}: {}", user, e)))
    }

    fn store(&self, user: &str, records: &[ExpenseRecord]) -> ExpenseResult<()> {
        write_json_atomic(self.user_file(user)?, &records)
            .map_err(|e| ExpenseError::Remote(format!("Failed to write records of {}: {}", user, e)))
    }
}

fn next_free_id(records: &[ExpenseRecord]) -> ExpenseId {
    let ids = || records.iter().filter_map(|r| r.id).filter(ExpenseId::is_in_range);
    match ids().max() {
        Some(max) => max.next().unwrap_or_else(|| lowest_unused(ids())),
        None => ExpenseId::new(0),
    }
}

impl RemoteStore for DirectoryRemote {
    fn fetch(&self, user: &str) -> ExpenseResult<Vec<ExpenseRecord>> {
        self.load(user)
    }

    fn create(&self, user: &str, record: &ExpenseRecord) -> ExpenseResult<ExpenseId> {
        let mut records = self.load(user)?;

        let id = match record.id {
            Some(id) if id.is_in_range() && !records.iter().any(|r| r.id == Some(id)) => id,
            _ => next_free_id(&records),
        };

        records.push(ExpenseRecord {
            id: Some(id),
            ..record.clone()
        });
        self.store(user, &records)?;

        debug!(user, %id, "remote record created");
        Ok(id)
    }

    fn update(&self, user: &str, id: ExpenseId, record: &ExpenseRecord) -> ExpenseResult<()> {
        let mut records = self.load(user)?;

        let slot = records
            .iter_mut()
            .find(|r| r.id == Some(id))
            .ok_or_else(|| ExpenseError::expense_not_found(id.to_string()))?;
        *slot = ExpenseRecord {
            id: Some(id),
            ..record.clone()
        };

        self.store(user, &records)?;
        debug!(user, %id, "remote record updated");
        Ok(())
    }

    fn delete(&self, user: &str, id: ExpenseId) -> ExpenseResult<()> {
        let mut records = self.load(user)?;

        let position = records
            .iter()
            .position(|r| r.id == Some(id))
            .ok_or_else(|| ExpenseError::expense_not_found(id.to_string()))?;
        records.remove(position);

        self.store(user, &records)?;
        debug!(user, %id, "remote record deleted");
        Ok(())
    }
}
