//! Remote synchronization service
//!
//! Every operation talks to the remote first and only then refreshes the
//! local ledger from a fresh fetch. When any remote call fails the local
//! ledger is left exactly as it was and the error is returned.

use std::collections::HashSet;

use tracing::{info, warn};

use crate::audit::EntityType;
use crate::error::ExpenseResult;
use crate::models::{Expense, ExpenseId};
use crate::storage::record::records_into_expenses;
use crate::storage::{ExpenseRecord, Storage};

use super::remote::RemoteStore;

/// Outcome of pushing the local ledger to the remote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushSummary {
    pub created: usize,
    pub updated: usize,
}

/// Service keeping the local ledger in step with a remote store
pub struct SyncService<'a, R: RemoteStore> {
    storage: &'a Storage,
    remote: R,
}

impl<'a, R: RemoteStore> SyncService<'a, R> {
    pub fn new(storage: &'a Storage, remote: R) -> Self {
        Self { storage, remote }
    }

    fn remote_call<T>(
        &self,
        action: &str,
        user: &str,
        result: ExpenseResult<T>,
    ) -> ExpenseResult<T> {
        result.map_err(|e| {
            warn!(action, user, error = %e, "remote call failed, local ledger untouched");
            e
        })
    }

    /// Replace the local expense list with the user's remote collection
    ///
    /// Returns the number of expenses loaded. The budget is kept.
    pub fn pull(&self, user: &str) -> ExpenseResult<usize> {
        let records = self.remote_call("fetch", user, self.remote.fetch(user))?;
        let expenses = records_into_expenses(records);
        let count = expenses.len();

        self.storage.ledger.write(|ledger| ledger.replace_all(expenses))?;
        self.storage.ledger.save()?;

        self.storage.log_replace(
            EntityType::Ledger,
            "ledger",
            format!("{} expenses pulled for {}", count, user),
        )?;

        info!(user, count, "pulled remote expenses");
        Ok(count)
    }

    /// Create an expense remotely, then refresh
    pub fn add(&self, user: &str, expense: &Expense) -> ExpenseResult<ExpenseId> {
        let record = ExpenseRecord {
            id: None,
            ..ExpenseRecord::from(expense)
        };
        let id = self.remote_call("create", user, self.remote.create(user, &record))?;
        self.pull(user)?;
        Ok(id)
    }

    /// Overwrite a remote expense, then refresh
    pub fn update(&self, user: &str, id: ExpenseId, expense: &Expense) -> ExpenseResult<()> {
        let record = ExpenseRecord::from(expense);
        self.remote_call("update", user, self.remote.update(user, id, &record))?;
        self.pull(user)?;
        Ok(())
    }

    /// Delete a remote expense, then refresh
    pub fn delete(&self, user: &str, id: ExpenseId) -> ExpenseResult<()> {
        self.remote_call("delete", user, self.remote.delete(user, id))?;
        self.pull(user)?;
        Ok(())
    }

    /// Upload every local expense, then refresh
    ///
    /// Expenses whose id already exists remotely overwrite the remote record;
    /// the rest are created.
    pub fn push(&self, user: &str) -> ExpenseResult<PushSummary> {
        let remote_ids: HashSet<ExpenseId> = self
            .remote_call("fetch", user, self.remote.fetch(user))?
            .into_iter()
            .filter_map(|r| r.id)
            .collect();

        let records: Vec<ExpenseRecord> = self
            .storage
            .ledger
            .read(|ledger| ledger.list().iter().map(ExpenseRecord::from).collect())?;

        let mut summary = PushSummary::default();
        for record in &records {
            match record.id {
                Some(id) if remote_ids.contains(&id) => {
                    self.remote_call("update", user, self.remote.update(user, id, record))?;
                    summary.updated += 1;
                }
                _ => {
                    self.remote_call("create", user, self.remote.create(user, record))?;
                    summary.created += 1;
                }
            }
        }

        self.pull(user)?;
        info!(
            user,
            created = summary.created,
            updated = summary.updated,
            "pushed local expenses"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExpensePaths;
    use crate::error::ExpenseError;
    use crate::ledger::Ledger;
    use crate::sync::DirectoryRemote;
    use tempfile::TempDir;

    /// Remote that is always unreachable
    struct OfflineRemote;

    impl RemoteStore for OfflineRemote {
        fn fetch(&self, _user: &str) -> ExpenseResult<Vec<ExpenseRecord>> {
            Err(ExpenseError::Remote("connection refused".into()))
        }

        fn create(&self, _user: &str, _record: &ExpenseRecord) -> ExpenseResult<ExpenseId> {
            Err(ExpenseError::Remote("connection refused".into()))
        }

        fn update(
            &self,
            _user: &str,
            _id: ExpenseId,
            _record: &ExpenseRecord,
        ) -> ExpenseResult<()> {
            Err(ExpenseError::Remote("connection refused".into()))
        }

        fn delete(&self, _user: &str, _id: ExpenseId) -> ExpenseResult<()> {
            Err(ExpenseError::Remote("connection refused".into()))
        }
    }

    fn create_test_storage() -> (Storage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let paths = ExpensePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (storage, temp_dir)
    }

    fn seed_local(storage: &Storage) {
        storage
            .ledger
            .write(|ledger| {
                ledger.set_budget(50.0);
                ledger.add(Expense::new("Bus", 3.0, Some("2025-11-07"), ["Transport"]));
                ledger.add(Expense::new("Lunch", 11.0, Some("2025-11-08"), ["food"]));
            })
            .unwrap();
    }

    #[test]
    fn test_add_refreshes_ledger() {
        let (storage, temp) = create_test_storage();
        let remote = DirectoryRemote::new(temp.path().join("remote"));
        let service = SyncService::new(&storage, &remote);

        let id = service
            .add("ana", &Expense::new("Bread", 1.5, Some("2024-01-02"), ["food"]))
            .unwrap();

        let ledger = storage.ledger.snapshot().unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.list()[0].id(), Some(id));
        assert_eq!(Some(ledger.next_id()), id.next());
    }

    #[test]
    fn test_pull_keeps_budget_and_persists() {
        let (storage, temp) = create_test_storage();
        seed_local(&storage);
        let remote = DirectoryRemote::new(temp.path().join("remote"));
        remote
            .create("ana", &ExpenseRecord::from(&Expense::new("Gift", 20.0, None, ["x"])))
            .unwrap();

        let count = SyncService::new(&storage, &remote).pull("ana").unwrap();
        assert_eq!(count, 1);

        storage.ledger.load().unwrap();
        let ledger = storage.ledger.snapshot().unwrap();
        assert_eq!(ledger.budget(), 50.0);
        assert_eq!(ledger.total(), 20.0);
    }

    #[test]
    fn test_update_and_delete() {
        let (storage, temp) = create_test_storage();
        let remote = DirectoryRemote::new(temp.path().join("remote"));
        let service = SyncService::new(&storage, &remote);

        let id = service
            .add("ana", &Expense::new("Taxi", 12.0, Some("2024-05-01"), ["ride"]))
            .unwrap();
        service
            .update("ana", id, &Expense::new("Taxi", 14.0, Some("2024-05-01"), ["ride"]))
            .unwrap();
        assert_eq!(storage.ledger.read(Ledger::total).unwrap(), 14.0);

        service.delete("ana", id).unwrap();
        assert!(storage.ledger.read(Ledger::is_empty).unwrap());
    }

    #[test]
    fn test_push_creates_then_updates() {
        let (storage, temp) = create_test_storage();
        seed_local(&storage);
        let remote = DirectoryRemote::new(temp.path().join("remote"));
        let service = SyncService::new(&storage, &remote);

        let first = service.push("ana").unwrap();
        assert_eq!(first, PushSummary { created: 2, updated: 0 });

        let second = service.push("ana").unwrap();
        assert_eq!(second, PushSummary { created: 0, updated: 2 });
        assert_eq!(remote.fetch("ana").unwrap().len(), 2);
        assert_eq!(storage.ledger.read(Ledger::total).unwrap(), 14.0);
    }

    #[test]
    fn test_failure_leaves_ledger_untouched() {
        let (storage, _temp) = create_test_storage();
        seed_local(&storage);
        let before = storage.ledger.snapshot().unwrap();
        let service = SyncService::new(&storage, OfflineRemote);

        assert!(service.pull("ana").is_err());
        assert!(service.add("ana", &Expense::new("x", 1.0, None, ["y"])).is_err());
        assert!(service.delete("ana", ExpenseId::new(0)).is_err());
        assert!(service.push("ana").is_err());

        assert_eq!(storage.ledger.snapshot().unwrap(), before);
        assert!(storage.audit().read_all().unwrap().is_empty());
    }

    #[test]
    fn test_remote_not_found_is_reported() {
        let (storage, temp) = create_test_storage();
        let remote = DirectoryRemote::new(temp.path().join("remote"));
        let err = SyncService::new(&storage, &remote)
            .delete("ana", ExpenseId::new(7))
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
