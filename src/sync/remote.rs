//! Remote store abstraction

use crate::error::ExpenseResult;
use crate::models::ExpenseId;
use crate::storage::ExpenseRecord;

/// A per-user collection of expense records held somewhere else.
///
/// Every call either succeeds completely or returns an error; callers decide
/// what to do with their local state based on that.
pub trait RemoteStore {
    /// Fetch every record stored for `user`.
    fn fetch(&self, user: &str) -> ExpenseResult<Vec<ExpenseRecord>>;

    /// Store a new record for `user` and return the id it was filed under.
    ///
    /// Implementers assign an id when the record has none or when its id is
    /// already taken.
    fn create(&self, user: &str, record: &ExpenseRecord) -> ExpenseResult<ExpenseId>;

    /// Overwrite the record with `id`.
    fn update(&self, user: &str, id: ExpenseId, record: &ExpenseRecord) -> ExpenseResult<()>;

    /// Remove the record with `id`.
    fn delete(&self, user: &str, id: ExpenseId) -> ExpenseResult<()>;
}

impl<T: RemoteStore + ?Sized> RemoteStore for &T {
    fn fetch(&self, user: &str) -> ExpenseResult<Vec<ExpenseRecord>> {
        (**self).fetch(user)
    }

    fn create(&self, user: &str, record: &ExpenseRecord) -> ExpenseResult<ExpenseId> {
        (**self).create(user, record)
    }

    fn update(&self, user: &str, id: ExpenseId, record: &ExpenseRecord) -> ExpenseResult<()> {
        (**self).update(user, id, record)
    }

    fn delete(&self, user: &str, id: ExpenseId) -> ExpenseResult<()> {
        (**self).delete(user, id)
    }
}
