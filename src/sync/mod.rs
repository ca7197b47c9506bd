//! Remote synchronization
//!
//! - `RemoteStore`: per-user expense collections kept elsewhere
//! - `DirectoryRemote`: a remote store backed by one JSON file per user
//! - `SyncService`: applies changes remotely, then refreshes the ledger

mod directory;
mod remote;
mod service;

pub use directory::DirectoryRemote;
pub use remote::RemoteStore;
pub use service::{PushSummary, SyncService};
