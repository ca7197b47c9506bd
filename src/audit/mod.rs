//! Audit logging
//!
//! Records every create, update, delete and replace performed through the
//! service layer, with before/after snapshots, in an append-only JSONL file.
//!
//! - `AuditEntry`: one operation on one entity
//! - `AuditLogger`: appends entries to and reads them back from the log file

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
