//! Expense tracker - personal expense ledger for the terminal
//!
//! This library records expenses against a budget, filters and groups them
//! by day, month or year, and keeps a local ledger in step with a per-user
//! remote store.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `models`: The expense entity, ids, date parsing and granularity
//! - `ledger`: The in-memory ledger (budget, add/remove, filter, group)
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `storage`: JSON file storage layer
//! - `audit`: Audit logging system
//! - `sync`: Remote store abstraction and synchronization
//! - `services`: Business logic layer
//! - `display`, `export`, `cli`: Terminal output and commands
//!
//! # Example
//!
//! ```rust
//! use expense_tracker::ledger::Ledger;
//! use expense_tracker::models::{Expense, Granularity};
//!
//! let mut ledger = Ledger::new();
//! ledger.set_budget(100.0);
//! ledger.add(Expense::new("Bus", 3.0, Some("2025-11-07"), ["Transport"]));
//!
//! assert_eq!(ledger.balance(), 97.0);
//! assert_eq!(ledger.list()[0].period_key(Granularity::Year), "2025");
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod ledger;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;
pub mod sync;

pub use error::{ExpenseError, ExpenseResult};
pub use ledger::Ledger;
pub use models::{Expense, ExpenseId, Granularity};
