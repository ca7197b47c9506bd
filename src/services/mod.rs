//! Service layer for the expense tracker
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, persistence and the audit trail.

pub mod expense;

pub use expense::{BudgetSummary, CreateExpenseInput, ExpenseService, UpdateExpenseInput};
