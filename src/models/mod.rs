//! Core data models for the expense tracker
//!
//! This module contains the expense entity and the small value types around
//! it: ids, lenient date parsing and reporting granularity.

pub mod dates;
pub mod expense;
pub mod ids;
pub mod period;

pub use dates::parse_date_like;
pub use expense::Expense;
pub use ids::ExpenseId;
pub use period::Granularity;
