//! Expense identifier
//!
//! Ids are small integers handed out by the ledger. The newtype keeps them
//! from being confused with amounts or counts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

const DISPLAY_PREFIX: &str = "exp-";

/// Identifier of an expense within a ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(u64);

impl ExpenseId {
    /// Largest id handed out or accepted from storage (2^53 - 1, the last
    /// integer a JSON number round-trips exactly through JavaScript)
    pub const MAX: Self = Self(9_007_199_254_740_991);

    /// Create an id from its raw value
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw value
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Check that the id is not above `MAX`
    pub const fn is_in_range(&self) -> bool {
        self.0 <= Self::MAX.0
    }

    /// The id that follows this one, or `None` past `MAX`
    pub fn next(&self) -> Option<Self> {
        self.0
            .checked_add(1)
            .map(Self)
            .filter(ExpenseId::is_in_range)
    }
}

/// Lowest id in range that none of `ids` uses
pub(crate) fn lowest_unused<I>(ids: I) -> ExpenseId
where
    I: IntoIterator<Item = ExpenseId>,
{
    let mut used: Vec<ExpenseId> = ids.into_iter().filter(ExpenseId::is_in_range).collect();
    used.sort_unstable();
    used.dedup();

    let mut candidate = ExpenseId::new(0);
    for id in used {
        if id != candidate {
            break;
        }
        match candidate.next() {
            Some(next) => candidate = next,
            None => break,
        }
    }
    candidate
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", DISPLAY_PREFIX, self.0)
    }
}

impl From<u64> for ExpenseId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl FromStr for ExpenseId {
    type Err = ParseIntError;

    /// Accepts both the bare number ("7") and the display form ("exp-7")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix(DISPLAY_PREFIX).unwrap_or(s);
        Ok(Self(s.parse()?))
    }
}
