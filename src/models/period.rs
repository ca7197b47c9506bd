//! Reporting granularity and period keys
//!
//! Expenses are bucketed into day, month or year periods. The bucket is
//! identified by a sortable string key built from local calendar fields:
//! `YYYY-MM-DD`, `YYYY-MM` or `YYYY`.

use chrono::{DateTime, Datelike, Local, Utc};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Size of the period used to group expenses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One bucket per calendar day
    #[default]
    Day,
    /// One bucket per calendar month
    Month,
    /// One bucket per calendar year
    Year,
}

impl Granularity {
    /// Parse a granularity name, falling back to `Day` for anything unknown
    ///
    /// Besides the English names this accepts the short Spanish keys used by
    /// older exports (`dia`, `mes`, `anyo`).
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "month" | "monthly" | "mes" => Self::Month,
            "year" | "yearly" | "anyo" | "año" => Self::Year,
            _ => Self::Day,
        }
    }

    /// Build the period key for an instant
    pub fn key_for(&self, timestamp: &DateTime<Utc>) -> String {
        let local = timestamp.with_timezone(&Local);
        match self {
            Self::Day => format!(
                "{:04}-{:02}-{:02}",
                local.year(),
                local.month(),
                local.day()
            ),
            Self::Month => format!("{:04}-{:02}", local.year(), local.month()),
            Self::Year => format!("{:04}", local.year()),
        }
    }
}

impl FromStr for Granularity {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_lenient(s))
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day => write!(f, "day"),
            Self::Month => write!(f, "month"),
            Self::Year => write!(f, "year"),
        }
    }
}
