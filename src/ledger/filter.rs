//! Expense filter criteria
//!
//! Every criterion is optional; an expense passes when it satisfies all the
//! criteria that are set. Date bounds arrive as text and are parsed when the
//! filter is built; a bound that does not parse is simply not applied.

use chrono::{DateTime, Utc};

use crate::models::{parse_date_like, Expense};

/// Criteria for selecting expenses
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseFilter {
    /// Inclusive lower bound on the timestamp
    pub date_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the timestamp
    pub date_to: Option<DateTime<Utc>>,
    /// Inclusive lower bound on the amount
    pub min_amount: Option<f64>,
    /// Inclusive upper bound on the amount
    pub max_amount: Option<f64>,
    /// Case-insensitive substring of the description
    pub description_contains: Option<String>,
    /// At least one of these tags (case-sensitive); empty means unchecked
    pub has_any_tag: Vec<String>,
}

impl ExpenseFilter {
    /// Create a new empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Only expenses on or after this date
    pub fn date_from(mut self, date: &str) -> Self {
        self.date_from = parse_date_like(date);
        self
    }

    /// Only expenses on or before this date
    pub fn date_to(mut self, date: &str) -> Self {
        self.date_to = parse_date_like(date);
        self
    }

    /// Only expenses of at least this amount
    pub fn min_amount(mut self, amount: f64) -> Self {
        self.min_amount = Some(amount);
        self
    }

    /// Only expenses of at most this amount
    pub fn max_amount(mut self, amount: f64) -> Self {
        self.max_amount = Some(amount);
        self
    }

    /// Only expenses whose description contains `text`, ignoring case
    pub fn description_contains(mut self, text: impl Into<String>) -> Self {
        self.description_contains = Some(text.into());
        self
    }

    /// Only expenses carrying at least one of these tags
    pub fn any_tag<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.has_any_tag = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Check if no criterion is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Check whether an expense satisfies every criterion that is set
    pub fn matches(&self, expense: &Expense) -> bool {
        let timestamp = expense.timestamp();
        let amount = expense.amount();

        if self.date_from.is_some_and(|from| timestamp < from) {
            return false;
        }
        if self.date_to.is_some_and(|to| timestamp > to) {
            return false;
        }
        if self.min_amount.is_some_and(|min| amount < min) {
            return false;
        }
        if self.max_amount.is_some_and(|max| amount > max) {
            return false;
        }
        if let Some(needle) = self.description_contains.as_deref() {
            if !needle.is_empty()
                && !expense
                    .description()
                    .to_lowercase()
                    .contains(&needle.to_lowercase())
            {
                return false;
            }
        }
        if !self.has_any_tag.is_empty() && !expense.has_any_tag(self.has_any_tag.as_slice()) {
            return false;
        }

        true
    }
}
