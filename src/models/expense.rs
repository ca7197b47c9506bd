//! Expense model
//!
//! A single recorded outflow: description, non-negative amount, timestamp
//! and an ordered, duplicate-free tag list. Update operations never fail;
//! a rejected value leaves the previous one in place and the method reports
//! `false`.

use chrono::{DateTime, SubsecRound, Utc};
use serde::Serialize;
use std::fmt;

use super::dates::{format_local, parse_date_like};
use super::ids::ExpenseId;
use super::period::Granularity;

/// A recorded expense
///
/// Only serialized (for the audit trail); stored data is read back through
/// `ExpenseRecord`, which goes through the constructor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expense {
    /// Assigned by the ledger; `None` until the expense is added
    pub(crate) id: Option<ExpenseId>,

    description: String,

    amount: f64,

    /// Millisecond precision, serialized as epoch milliseconds
    #[serde(with = "chrono::serde::ts_milliseconds")]
    timestamp: DateTime<Utc>,

    tags: Vec<String>,
}

/// True for finite, non-negative numbers
pub(crate) fn is_valid_amount(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

impl Expense {
    /// Create a new expense
    ///
    /// Negative or non-finite amounts are stored as 0. A missing or
    /// unparseable date falls back to the current instant.
    pub fn new<I, S>(description: impl Into<String>, amount: f64, date: Option<&str>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let timestamp = date.and_then(parse_date_like).unwrap_or_else(Utc::now);
        Self::with_timestamp(description, amount, timestamp, tags)
    }

    /// Create a new expense at a known instant
    pub fn with_timestamp<I, S>(
        description: impl Into<String>,
        amount: f64,
        timestamp: DateTime<Utc>,
        tags: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut expense = Self {
            id: None,
            description: description.into(),
            amount: if is_valid_amount(amount) { amount } else { 0.0 },
            timestamp: timestamp.trunc_subsecs(3),
            tags: Vec::new(),
        };
        expense.add_tags(tags);
        expense
    }

    /// Rebuild an expense that already carries an id (e.g. loaded from a store)
    pub fn with_id(mut self, id: ExpenseId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn id(&self) -> Option<ExpenseId> {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Check whether the expense carries a tag (exact, case-sensitive match)
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Check whether the expense carries at least one of the given tags
    pub fn has_any_tag<S: AsRef<str>>(&self, tags: &[S]) -> bool {
        tags.iter().any(|t| self.has_tag(t.as_ref()))
    }

    /// Short one-line summary
    pub fn describe(&self) -> String {
        format!("{} — {}", self.description, self.amount)
    }

    /// Multi-line summary with local date and tag list
    pub fn describe_full(&self) -> String {
        let mut text = format!("{}.\n", self.describe());
        text.push_str(&format!("Date: {}\n", format_local(&self.timestamp)));
        text.push_str("Tags:\n");
        for tag in &self.tags {
            text.push_str(&format!("- {}\n", tag));
        }
        text
    }

    pub fn update_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Replace the amount if it is a finite, non-negative number
    pub fn update_amount(&mut self, amount: f64) -> bool {
        if !is_valid_amount(amount) {
            return false;
        }
        self.amount = amount;
        true
    }

    /// Replace the timestamp if `date` parses
    pub fn update_date(&mut self, date: &str) -> bool {
        match parse_date_like(date) {
            Some(timestamp) => {
                self.timestamp = timestamp.trunc_subsecs(3);
                true
            }
            None => false,
        }
    }

    /// Append tags that are not present yet, keeping insertion order
    pub fn add_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for tag in tags {
            let tag = tag.into();
            if !self.has_tag(&tag) {
                self.tags.push(tag);
            }
        }
    }

    /// Remove every tag in the given set; the rest keep their order
    pub fn remove_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let doomed: Vec<S> = tags.into_iter().collect();
        self.tags
            .retain(|t| !doomed.iter().any(|d| d.as_ref() == t.as_str()));
    }

    /// Replace the whole tag list (duplicates still suppressed)
    pub fn replace_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.clear();
        self.add_tags(tags);
    }

    /// Key of the period this expense falls into
    pub fn period_key(&self, granularity: Granularity) -> String {
        granularity.key_for(&self.timestamp)
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groceries() -> Expense {
        Expense::new("Groceries", 20.0, Some("2024-01-05"), ["food"])
    }

    #[test]
    fn test_new_expense() {
        let expense = Expense::new("Bus", 3.0, Some("2025-11-07"), ["Transport"]);
        assert_eq!(expense.id(), None);
        assert_eq!(expense.description(), "Bus");
        assert_eq!(expense.amount(), 3.0);
        assert_eq!(expense.tags(), ["Transport"]);
        assert_eq!(expense.period_key(Granularity::Year), "2025");
        assert_eq!(expense.period_key(Granularity::Day), "2025-11-07");
    }

    #[test]
    fn test_invalid_amount_clamped_to_zero() {
        let negative = Expense::new("Refund?", -4.0, None, Vec::<String>::new());
        assert_eq!(negative.amount(), 0.0);

        let nan = Expense::new("Broken", f64::NAN, None, Vec::<String>::new());
        assert_eq!(nan.amount(), 0.0);

        let infinite = Expense::new("Broken", f64::INFINITY, None, Vec::<String>::new());
        assert_eq!(infinite.amount(), 0.0);
    }

    #[test]
    fn test_missing_or_bad_date_defaults_to_now() {
        let before = Utc::now().trunc_subsecs(3);
        let missing = Expense::new("Coffee", 2.0, None, Vec::<String>::new());
        let garbage = Expense::new("Coffee", 2.0, Some("yesterday-ish"), Vec::<String>::new());
        let after = Utc::now();

        for expense in [missing, garbage] {
            assert!(expense.timestamp() >= before);
            assert!(expense.timestamp() <= after);
        }
    }

    #[test]
    fn test_constructor_suppresses_duplicate_tags() {
        let expense = Expense::new("Lunch", 9.5, None, ["food", "work", "food"]);
        assert_eq!(expense.tags(), ["food", "work"]);
    }

    #[test]
    fn test_describe() {
        let expense = Expense::new("Bus", 3.0, None, Vec::<String>::new());
        assert_eq!(expense.describe(), "Bus — 3");

        let expense = Expense::new("Taxi", 12.5, None, Vec::<String>::new());
        assert_eq!(expense.to_string(), "Taxi — 12.5");
    }

    #[test]
    fn test_describe_full_lists_tags() {
        let expense = Expense::new("Dinner", 30.0, Some("2024-02-10"), ["food", "friends"]);
        let text = expense.describe_full();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Dinner — 30.");
        assert!(lines[1].starts_with("Date: 2024-02-10"));
        assert_eq!(lines[2], "Tags:");
        assert_eq!(lines[3], "- food");
        assert_eq!(lines[4], "- friends");
    }

    #[test]
    fn test_update_description() {
        let mut expense = groceries();
        expense.update_description("Market");
        assert_eq!(expense.description(), "Market");
    }

    #[test]
    fn test_update_amount_rejects_negative() {
        let mut expense = groceries();
        assert!(!expense.update_amount(-5.0));
        assert_eq!(expense.amount(), 20.0);

        assert!(!expense.update_amount(f64::NAN));
        assert_eq!(expense.amount(), 20.0);

        assert!(expense.update_amount(0.0));
        assert_eq!(expense.amount(), 0.0);
    }

    #[test]
    fn test_update_date_ignores_unparseable() {
        let mut expense = groceries();
        let original = expense.timestamp();

        assert!(!expense.update_date("the day after tomorrow"));
        assert_eq!(expense.timestamp(), original);

        assert!(expense.update_date("2024-06-30"));
        assert_eq!(expense.period_key(Granularity::Day), "2024-06-30");
    }

    #[test]
    fn test_add_tags_dedup_preserves_order() {
        let mut expense = Expense::new("Misc", 1.0, None, Vec::<String>::new());
        expense.add_tags(["a", "a", "b"]);
        assert_eq!(expense.tags(), ["a", "b"]);

        expense.add_tags(["b", "c", "A"]);
        assert_eq!(expense.tags(), ["a", "b", "c", "A"]);
    }

    #[test]
    fn test_remove_tags() {
        let mut expense = Expense::new("Misc", 1.0, None, ["a", "b", "c", "d"]);
        expense.remove_tags(["b", "d", "missing"]);
        assert_eq!(expense.tags(), ["a", "c"]);
    }

    #[test]
    fn test_replace_tags() {
        let mut expense = Expense::new("Misc", 1.0, None, ["a", "b"]);
        expense.replace_tags(["x", "y", "x"]);
        assert_eq!(expense.tags(), ["x", "y"]);
    }

    #[test]
    fn test_has_any_tag_is_case_sensitive() {
        let expense = Expense::new("Misc", 1.0, None, ["Food"]);
        assert!(expense.has_any_tag(&["Food", "other"][..]));
        assert!(!expense.has_any_tag(&["food"][..]));
    }

    #[test]
    fn test_serialization_uses_epoch_millis() {
        let expense = groceries().with_id(ExpenseId::new(4));
        let json = serde_json::to_value(&expense).unwrap();

        assert_eq!(json["id"], 4);
        assert_eq!(json["timestamp"], expense.timestamp().timestamp_millis());
        assert_eq!(json["tags"], serde_json::json!(["food"]));
    }

    #[test]
    fn test_stored_form_goes_through_constructor() {
        let record: crate::storage::ExpenseRecord = serde_json::from_str(
            r#"{"id": 1, "description": "Odd", "amount": -5, "tags": ["a", "a", "b"]}"#,
        )
        .unwrap();
        let expense = record.into_expense();

        assert_eq!(expense.amount(), 0.0);
        assert_eq!(expense.tags(), ["a", "b"]);
    }
}
