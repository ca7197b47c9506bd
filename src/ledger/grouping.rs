//! Aggregation of expenses by period

use std::collections::BTreeMap;

use crate::models::Granularity;

use super::{ExpenseFilter, Ledger};

/// Summed amounts keyed by period key, in key order
pub type PeriodTotals = BTreeMap<String, f64>;

impl Ledger {
    /// Sum amounts per period
    ///
    /// Expenses are first narrowed to those carrying one of `tags` (when the
    /// list is non-empty) and falling between the inclusive date bounds
    /// (unparseable bounds are ignored). Only periods with at least one
    /// matching expense appear in the result.
    pub fn group_by<S: AsRef<str>>(
        &self,
        granularity: Granularity,
        tags: &[S],
        date_from: Option<&str>,
        date_to: Option<&str>,
    ) -> PeriodTotals {
        let mut filter = ExpenseFilter::new().any_tag(tags.iter().map(|t| t.as_ref()));
        if let Some(from) = date_from {
            filter = filter.date_from(from);
        }
        if let Some(to) = date_to {
            filter = filter.date_to(to);
        }

        let mut totals = PeriodTotals::new();
        for expense in self.list().iter().filter(|e| filter.matches(e)) {
            *totals.entry(expense.period_key(granularity)).or_insert(0.0) += expense.amount();
        }
        totals
    }
}
