//! The expense ledger
//!
//! Owns the expense list, the budget figure and the id counter. The ledger
//! is a plain value: callers create one at startup and pass it by reference
//! to whatever needs it. All operations are synchronous and infallible.
//! Rejected input (a negative budget, an unknown id) leaves the ledger
//! untouched and is reported through the return value.

mod filter;
mod grouping;

pub use filter::ExpenseFilter;
pub use grouping::PeriodTotals;

use tracing::{debug, warn};

use crate::models::expense::is_valid_amount;
use crate::models::ids::lowest_unused;
use crate::models::{Expense, ExpenseId};

/// Collection of expenses plus the budget they are measured against
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    budget: f64,
    expenses: Vec<Expense>,
    /// `None` once the counter has passed `ExpenseId::MAX`
    next_id: Option<ExpenseId>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// Create an empty ledger with a zero budget
    pub fn new() -> Self {
        Self {
            budget: 0.0,
            expenses: Vec::new(),
            next_id: Some(ExpenseId::new(0)),
        }
    }

    /// Current budget
    pub fn budget(&self) -> f64 {
        self.budget
    }

    /// Set the budget
    ///
    /// Returns the new budget, or `None` if `value` is negative or not a
    /// finite number. A rejected value leaves the budget unchanged.
    pub fn set_budget(&mut self, value: f64) -> Option<f64> {
        if !is_valid_amount(value) {
            debug!(value, "rejected budget");
            return None;
        }
        self.budget = value;
        Some(self.budget)
    }

    /// Text rendering of the current budget
    pub fn describe_budget(&self) -> String {
        format!("Your current budget is {}", self.budget)
    }

    /// All expenses in insertion order
    pub fn list(&self) -> &[Expense] {
        &self.expenses
    }

    /// Number of expenses
    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    /// Check if the ledger holds no expenses
    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    /// The id the next added expense will receive
    ///
    /// Once the counter is exhausted this is the lowest id not in use.
    pub fn next_id(&self) -> ExpenseId {
        self.next_id
            .unwrap_or_else(|| lowest_unused(self.expenses.iter().filter_map(Expense::id)))
    }

    fn take_next_id(&mut self) -> ExpenseId {
        let id = self.next_id();
        if self.next_id == Some(id) {
            self.next_id = id.next();
        }
        id
    }

    /// Add an expense, assigning it the next id
    ///
    /// Any id the expense already carried is overwritten.
    pub fn add(&mut self, mut expense: Expense) -> ExpenseId {
        let id = self.take_next_id();
        expense.id = Some(id);
        self.expenses.push(expense);
        debug!(%id, "added expense");
        id
    }

    /// Look up an expense by id
    pub fn get(&self, id: ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == Some(id))
    }

    /// Edit an expense in place
    ///
    /// Returns `false` without calling `edit` when no expense has this id.
    /// The expense keeps its id whatever `edit` does.
    pub fn update<F>(&mut self, id: ExpenseId, edit: F) -> bool
    where
        F: FnOnce(&mut Expense),
    {
        match self.expenses.iter_mut().find(|e| e.id == Some(id)) {
            Some(expense) => {
                edit(expense);
                expense.id = Some(id);
                true
            }
            None => false,
        }
    }

    /// Remove the expense with this id
    ///
    /// Returns the removed expense; an unknown id is a no-op.
    pub fn remove(&mut self, id: ExpenseId) -> Option<Expense> {
        let position = self.expenses.iter().position(|e| e.id == Some(id))?;
        debug!(%id, "removed expense");
        Some(self.expenses.remove(position))
    }

    /// Sum of all amounts
    pub fn total(&self) -> f64 {
        self.expenses.iter().map(Expense::amount).sum()
    }

    /// Budget minus total spending
    pub fn balance(&self) -> f64 {
        self.budget - self.total()
    }

    /// Expenses matching every criterion of `filter`, in list order
    pub fn filter(&self, filter: &ExpenseFilter) -> Vec<&Expense> {
        self.expenses.iter().filter(|e| filter.matches(e)).collect()
    }

    /// Swap the whole expense list for `expenses`
    ///
    /// Incoming items are taken as they are. The id counter becomes one past
    /// the largest id present, or 0 for an empty list; items that arrive
    /// without an id, or with one above `ExpenseId::MAX`, are numbered from
    /// there.
    pub fn replace_all(&mut self, mut expenses: Vec<Expense>) {
        for expense in expenses.iter_mut() {
            if let Some(id) = expense.id.filter(|id| !id.is_in_range()) {
                warn!(%id, "expense id out of range, renumbering");
                expense.id = None;
            }
        }

        self.next_id = match expenses.iter().filter_map(Expense::id).max() {
            Some(max) => max.next(),
            None => Some(ExpenseId::new(0)),
        };
        self.expenses = expenses;

        for index in 0..self.expenses.len() {
            if self.expenses[index].id.is_none() {
                let id = self.take_next_id();
                self.expenses[index].id = Some(id);
            }
        }

        debug!(
            count = self.expenses.len(),
            next_id = %self.next_id(),
            "replaced expense list"
        );
    }
}
