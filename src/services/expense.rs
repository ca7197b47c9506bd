//! Expense service
//!
//! Business logic on top of the ledger repository: input validation, saving
//! after every change and writing the audit trail. The ledger itself ignores
//! bad input silently; this layer turns it into `Validation` errors so the
//! CLI can tell the user what went wrong.

use serde::Serialize;

use crate::audit::EntityType;
use crate::error::{ExpenseError, ExpenseResult};
use crate::ledger::{ExpenseFilter, Ledger, PeriodTotals};
use crate::models::dates::format_local;
use crate::models::expense::is_valid_amount;
use crate::models::{parse_date_like, Expense, ExpenseId, Granularity};
use crate::storage::Storage;

/// Service for expense and budget management
pub struct ExpenseService<'a> {
    storage: &'a Storage,
}

/// Input for creating a new expense
#[derive(Debug, Clone, Default)]
pub struct CreateExpenseInput {
    pub description: String,
    pub amount: f64,
    /// Any date the lenient parser accepts; `None` means now
    pub date: Option<String>,
    pub tags: Vec<String>,
}

/// Changes to apply to an existing expense; `None` fields are left alone
#[derive(Debug, Clone, Default)]
pub struct UpdateExpenseInput {
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub date: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Budget, spending and what is left
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BudgetSummary {
    pub budget: f64,
    pub total: f64,
    pub balance: f64,
    pub expense_count: usize,
}

fn validate_amount(amount: f64) -> ExpenseResult<()> {
    if is_valid_amount(amount) {
        Ok(())
    } else {
        Err(ExpenseError::Validation(format!(
            "Amount must be a non-negative number, got {}",
            amount
        )))
    }
}

fn validate_date(date: &str) -> ExpenseResult<()> {
    match parse_date_like(date) {
        Some(_) => Ok(()),
        None => Err(ExpenseError::Validation(format!(
            "Unrecognized date: '{}'",
            date
        ))),
    }
}

fn clean_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

impl<'a> ExpenseService<'a> {
    /// Create a new expense service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record a new expense
    pub fn create(&self, input: CreateExpenseInput) -> ExpenseResult<Expense> {
        let description = input.description.trim().to_string();
        if description.is_empty() {
            return Err(ExpenseError::Validation(
                "Description cannot be empty".into(),
            ));
        }
        validate_amount(input.amount)?;
        if let Some(date) = &input.date {
            validate_date(date)?;
        }

        let expense = Expense::new(
            description,
            input.amount,
            input.date.as_deref(),
            clean_tags(input.tags),
        );

        let expense = self.storage.ledger.write(|ledger| {
            let id = ledger.add(expense);
            ledger.get(id).cloned()
        })?;
        let expense = expense.ok_or_else(|| {
            ExpenseError::Storage("Expense vanished right after being added".into())
        })?;

        self.storage.ledger.save()?;

        self.storage.log_create(
            EntityType::Expense,
            label(&expense),
            Some(expense.description().to_string()),
            &expense,
        )?;

        Ok(expense)
    }

    /// Get an expense by id
    pub fn get(&self, id: ExpenseId) -> ExpenseResult<Option<Expense>> {
        self.storage.ledger.read(|ledger| ledger.get(id).cloned())
    }

    /// Find an expense by id string (`exp-3` or `3`)
    pub fn find(&self, identifier: &str) -> ExpenseResult<Option<Expense>> {
        match identifier.trim().parse::<ExpenseId>() {
            Ok(id) => self.get(id),
            Err(_) => Ok(None),
        }
    }

    /// Like `find`, but a miss is a `NotFound` error
    pub fn resolve(&self, identifier: &str) -> ExpenseResult<Expense> {
        self.find(identifier)?
            .ok_or_else(|| ExpenseError::expense_not_found(identifier))
    }

    /// Id of the expense `identifier` refers to
    pub fn resolve_id(&self, identifier: &str) -> ExpenseResult<ExpenseId> {
        self.resolve(identifier)?
            .id()
            .ok_or_else(|| ExpenseError::expense_not_found(identifier))
    }

    /// Expenses matching `filter`, in ledger order
    pub fn list(&self, filter: &ExpenseFilter) -> ExpenseResult<Vec<Expense>> {
        self.storage
            .ledger
            .read(|ledger| ledger.filter(filter).into_iter().cloned().collect())
    }

    /// Per-period totals of the expenses that pass the tag and date criteria
    pub fn group_by(
        &self,
        granularity: Granularity,
        tags: &[String],
        date_from: Option<&str>,
        date_to: Option<&str>,
    ) -> ExpenseResult<PeriodTotals> {
        self.storage
            .ledger
            .read(|ledger| ledger.group_by(granularity, tags, date_from, date_to))
    }

    /// Apply an edit to an expense
    pub fn update(&self, id: ExpenseId, input: UpdateExpenseInput) -> ExpenseResult<Expense> {
        let description = match input.description {
            Some(d) if d.trim().is_empty() => {
                return Err(ExpenseError::Validation(
                    "Description cannot be empty".into(),
                ))
            }
            Some(d) => Some(d.trim().to_string()),
            None => None,
        };
        if let Some(amount) = input.amount {
            validate_amount(amount)?;
        }
        if let Some(date) = &input.date {
            validate_date(date)?;
        }
        let tags = input.tags.map(clean_tags);

        self.apply(id, |expense| {
            if let Some(description) = description {
                expense.update_description(description);
            }
            if let Some(amount) = input.amount {
                expense.update_amount(amount);
            }
            if let Some(date) = &input.date {
                expense.update_date(date);
            }
            if let Some(tags) = tags {
                expense.replace_tags(tags);
            }
        })
    }

    /// Attach tags to an expense
    pub fn add_tags(&self, id: ExpenseId, tags: Vec<String>) -> ExpenseResult<Expense> {
        let tags = clean_tags(tags);
        self.apply(id, |expense| expense.add_tags(tags))
    }

    /// Detach tags from an expense
    pub fn remove_tags(&self, id: ExpenseId, tags: Vec<String>) -> ExpenseResult<Expense> {
        self.apply(id, |expense| expense.remove_tags(tags))
    }

    /// Run `edit` on the expense, then save and audit the change
    fn apply<F>(&self, id: ExpenseId, edit: F) -> ExpenseResult<Expense>
    where
        F: FnOnce(&mut Expense),
    {
        let (before, after) = self.storage.ledger.write(|ledger| {
            let before = ledger.get(id).cloned()?;
            ledger.update(id, edit);
            let after = ledger.get(id).cloned()?;
            Some((before, after))
        })?
        .ok_or_else(|| ExpenseError::expense_not_found(id.to_string()))?;

        if before == after {
            return Ok(after);
        }

        self.storage.ledger.save()?;

        self.storage.log_update(
            EntityType::Expense,
            label(&after),
            Some(after.description().to_string()),
            &before,
            &after,
            diff_summary(&before, &after),
        )?;

        Ok(after)
    }

    /// Delete an expense
    pub fn delete(&self, id: ExpenseId) -> ExpenseResult<Expense> {
        let removed = self
            .storage
            .ledger
            .write(|ledger| ledger.remove(id))?
            .ok_or_else(|| ExpenseError::expense_not_found(id.to_string()))?;

        self.storage.ledger.save()?;

        self.storage.log_delete(
            EntityType::Expense,
            label(&removed),
            Some(removed.description().to_string()),
            &removed,
        )?;

        Ok(removed)
    }

    /// Set the budget
    pub fn set_budget(&self, value: f64) -> ExpenseResult<f64> {
        let (before, after) = self
            .storage
            .ledger
            .write(|ledger| {
                let before = ledger.budget();
                ledger.set_budget(value).map(|after| (before, after))
            })?
            .ok_or_else(|| {
                ExpenseError::Validation(format!(
                    "Budget must be a non-negative number, got {}",
                    value
                ))
            })?;

        self.storage.ledger.save()?;

        if before != after {
            self.storage.log_update(
                EntityType::Budget,
                "budget",
                None,
                &before,
                &after,
                Some(format!("budget: {} -> {}", before, after)),
            )?;
        }

        Ok(after)
    }

    /// Current budget, total and balance
    pub fn summary(&self) -> ExpenseResult<BudgetSummary> {
        self.storage.ledger.read(|ledger| BudgetSummary {
            budget: ledger.budget(),
            total: ledger.total(),
            balance: ledger.balance(),
            expense_count: ledger.len(),
        })
    }

    /// Budget sentence as the ledger renders it
    pub fn describe_budget(&self) -> ExpenseResult<String> {
        self.storage.ledger.read(Ledger::describe_budget)
    }
}

fn label(expense: &Expense) -> String {
    expense
        .id()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "exp-?".to_string())
}

fn diff_summary(before: &Expense, after: &Expense) -> Option<String> {
    let mut changes = Vec::new();
    if before.description() != after.description() {
        changes.push(format!(
            "description: '{}' -> '{}'",
            before.description(),
            after.description()
        ));
    }
    if before.amount() != after.amount() {
        changes.push(format!("amount: {} -> {}", before.amount(), after.amount()));
    }
    if before.timestamp() != after.timestamp() {
        changes.push(format!(
            "date: {} -> {}",
            format_local(&before.timestamp()),
            format_local(&after.timestamp())
        ));
    }
    if before.tags() != after.tags() {
        changes.push(format!(
            "tags: [{}] -> [{}]",
            before.tags().join(", "),
            after.tags().join(", ")
        ));
    }

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}
