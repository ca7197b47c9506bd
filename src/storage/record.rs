//! Flat expense records
//!
//! The wire shape shared by the ledger file, the remote store and exports:
//! `{id, description, amount, timestamp, tags}`. Records coming from outside
//! may be incomplete; missing fields are defaulted here, before anything
//! reaches the ledger.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::ledger::Ledger;
use crate::models::dates::{from_epoch_millis, parse_date_like};
use crate::models::{Expense, ExpenseId};

/// Description used when a record arrives without one
pub const PLACEHOLDER_DESCRIPTION: &str = "(no description)";

/// Current ledger file schema version
pub const LEDGER_SCHEMA_VERSION: u32 = 1;

/// Timestamp as stored: epoch milliseconds, or a date string from older data
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RecordTimestamp {
    Millis(i64),
    Text(String),
}

/// One expense as a flat record
///
/// Deserialization never fails: a field of the wrong type is read as
/// missing, and anything that is not a JSON object becomes an empty record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct ExpenseRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ExpenseId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<RecordTimestamp>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Take `key` out of `fields`, converting it with `read`
///
/// A present value `read` rejects is logged and treated as missing.
fn take_field<T>(
    fields: &mut Map<String, Value>,
    key: &str,
    read: impl FnOnce(&Value) -> Option<T>,
) -> Option<T> {
    let value = fields.remove(key).filter(|v| !v.is_null())?;
    let parsed = read(&value);
    if parsed.is_none() {
        warn!(field = key, %value, "ignoring malformed record field");
    }
    parsed
}

/// Whole, non-negative number (`3` or `3.0`)
fn read_id(value: &Value) -> Option<ExpenseId> {
    let raw = match value.as_u64() {
        Some(raw) => raw,
        None => {
            let float = value.as_f64()?;
            if float < 0.0 || float.fract() != 0.0 || float > ExpenseId::MAX.value() as f64 {
                return None;
            }
            float as u64
        }
    };
    Some(ExpenseId::new(raw))
}

fn read_timestamp(value: &Value) -> Option<RecordTimestamp> {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(millis) => Some(RecordTimestamp::Millis(millis)),
            None => n
                .as_f64()
                .filter(|f| f.is_finite())
                .map(|f| RecordTimestamp::Millis(f.trunc() as i64)),
        },
        Value::String(text) => Some(RecordTimestamp::Text(text.clone())),
        _ => None,
    }
}

fn read_tags(value: &Value) -> Option<Vec<String>> {
    let items = value.as_array()?;
    Some(
        items
            .iter()
            .filter_map(|t| t.as_str().map(str::to_string))
            .collect(),
    )
}

impl From<Value> for ExpenseRecord {
    fn from(value: Value) -> Self {
        let mut fields = match value {
            Value::Object(fields) => fields,
            other => {
                warn!(value = %other, "record is not an object");
                return Self::default();
            }
        };

        Self {
            id: take_field(&mut fields, "id", read_id),
            description: take_field(&mut fields, "description", |v| {
                v.as_str().map(str::to_string)
            }),
            amount: take_field(&mut fields, "amount", Value::as_f64),
            timestamp: take_field(&mut fields, "timestamp", read_timestamp),
            tags: take_field(&mut fields, "tags", read_tags),
        }
    }
}

impl From<&Expense> for ExpenseRecord {
    fn from(expense: &Expense) -> Self {
        Self {
            id: expense.id(),
            description: Some(expense.description().to_string()),
            amount: Some(expense.amount()),
            timestamp: Some(RecordTimestamp::Millis(expense.timestamp().timestamp_millis())),
            tags: Some(expense.tags().to_vec()),
        }
    }
}

impl ExpenseRecord {
    /// Rebuild an expense, defaulting whatever the record lacks
    ///
    /// Missing description becomes a placeholder, missing amount 0, missing
    /// or unreadable timestamp the current instant, missing tags none.
    pub fn into_expense(self) -> Expense {
        let id_label = self
            .id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "(unassigned)".to_string());

        let description = self.description.unwrap_or_else(|| {
            warn!(id = %id_label, "record without description");
            PLACEHOLDER_DESCRIPTION.to_string()
        });

        let amount = self.amount.unwrap_or_else(|| {
            warn!(id = %id_label, "record without amount");
            0.0
        });

        let timestamp = match &self.timestamp {
            Some(RecordTimestamp::Millis(millis)) => from_epoch_millis(*millis),
            Some(RecordTimestamp::Text(text)) => parse_date_like(text),
            None => None,
        };
        if timestamp.is_none() {
            warn!(id = %id_label, "record without a usable timestamp");
        }

        let tags = self.tags.unwrap_or_default();

        let expense = match timestamp {
            Some(ts) => Expense::with_timestamp(description, amount, ts, tags),
            None => Expense::new(description, amount, None, tags),
        };

        match self.id {
            Some(id) => expense.with_id(id),
            None => expense,
        }
    }
}

/// Contents of `ledger.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerData {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default, deserialize_with = "read_budget")]
    pub budget: f64,

    #[serde(default)]
    pub expenses: Vec<ExpenseRecord>,
}

fn read_budget<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_f64().unwrap_or_else(|| {
        warn!(%value, "stored budget is not a number, using 0");
        0.0
    }))
}

fn default_schema_version() -> u32 {
    LEDGER_SCHEMA_VERSION
}

impl Default for LedgerData {
    fn default() -> Self {
        Self {
            schema_version: LEDGER_SCHEMA_VERSION,
            budget: 0.0,
            expenses: Vec::new(),
        }
    }
}

impl LedgerData {
    /// Snapshot a ledger
    pub fn from_ledger(ledger: &Ledger) -> Self {
        Self {
            schema_version: LEDGER_SCHEMA_VERSION,
            budget: ledger.budget(),
            expenses: ledger.list().iter().map(ExpenseRecord::from).collect(),
        }
    }

    /// Rebuild a ledger from a snapshot
    pub fn into_ledger(self) -> Ledger {
        let mut ledger = Ledger::new();
        if ledger.set_budget(self.budget).is_none() {
            warn!(budget = self.budget, "stored budget is invalid, using 0");
        }
        ledger.replace_all(records_into_expenses(self.expenses));
        ledger
    }
}

/// Convert a batch of records into expenses
pub fn records_into_expenses(records: Vec<ExpenseRecord>) -> Vec<Expense> {
    records.into_iter().map(ExpenseRecord::into_expense).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Granularity;

    #[test]
    fn test_record_from_expense() {
        let expense = Expense::new("Bus", 3.0, Some("2025-11-07"), ["Transport"])
            .with_id(ExpenseId::new(2));
        let record = ExpenseRecord::from(&expense);

        assert_eq!(record.id, Some(ExpenseId::new(2)));
        assert_eq!(record.description.as_deref(), Some("Bus"));
        assert_eq!(record.amount, Some(3.0));
        assert_eq!(record.tags, Some(vec!["Transport".to_string()]));
        assert_eq!(record.into_expense(), expense);
    }

    #[test]
    fn test_flat_json_shape() {
        let expense = Expense::new("Bus", 3.0, Some("2025-11-07"), ["Transport"])
            .with_id(ExpenseId::new(0));
        let json = serde_json::to_value(ExpenseRecord::from(&expense)).unwrap();

        let mut keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(keys, ["amount", "description", "id", "tags", "timestamp"]);
        assert!(json["timestamp"].is_i64());
    }

    #[test]
    fn test_missing_fields_are_defaulted() {
        let record: ExpenseRecord = serde_json::from_str(r#"{"id": 9}"#).unwrap();
        let expense = record.into_expense();

        assert_eq!(expense.id(), Some(ExpenseId::new(9)));
        assert_eq!(expense.description(), PLACEHOLDER_DESCRIPTION);
        assert_eq!(expense.amount(), 0.0);
        assert!(expense.tags().is_empty());
    }

    #[test]
    fn test_text_timestamp_is_parsed() {
        let record: ExpenseRecord = serde_json::from_str(
            r#"{"description": "Taxi", "amount": 12, "timestamp": "2024-05-01", "tags": ["ride"]}"#,
        )
        .unwrap();
        let expense = record.into_expense();

        assert_eq!(expense.id(), None);
        assert_eq!(expense.amount(), 12.0);
        assert_eq!(expense.period_key(Granularity::Day), "2024-05-01");
    }

    #[test]
    fn test_wrongly_typed_fields_are_defaulted() {
        let records: Vec<ExpenseRecord> = serde_json::from_str(
            r#"[
                {"id": 0, "amount": 7},
                {"id": 1, "amount": "12", "description": 5, "tags": ["ok", 3], "timestamp": true}
            ]"#,
        )
        .unwrap();

        assert_eq!(records[0].amount, Some(7.0));
        assert_eq!(records[1].id, Some(ExpenseId::new(1)));
        assert_eq!(records[1].amount, None);
        assert_eq!(records[1].description, None);
        assert_eq!(records[1].tags, Some(vec!["ok".to_string()]));
        assert_eq!(records[1].timestamp, None);

        let expense = records[1].clone().into_expense();
        assert_eq!(expense.amount(), 0.0);
        assert_eq!(expense.description(), PLACEHOLDER_DESCRIPTION);
    }

    #[test]
    fn test_float_millis_timestamp() {
        let record: ExpenseRecord =
            serde_json::from_str(r#"{"id": 2.0, "amount": 1.5, "timestamp": 1700000000000.0}"#)
                .unwrap();

        assert_eq!(record.id, Some(ExpenseId::new(2)));
        assert_eq!(record.timestamp, Some(RecordTimestamp::Millis(1_700_000_000_000)));
        assert_eq!(record.into_expense().timestamp().timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn test_non_object_record_is_empty() {
        let records: Vec<ExpenseRecord> = serde_json::from_str(r#"[null, 4, {"amount": 2}]"#).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0], ExpenseRecord::default());
        assert_eq!(records[2].amount, Some(2.0));
    }

    #[test]
    fn test_ledger_file_with_bad_record_still_loads() {
        let data: LedgerData = serde_json::from_str(
            r#"{"budget": "lots", "expenses": [{"id": 0, "amount": 7}, {"id": 1, "amount": "12"}]}"#,
        )
        .unwrap();
        let ledger = data.into_ledger();

        assert_eq!(ledger.budget(), 0.0);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.total(), 7.0);
        assert_eq!(ledger.next_id(), ExpenseId::new(2));
    }

    #[test]
    fn test_negative_amount_is_clamped_by_constructor() {
        let record = ExpenseRecord {
            amount: Some(-3.0),
            ..ExpenseRecord::default()
        };
        assert_eq!(record.into_expense().amount(), 0.0);
    }

    #[test]
    fn test_ledger_snapshot_round_trip() {
        let mut ledger = Ledger::new();
        ledger.set_budget(250.0);
        ledger.add(Expense::new("Lunch", 12.0, Some("2024-03-01"), ["food"]));
        ledger.add(Expense::new("Cinema", 9.0, Some("2024-03-02"), ["fun"]));
        ledger.remove(ExpenseId::new(0));

        let json = serde_json::to_string(&LedgerData::from_ledger(&ledger)).unwrap();
        let restored = serde_json::from_str::<LedgerData>(&json).unwrap().into_ledger();

        assert_eq!(restored, ledger);
        assert_eq!(restored.next_id(), ExpenseId::new(2));
    }

    #[test]
    fn test_invalid_stored_budget_falls_back_to_zero() {
        let data = LedgerData {
            budget: -10.0,
            ..LedgerData::default()
        };
        assert_eq!(data.into_ledger().budget(), 0.0);
    }
}
