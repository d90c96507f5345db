//! Entry primitives shared by incomes and expenses.
//!
//! The two record types are structurally symmetric (opposite sign); the
//! engine works on a single [`Entry`] domain view and converts to/from the
//! per-table models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, Recurrence, RecurrenceKind, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Sign applied to the bank-account balance when an entry settles.
    pub(crate) fn balance_sign(self) -> i64 {
        match self {
            Self::Income => 1,
            Self::Expense => -1,
        }
    }
}

impl TryFrom<&str> for EntryKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(EngineError::Validation(format!(
                "invalid entry kind: {other}"
            ))),
        }
    }
}

/// A single income or expense occurrence.
///
/// `due_date` is when the amount is owed/expected and governs ledger
/// placement; `payment_date` is written by settlement. `recurring_group_id`
/// links all occurrences spawned from one recurring template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: Uuid,
    pub kind: EntryKind,
    pub user_id: String,
    pub bank_account_id: Uuid,
    /// Income only.
    pub source_id: Option<Uuid>,
    /// Expense only.
    pub category_id: Option<Uuid>,
    pub amount: Money,
    pub remarks: Option<String>,
    pub due_date: NaiveDate,
    pub payment_date: Option<NaiveDate>,
    pub settled: bool,
    pub recurrence: Option<Recurrence>,
    pub recurring_group_id: Option<Uuid>,
}

impl Entry {
    /// Settled history is immutable, so both flags derive from `settled`.
    #[must_use]
    pub fn can_edit(&self) -> bool {
        !self.settled
    }

    #[must_use]
    pub fn can_delete(&self) -> bool {
        !self.settled
    }
}

/// Rebuilds the recurrence config from stored columns.
pub(crate) fn recurrence_from_columns(
    is_recurring: bool,
    kind: Option<&str>,
    day: Option<i32>,
    until: Option<NaiveDate>,
) -> ResultEngine<Option<Recurrence>> {
    if !is_recurring {
        return Ok(None);
    }
    let kind = kind.ok_or_else(|| {
        EngineError::Validation("recurring entry without recurring type".to_string())
    })?;
    let day = day
        .map(|d| {
            u8::try_from(d).map_err(|_| {
                EngineError::Validation(format!("recurring_day must be 1-31, got {d}"))
            })
        })
        .transpose()?;
    Ok(Some(Recurrence {
        kind: RecurrenceKind::try_from(kind)?,
        day,
        until,
    }))
}
