//! Command structs for engine operations.
//!
//! These types group parameters for write operations, keeping call sites
//! readable and avoiding long argument lists. `UpdateEntryCmd` is the explicit
//! patch struct of the cascade engine: every optional member is named, so the
//! series-wide versus per-occurrence split is visible at compile time.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{EntryKind, Money, Recurrence};

/// Create an income entry (optionally a recurring template).
#[derive(Clone, Debug)]
pub struct CreateIncomeCmd {
    pub user_id: String,
    pub bank_account_id: Uuid,
    pub source_id: Uuid,
    pub amount: Money,
    pub remarks: Option<String>,
    pub due_date: NaiveDate,
    pub recurrence: Option<Recurrence>,
}

impl CreateIncomeCmd {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        bank_account_id: Uuid,
        source_id: Uuid,
        amount: Money,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            bank_account_id,
            source_id,
            amount,
            remarks: None,
            due_date,
            recurrence: None,
        }
    }

    #[must_use]
    pub fn remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }

    #[must_use]
    pub fn recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = Some(recurrence);
        self
    }
}

/// Create an expense entry (optionally a recurring template).
#[derive(Clone, Debug)]
pub struct CreateExpenseCmd {
    pub user_id: String,
    pub bank_account_id: Uuid,
    pub category_id: Option<Uuid>,
    pub amount: Money,
    pub remarks: Option<String>,
    pub due_date: NaiveDate,
    pub recurrence: Option<Recurrence>,
}

impl CreateExpenseCmd {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        bank_account_id: Uuid,
        amount: Money,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            bank_account_id,
            category_id: None,
            amount,
            remarks: None,
            due_date,
            recurrence: None,
        }
    }

    #[must_use]
    pub fn category_id(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }

    #[must_use]
    pub fn recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = Some(recurrence);
        self
    }
}

/// Patch an entry, optionally cascading over its recurring group.
///
/// Series-wide fields (cascaded with `apply_to_future`): bank account,
/// source/category, amount, remarks, `recur_until`. Per-occurrence fields
/// (target only): `due_date`. Settlement state is never patched here; the
/// settlement engine owns that transition.
#[derive(Clone, Debug)]
pub struct UpdateEntryCmd {
    pub kind: EntryKind,
    pub entry_id: Uuid,
    pub user_id: String,
    pub apply_to_future: bool,

    // Series-wide.
    pub bank_account_id: Option<Uuid>,
    pub source_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub amount: Option<Money>,
    pub remarks: Option<String>,
    pub recur_until: Option<NaiveDate>,

    // Per-occurrence.
    pub due_date: Option<NaiveDate>,
}

impl UpdateEntryCmd {
    #[must_use]
    pub fn new(kind: EntryKind, entry_id: Uuid, user_id: impl Into<String>) -> Self {
        Self {
            kind,
            entry_id,
            user_id: user_id.into(),
            apply_to_future: false,
            bank_account_id: None,
            source_id: None,
            category_id: None,
            amount: None,
            remarks: None,
            recur_until: None,
            due_date: None,
        }
    }

    #[must_use]
    pub fn apply_to_future(mut self) -> Self {
        self.apply_to_future = true;
        self
    }

    #[must_use]
    pub fn bank_account_id(mut self, bank_account_id: Uuid) -> Self {
        self.bank_account_id = Some(bank_account_id);
        self
    }

    #[must_use]
    pub fn source_id(mut self, source_id: Uuid) -> Self {
        self.source_id = Some(source_id);
        self
    }

    #[must_use]
    pub fn category_id(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn amount(mut self, amount: Money) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }

    #[must_use]
    pub fn recur_until(mut self, recur_until: NaiveDate) -> Self {
        self.recur_until = Some(recur_until);
        self
    }

    #[must_use]
    pub fn due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }
}
