//! Core engine for a personal-finance tracker: recurring incomes and
//! expenses, settlement against bank account balances, cascading edits over
//! recurring series, and a chronological ledger projection.
//!
//! All state lives in the database; every operation is scoped to an opaque
//! `user_id` and runs inside a transaction.

pub use bank_accounts::BankAccount;
pub use categories::Category;
pub use commands::{CreateExpenseCmd, CreateIncomeCmd, UpdateEntryCmd};
pub use entries::{Entry, EntryKind};
pub use error::EngineError;
pub use income_sources::IncomeSource;
pub use ledger::{
    Ledger, LedgerItem, LedgerItemKind, LedgerItemStatus, LedgerMeta, LedgerSummary,
    RunningBalance, running_balance_at,
};
pub use money::Money;
pub use ops::{
    CascadeOutcome, Engine, EngineBuilder, EntryListFilter, SkipReason, SkippedOccurrence,
};
pub use pagination::{Page, PageMeta};
pub use recurrence::{Recurrence, RecurrenceKind, is_series_expired, next_occurrence};

mod bank_accounts;
mod categories;
mod commands;
mod entries;
mod error;
mod expenses;
mod income_sources;
mod incomes;
mod ledger;
mod money;
mod ops;
mod pagination;
mod recurrence;

type ResultEngine<T> = Result<T, EngineError>;
