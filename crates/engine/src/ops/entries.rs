//! Shared plumbing for income/expense operations.
//!
//! The two entry tables are symmetric; everything here dispatches on
//! [`EntryKind`] once and hands the ops a uniform [`Entry`] view.

use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{Entry, EntryKind, ResultEngine, expenses, incomes};

use super::{Engine, with_tx};

mod create;
mod list;
mod series;
mod settle;

pub use list::EntryListFilter;
pub use series::{CascadeOutcome, SkipReason, SkippedOccurrence};

impl Engine {
    /// Returns one entry owned by the caller.
    pub async fn entry(
        &self,
        kind: EntryKind,
        entry_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Entry> {
        with_tx!(self, |db_tx| {
            self.require_entry(&db_tx, kind, entry_id, user_id).await
        })
    }

    pub(super) async fn require_entry(
        &self,
        db: &DatabaseTransaction,
        kind: EntryKind,
        entry_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Entry> {
        match kind {
            EntryKind::Income => {
                Entry::try_from(self.require_income(db, entry_id, user_id).await?)
            }
            EntryKind::Expense => {
                Entry::try_from(self.require_expense(db, entry_id, user_id).await?)
            }
        }
    }

    pub(super) async fn insert_entry(
        &self,
        db: &DatabaseTransaction,
        entry: &Entry,
    ) -> ResultEngine<()> {
        match entry.kind {
            EntryKind::Income => {
                incomes::ActiveModel::try_from(entry)?.insert(db).await?;
            }
            EntryKind::Expense => {
                expenses::ActiveModel::from(entry).insert(db).await?;
            }
        }
        Ok(())
    }

    /// Rewrites a full entry row from its domain view.
    pub(super) async fn update_entry_row(
        &self,
        db: &DatabaseTransaction,
        entry: &Entry,
    ) -> ResultEngine<()> {
        match entry.kind {
            EntryKind::Income => {
                incomes::ActiveModel::try_from(entry)?.update(db).await?;
            }
            EntryKind::Expense => {
                expenses::ActiveModel::from(entry).update(db).await?;
            }
        }
        Ok(())
    }

    /// All occurrences of a recurring group, ascending by `(due_date, id)`.
    pub(super) async fn group_members(
        &self,
        db: &DatabaseTransaction,
        kind: EntryKind,
        group_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Vec<Entry>> {
        match kind {
            EntryKind::Income => {
                let models = incomes::Entity::find()
                    .filter(incomes::Column::UserId.eq(user_id))
                    .filter(incomes::Column::RecurringGroupId.eq(group_id))
                    .order_by_asc(incomes::Column::DueDate)
                    .order_by_asc(incomes::Column::Id)
                    .all(db)
                    .await?;
                models.into_iter().map(Entry::try_from).collect()
            }
            EntryKind::Expense => {
                let models = expenses::Entity::find()
                    .filter(expenses::Column::UserId.eq(user_id))
                    .filter(expenses::Column::RecurringGroupId.eq(group_id))
                    .order_by_asc(expenses::Column::DueDate)
                    .order_by_asc(expenses::Column::Id)
                    .all(db)
                    .await?;
                models.into_iter().map(Entry::try_from).collect()
            }
        }
    }
}
