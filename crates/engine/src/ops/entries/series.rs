//! Edit/delete cascades over recurring groups, and forward extension of
//! open-ended series.
//!
//! Cascades are forward-only: they touch the target occurrence and the
//! occurrences due on or after it, never earlier ones. Settled occurrences
//! are immutable and are reported back as skipped rather than failing the
//! whole operation.

use chrono::NaiveDate;
use sea_orm::{QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Entry, EntryKind, ResultEngine, UpdateEntryCmd, expenses, incomes,
};

use super::super::{Engine, normalize_optional_text, with_tx};

/// What a cascading edit or delete actually did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CascadeOutcome {
    /// Occurrences rewritten, ascending by `(due_date, id)`.
    pub updated: Vec<Entry>,
    /// Occurrences left untouched, with the reason.
    pub skipped: Vec<SkippedOccurrence>,
    /// Occurrences deleted because they fell past a shrunk `recur_until`.
    pub removed: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedOccurrence {
    pub id: Uuid,
    pub due_date: NaiveDate,
    pub reason: SkipReason,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Settled occurrences are historical fact and never rewritten.
    Settled,
}

impl Engine {
    /// Applies a patch to an entry, cascading over its future occurrences
    /// when `apply_to_future` is set and the entry belongs to a recurring
    /// group.
    ///
    /// `due_date` only ever moves the target occurrence. A `recur_until`
    /// earlier than the current series end removes the unsettled occurrences
    /// that fall past it.
    pub async fn update_entry(&self, cmd: UpdateEntryCmd) -> ResultEngine<CascadeOutcome> {
        validate_patch(&cmd)?;

        with_tx!(self, |db_tx| {
            let target = self
                .require_entry(&db_tx, cmd.kind, cmd.entry_id, &cmd.user_id)
                .await?;
            if target.settled {
                return Err(EngineError::Conflict(settled_message(cmd.kind, "edited")));
            }
            if let Some(until) = cmd.recur_until
                && until < target.due_date
            {
                return Err(EngineError::Validation(
                    "recur_until is before the entry due date".to_string(),
                ));
            }
            self.check_patch_references(&db_tx, &cmd).await?;

            let cascade = cmd.apply_to_future && target.recurring_group_id.is_some();
            let members = if cascade {
                let group_id = target
                    .recurring_group_id
                    .ok_or_else(|| EngineError::NotFound("recurring series".to_string()))?;
                self.group_members(&db_tx, cmd.kind, group_id, &cmd.user_id)
                    .await?
                    .into_iter()
                    .filter(|member| member.due_date >= target.due_date)
                    .collect()
            } else {
                vec![target.clone()]
            };

            let mut outcome = CascadeOutcome {
                updated: Vec::new(),
                skipped: Vec::new(),
                removed: 0,
            };

            for mut member in members {
                if member.settled {
                    outcome.skipped.push(SkippedOccurrence {
                        id: member.id,
                        due_date: member.due_date,
                        reason: SkipReason::Settled,
                    });
                    continue;
                }

                if let Some(until) = cmd.recur_until
                    && member.due_date > until
                {
                    self.delete_entry_row(&db_tx, cmd.kind, member.id).await?;
                    outcome.removed += 1;
                    continue;
                }

                let is_target = member.id == target.id;
                apply_patch(&mut member, &cmd, is_target);
                self.update_entry_row(&db_tx, &member).await?;
                outcome.updated.push(member);
            }

            tracing::info!(
                entry = %target.id,
                cascade,
                updated = outcome.updated.len(),
                skipped = outcome.skipped.len(),
                removed = outcome.removed,
                "entry updated"
            );
            Ok(outcome)
        })
    }

    /// Deletes an entry. With `apply_to_future` on a recurring entry, every
    /// unsettled occurrence due on or after the target goes with it. Returns
    /// the number of rows deleted.
    pub async fn delete_entry(
        &self,
        kind: EntryKind,
        entry_id: Uuid,
        user_id: &str,
        apply_to_future: bool,
    ) -> ResultEngine<u64> {
        with_tx!(self, |db_tx| {
            let target = self.require_entry(&db_tx, kind, entry_id, user_id).await?;
            if target.settled {
                return Err(EngineError::Conflict(settled_message(kind, "deleted")));
            }

            let deleted = match (apply_to_future, target.recurring_group_id) {
                (true, Some(group_id)) => match kind {
                    EntryKind::Income => {
                        incomes::Entity::delete_many()
                            .filter(incomes::Column::UserId.eq(user_id))
                            .filter(incomes::Column::RecurringGroupId.eq(group_id))
                            .filter(incomes::Column::DueDate.gte(target.due_date))
                            .filter(incomes::Column::Settled.eq(false))
                            .exec(&db_tx)
                            .await?
                            .rows_affected
                    }
                    EntryKind::Expense => {
                        expenses::Entity::delete_many()
                            .filter(expenses::Column::UserId.eq(user_id))
                            .filter(expenses::Column::RecurringGroupId.eq(group_id))
                            .filter(expenses::Column::DueDate.gte(target.due_date))
                            .filter(expenses::Column::Settled.eq(false))
                            .exec(&db_tx)
                            .await?
                            .rows_affected
                    }
                },
                _ => {
                    self.delete_entry_row(&db_tx, kind, entry_id).await?;
                    1
                }
            };

            tracing::info!(entry = %target.id, deleted, "entry deleted");
            Ok(deleted)
        })
    }

    /// Materializes further occurrences of an open-ended series, up to
    /// `through` (clamped to `recur_until` when the series has one). Returns
    /// the newly created occurrences in date order.
    pub async fn extend_series(
        &self,
        kind: EntryKind,
        group_id: Uuid,
        user_id: &str,
        through: NaiveDate,
    ) -> ResultEngine<Vec<Entry>> {
        with_tx!(self, |db_tx| {
            let members = self.group_members(&db_tx, kind, group_id, user_id).await?;
            let Some(last) = members.last() else {
                return Err(EngineError::NotFound("recurring series".to_string()));
            };
            let recurrence = last
                .recurrence
                .ok_or_else(|| EngineError::NotFound("recurring series".to_string()))?;

            let through = match recurrence.until {
                Some(until) => through.min(until),
                None => through,
            };

            let mut created = Vec::new();
            for date in recurrence.dates_after(last.due_date, through)? {
                let mut occurrence = last.clone();
                occurrence.id = Uuid::new_v4();
                occurrence.due_date = date;
                occurrence.payment_date = None;
                occurrence.settled = false;
                self.insert_entry(&db_tx, &occurrence).await?;
                created.push(occurrence);
            }

            tracing::info!(group = %group_id, created = created.len(), "series extended");
            Ok(created)
        })
    }

    async fn delete_entry_row(
        &self,
        db: &sea_orm::DatabaseTransaction,
        kind: EntryKind,
        entry_id: Uuid,
    ) -> ResultEngine<()> {
        match kind {
            EntryKind::Income => {
                incomes::Entity::delete_by_id(entry_id).exec(db).await?;
            }
            EntryKind::Expense => {
                expenses::Entity::delete_by_id(entry_id).exec(db).await?;
            }
        }
        Ok(())
    }

    async fn check_patch_references(
        &self,
        db: &sea_orm::DatabaseTransaction,
        cmd: &UpdateEntryCmd,
    ) -> ResultEngine<()> {
        if let Some(account_id) = cmd.bank_account_id {
            self.require_bank_account(db, account_id, &cmd.user_id).await?;
        }
        if let Some(source_id) = cmd.source_id {
            self.require_income_source(db, source_id, &cmd.user_id).await?;
        }
        if let Some(category_id) = cmd.category_id {
            self.require_category(db, category_id, &cmd.user_id).await?;
        }
        Ok(())
    }
}

fn validate_patch(cmd: &UpdateEntryCmd) -> ResultEngine<()> {
    match cmd.kind {
        EntryKind::Income if cmd.category_id.is_some() => {
            return Err(EngineError::Validation(
                "an income has no category".to_string(),
            ));
        }
        EntryKind::Expense if cmd.source_id.is_some() => {
            return Err(EngineError::Validation(
                "an expense has no source of income".to_string(),
            ));
        }
        _ => {}
    }
    if let Some(amount) = cmd.amount
        && !amount.is_positive()
    {
        return Err(EngineError::Validation("amount must be > 0".to_string()));
    }
    Ok(())
}

fn apply_patch(member: &mut Entry, cmd: &UpdateEntryCmd, is_target: bool) {
    if let Some(account_id) = cmd.bank_account_id {
        member.bank_account_id = account_id;
    }
    if let Some(source_id) = cmd.source_id {
        member.source_id = Some(source_id);
    }
    if let Some(category_id) = cmd.category_id {
        member.category_id = Some(category_id);
    }
    if let Some(amount) = cmd.amount {
        member.amount = amount;
    }
    if let Some(remarks) = &cmd.remarks {
        member.remarks = normalize_optional_text(Some(remarks));
    }
    if let Some(until) = cmd.recur_until
        && let Some(recurrence) = &mut member.recurrence
    {
        recurrence.until = Some(until);
    }
    if is_target && let Some(due_date) = cmd.due_date {
        member.due_date = due_date;
    }
}

fn settled_message(kind: EntryKind, action: &str) -> String {
    let what = match kind {
        EntryKind::Income => "a received income",
        EntryKind::Expense => "a paid expense",
    };
    format!("{what} cannot be {action}")
}
