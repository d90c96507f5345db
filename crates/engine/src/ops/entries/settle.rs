//! Settlement: the only path that flips an entry's `settled` flag and the
//! only entry-driven mutation of an account balance.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, Entry, EntryKind, ResultEngine, bank_accounts};

use super::super::{Engine, with_tx};

impl Engine {
    /// Marks an entry as settled on `settlement_date` and applies its amount
    /// to the linked account balance (credited for incomes, debited for
    /// expenses), atomically.
    ///
    /// Settling an already-settled entry is a [`EngineError::Conflict`]; the
    /// balance is never applied twice.
    pub async fn settle(
        &self,
        kind: EntryKind,
        entry_id: Uuid,
        user_id: &str,
        settlement_date: NaiveDate,
    ) -> ResultEngine<Entry> {
        with_tx!(self, |db_tx| {
            let mut entry = self.require_entry(&db_tx, kind, entry_id, user_id).await?;
            if entry.settled {
                let what = match kind {
                    EntryKind::Income => "income already received",
                    EntryKind::Expense => "expense already paid",
                };
                return Err(EngineError::Conflict(what.to_string()));
            }

            let account = self
                .require_bank_account(&db_tx, entry.bank_account_id, user_id)
                .await?;

            let delta = kind.balance_sign() * entry.amount.cents();
            let balance = account.balance_minor.checked_add(delta).ok_or_else(|| {
                EngineError::Validation("account balance out of range".to_string())
            })?;

            bank_accounts::ActiveModel {
                id: ActiveValue::Set(account.id),
                balance_minor: ActiveValue::Set(balance),
                ..Default::default()
            }
            .update(&db_tx)
            .await?;

            entry.settled = true;
            entry.payment_date = Some(settlement_date);
            self.update_entry_row(&db_tx, &entry).await?;

            tracing::info!(
                entry = %entry.id,
                account = %account.id,
                delta,
                "entry settled"
            );
            Ok(entry)
        })
    }
}
