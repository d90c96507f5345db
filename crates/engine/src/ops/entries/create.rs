use chrono::Months;
use sea_orm::TransactionTrait;
use uuid::Uuid;

use crate::{
    CreateExpenseCmd, CreateIncomeCmd, EngineError, Entry, EntryKind, ResultEngine,
};

use super::super::{Engine, normalize_optional_text, with_tx};

/// How far ahead an open-ended series is materialized at creation. Callers
/// page further forward via `extend_series`.
const OPEN_ENDED_HORIZON_MONTHS: u32 = 12;

impl Engine {
    /// Creates an income entry.
    ///
    /// A recurring template gets a fresh `recurring_group_id` and its series
    /// is materialized in the same transaction; all spawned occurrences are
    /// returned in date order, the template first.
    pub async fn create_income(&self, cmd: CreateIncomeCmd) -> ResultEngine<Vec<Entry>> {
        let CreateIncomeCmd {
            user_id,
            bank_account_id,
            source_id,
            amount,
            remarks,
            due_date,
            recurrence,
        } = cmd;

        let template = Entry {
            id: Uuid::new_v4(),
            kind: EntryKind::Income,
            user_id,
            bank_account_id,
            source_id: Some(source_id),
            category_id: None,
            amount,
            remarks: normalize_optional_text(remarks.as_deref()),
            due_date,
            payment_date: None,
            settled: false,
            recurrence,
            recurring_group_id: recurrence.map(|_| Uuid::new_v4()),
        };
        validate_new_entry(&template)?;

        with_tx!(self, |db_tx| {
            self.require_bank_account(&db_tx, template.bank_account_id, &template.user_id)
                .await?;
            self.require_income_source(&db_tx, source_id, &template.user_id)
                .await?;

            let occurrences = materialize_series(&template)?;
            for occurrence in &occurrences {
                self.insert_entry(&db_tx, occurrence).await?;
            }

            tracing::debug!(
                entry = %template.id,
                occurrences = occurrences.len(),
                "income created"
            );
            Ok(occurrences)
        })
    }

    /// Creates an expense entry; see [`Engine::create_income`] for the
    /// recurring-template behavior.
    pub async fn create_expense(&self, cmd: CreateExpenseCmd) -> ResultEngine<Vec<Entry>> {
        let CreateExpenseCmd {
            user_id,
            bank_account_id,
            category_id,
            amount,
            remarks,
            due_date,
            recurrence,
        } = cmd;

        let template = Entry {
            id: Uuid::new_v4(),
            kind: EntryKind::Expense,
            user_id,
            bank_account_id,
            source_id: None,
            category_id,
            amount,
            remarks: normalize_optional_text(remarks.as_deref()),
            due_date,
            payment_date: None,
            settled: false,
            recurrence,
            recurring_group_id: recurrence.map(|_| Uuid::new_v4()),
        };
        validate_new_entry(&template)?;

        with_tx!(self, |db_tx| {
            self.require_bank_account(&db_tx, template.bank_account_id, &template.user_id)
                .await?;
            if let Some(category_id) = template.category_id {
                self.require_category(&db_tx, category_id, &template.user_id)
                    .await?;
            }

            let occurrences = materialize_series(&template)?;
            for occurrence in &occurrences {
                self.insert_entry(&db_tx, occurrence).await?;
            }

            tracing::debug!(
                entry = %template.id,
                occurrences = occurrences.len(),
                "expense created"
            );
            Ok(occurrences)
        })
    }
}

fn validate_new_entry(entry: &Entry) -> ResultEngine<()> {
    if !entry.amount.is_positive() {
        return Err(EngineError::Validation("amount must be > 0".to_string()));
    }
    if let Some(recurrence) = &entry.recurrence {
        recurrence.validate()?;
        if let Some(until) = recurrence.until
            && until < entry.due_date
        {
            return Err(EngineError::Validation(
                "recur_until is before the first due date".to_string(),
            ));
        }
    }
    Ok(())
}

/// Expands a template into its occurrences (template included, date order).
///
/// A series with `recur_until` is materialized in full; an open-ended one
/// stops at the creation horizon.
fn materialize_series(template: &Entry) -> ResultEngine<Vec<Entry>> {
    let mut occurrences = vec![template.clone()];
    let Some(recurrence) = template.recurrence else {
        return Ok(occurrences);
    };

    let through = match recurrence.until {
        Some(until) => until,
        None => template
            .due_date
            .checked_add_months(Months::new(OPEN_ENDED_HORIZON_MONTHS))
            .ok_or_else(|| EngineError::Validation("due date out of range".to_string()))?,
    };

    for date in recurrence.dates_after(template.due_date, through)? {
        let mut occurrence = template.clone();
        occurrence.id = Uuid::new_v4();
        occurrence.due_date = date;
        occurrences.push(occurrence);
    }
    Ok(occurrences)
}
