//! Ledger projection: merges both entry tables into one chronological feed
//! over a date window.

use std::collections::HashMap;

use chrono::NaiveDate;
use sea_orm::{DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Ledger, LedgerItem, LedgerItemKind, LedgerItemStatus, LedgerMeta, LedgerSummary,
    Money, ResultEngine, bank_accounts, categories, expenses, income_sources, incomes,
    ledger::ledger_order,
};

use super::{Engine, with_tx};

impl Engine {
    /// Projects the caller's ledger over `[start_date, end_date]` (inclusive,
    /// keyed on due date). Items come back ascending by `(date, id)` with the
    /// window totals precomputed.
    pub async fn ledger(
        &self,
        user_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> ResultEngine<Ledger> {
        if start_date > end_date {
            return Err(EngineError::Validation(
                "start date is after end date".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let account_names = self.account_names(&db_tx, user_id).await?;
            let source_names = self.source_names(&db_tx, user_id).await?;
            let category_names = self.category_names(&db_tx, user_id).await?;

            let mut items = Vec::new();

            let income_rows = incomes::Entity::find()
                .filter(incomes::Column::UserId.eq(user_id))
                .filter(incomes::Column::DueDate.gte(start_date))
                .filter(incomes::Column::DueDate.lte(end_date))
                .all(&db_tx)
                .await?;
            for row in income_rows {
                let category = source_names
                    .get(&row.source_id)
                    .cloned()
                    .unwrap_or_else(|| "Income".to_string());
                items.push(LedgerItem {
                    id: row.id,
                    date: row.due_date,
                    description: row.remarks.unwrap_or_else(|| category.clone()),
                    amount: Money::new(row.amount_minor),
                    kind: LedgerItemKind::Credit,
                    status: status_of(row.settled),
                    category,
                    account_name: account_name(&account_names, row.bank_account_id),
                });
            }

            let expense_rows = expenses::Entity::find()
                .filter(expenses::Column::UserId.eq(user_id))
                .filter(expenses::Column::DueDate.gte(start_date))
                .filter(expenses::Column::DueDate.lte(end_date))
                .all(&db_tx)
                .await?;
            for row in expense_rows {
                let category = row
                    .category_id
                    .and_then(|id| category_names.get(&id).cloned())
                    .unwrap_or_else(|| "Uncategorized".to_string());
                items.push(LedgerItem {
                    id: row.id,
                    date: row.due_date,
                    description: row.remarks.unwrap_or_else(|| category.clone()),
                    amount: Money::new(row.amount_minor),
                    kind: LedgerItemKind::Debit,
                    status: status_of(row.settled),
                    category,
                    account_name: account_name(&account_names, row.bank_account_id),
                });
            }

            items.sort_by(ledger_order);
            let summary = LedgerSummary::from_items(&items);
            let meta = LedgerMeta {
                start_date,
                end_date,
                count: items.len() as u64,
            };
            Ok(Ledger {
                items,
                summary,
                meta,
            })
        })
    }

    async fn account_names(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
    ) -> ResultEngine<HashMap<Uuid, String>> {
        let models = bank_accounts::Entity::find()
            .filter(bank_accounts::Column::UserId.eq(user_id))
            .all(db)
            .await?;
        Ok(models.into_iter().map(|m| (m.id, m.name)).collect())
    }

    async fn source_names(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
    ) -> ResultEngine<HashMap<Uuid, String>> {
        let models = income_sources::Entity::find()
            .filter(income_sources::Column::UserId.eq(user_id))
            .all(db)
            .await?;
        Ok(models.into_iter().map(|m| (m.id, m.name)).collect())
    }

    async fn category_names(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
    ) -> ResultEngine<HashMap<Uuid, String>> {
        let models = categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id))
            .all(db)
            .await?;
        Ok(models.into_iter().map(|m| (m.id, m.name)).collect())
    }
}

fn status_of(settled: bool) -> LedgerItemStatus {
    if settled {
        LedgerItemStatus::Completed
    } else {
        LedgerItemStatus::Pending
    }
}

fn account_name(names: &HashMap<Uuid, String>, account_id: Uuid) -> String {
    names.get(&account_id).cloned().unwrap_or_default()
}
