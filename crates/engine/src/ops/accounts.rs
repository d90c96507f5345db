//! Bank account CRUD.
//!
//! The balance stored here is only ever mutated by the settlement engine or a
//! direct edit through [`Engine::update_bank_account`]. Deleting an account
//! that incomes or expenses still reference is rejected; financial history is
//! never cascade-deleted.

use sea_orm::{
    ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    BankAccount, EngineError, Money, Page, PageMeta, ResultEngine, bank_accounts, expenses,
    incomes,
};

use super::{Engine, normalize_optional_text, normalize_required_name, with_tx};

impl Engine {
    pub async fn create_bank_account(
        &self,
        user_id: &str,
        name: &str,
        balance: Money,
        account_number: Option<&str>,
    ) -> ResultEngine<BankAccount> {
        let account = BankAccount {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            name: normalize_required_name(name, "bank account")?,
            balance,
            account_number: normalize_optional_text(account_number),
        };

        with_tx!(self, |db_tx| {
            bank_accounts::ActiveModel::from(&account)
                .insert(&db_tx)
                .await?;
            Ok(account)
        })
    }

    /// Full update of an account (name, balance, account number).
    ///
    /// A balance edit here bypasses settlement entirely; it is the "direct
    /// edit" path and carries no entry-side effects.
    pub async fn update_bank_account(
        &self,
        user_id: &str,
        account_id: Uuid,
        name: &str,
        balance: Money,
        account_number: Option<&str>,
    ) -> ResultEngine<BankAccount> {
        let name = normalize_required_name(name, "bank account")?;
        with_tx!(self, |db_tx| {
            self.require_bank_account(&db_tx, account_id, user_id).await?;

            let model = bank_accounts::ActiveModel {
                id: ActiveValue::Set(account_id),
                name: ActiveValue::Set(name),
                balance_minor: ActiveValue::Set(balance.cents()),
                account_number: ActiveValue::Set(normalize_optional_text(account_number)),
                ..Default::default()
            }
            .update(&db_tx)
            .await?;

            Ok(BankAccount::from(model))
        })
    }

    pub async fn delete_bank_account(&self, user_id: &str, account_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_bank_account(&db_tx, account_id, user_id).await?;

            let incomes_count = incomes::Entity::find()
                .filter(incomes::Column::BankAccountId.eq(account_id))
                .count(&db_tx)
                .await?;
            let expenses_count = expenses::Entity::find()
                .filter(expenses::Column::BankAccountId.eq(account_id))
                .count(&db_tx)
                .await?;
            if incomes_count + expenses_count > 0 {
                return Err(EngineError::InUse(model.name));
            }

            bank_accounts::Entity::delete_by_id(account_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    pub async fn bank_account(
        &self,
        user_id: &str,
        account_id: Uuid,
    ) -> ResultEngine<BankAccount> {
        with_tx!(self, |db_tx| {
            let model = self.require_bank_account(&db_tx, account_id, user_id).await?;
            Ok(BankAccount::from(model))
        })
    }

    pub async fn list_bank_accounts(
        &self,
        user_id: &str,
        page: u64,
        per_page: u64,
        search: Option<&str>,
    ) -> ResultEngine<Page<BankAccount>> {
        let page = page.max(1);
        let per_page = if per_page == 0 { 15 } else { per_page.min(100) };

        with_tx!(self, |db_tx| {
            let mut query = bank_accounts::Entity::find()
                .filter(bank_accounts::Column::UserId.eq(user_id))
                .order_by_asc(bank_accounts::Column::Name);
            if let Some(search) = normalize_optional_text(search) {
                query = query.filter(bank_accounts::Column::Name.contains(&search));
            }

            let paginator = query.paginate(&db_tx, per_page);
            let total = paginator.num_items().await?;
            let models = paginator.fetch_page(page - 1).await?;

            let items: Vec<BankAccount> = models.into_iter().map(BankAccount::from).collect();
            let meta = PageMeta::new(page, per_page, total, items.len() as u64);
            Ok(Page { items, meta })
        })
    }
}
