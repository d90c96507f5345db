use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, bank_accounts, categories, expenses, income_sources, incomes};

use super::Engine;

/// Generates `_owned_by` and `require_` lookups for an entity scoped to the
/// calling user. A record owned by another user is indistinguishable from a
/// missing one.
macro_rules! impl_owned_lookup {
    ($find_fn:ident, $require_fn:ident, $entity:path, $user_col:expr, $err_msg:literal) => {
        async fn $find_fn(
            &self,
            db: &DatabaseTransaction,
            id: Uuid,
            user_id: &str,
        ) -> ResultEngine<Option<<$entity as EntityTrait>::Model>> {
            <$entity>::find_by_id(id)
                .filter($user_col.eq(user_id))
                .one(db)
                .await
                .map_err(Into::into)
        }

        pub(super) async fn $require_fn(
            &self,
            db: &DatabaseTransaction,
            id: Uuid,
            user_id: &str,
        ) -> ResultEngine<<$entity as EntityTrait>::Model> {
            self.$find_fn(db, id, user_id)
                .await?
                .ok_or_else(|| EngineError::NotFound($err_msg.to_string()))
        }
    };
}

impl Engine {
    impl_owned_lookup!(
        bank_account_owned_by,
        require_bank_account,
        bank_accounts::Entity,
        bank_accounts::Column::UserId,
        "bank account"
    );

    impl_owned_lookup!(
        category_owned_by,
        require_category,
        categories::Entity,
        categories::Column::UserId,
        "category"
    );

    impl_owned_lookup!(
        income_source_owned_by,
        require_income_source,
        income_sources::Entity,
        income_sources::Column::UserId,
        "source of income"
    );

    impl_owned_lookup!(
        income_owned_by,
        require_income,
        incomes::Entity,
        incomes::Column::UserId,
        "income"
    );

    impl_owned_lookup!(
        expense_owned_by,
        require_expense,
        expenses::Entity,
        expenses::Column::UserId,
        "expense"
    );
}
