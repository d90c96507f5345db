//! Bank accounts: the sole owners of balances.
//!
//! The balance is only ever adjusted by the settlement engine or by a direct
//! edit; incomes and expenses hold references, never ownership.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Money;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bank_accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub balance_minor: i64,
    pub account_number: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::incomes::Entity")]
    Incomes,
    #[sea_orm(has_many = "super::expenses::Entity")]
    Expenses,
}

impl Related<super::incomes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Incomes.def()
    }
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub balance: Money,
    pub account_number: Option<String>,
}

impl From<Model> for BankAccount {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            balance: Money::new(model.balance_minor),
            account_number: model.account_number,
        }
    }
}

impl From<&BankAccount> for ActiveModel {
    fn from(account: &BankAccount) -> Self {
        Self {
            id: ActiveValue::Set(account.id),
            user_id: ActiveValue::Set(account.user_id.clone()),
            name: ActiveValue::Set(account.name.clone()),
            balance_minor: ActiveValue::Set(account.balance.cents()),
            account_number: ActiveValue::Set(account.account_number.clone()),
        }
    }
}
