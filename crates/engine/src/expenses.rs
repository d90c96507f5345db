//! Expenses table: debits against a bank account.
//!
//! Same shape as incomes, with an optional category reference instead of a
//! required income source.

use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Entry, EntryKind, Money, entries::recurrence_from_columns,
};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: String,
    pub bank_account_id: Uuid,
    pub category_id: Option<Uuid>,
    pub amount_minor: i64,
    pub remarks: Option<String>,
    pub due_date: Date,
    pub payment_date: Option<Date>,
    pub settled: bool,
    pub is_recurring: bool,
    pub recurring_kind: Option<String>,
    pub recurring_day: Option<i32>,
    pub recur_until: Option<Date>,
    pub recurring_group_id: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bank_accounts::Entity",
        from = "Column::BankAccountId",
        to = "super::bank_accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    BankAccount,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Category,
}

impl Related<super::bank_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BankAccount.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Entry {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let recurrence = recurrence_from_columns(
            model.is_recurring,
            model.recurring_kind.as_deref(),
            model.recurring_day,
            model.recur_until,
        )?;
        Ok(Self {
            id: model.id,
            kind: EntryKind::Expense,
            user_id: model.user_id,
            bank_account_id: model.bank_account_id,
            source_id: None,
            category_id: model.category_id,
            amount: Money::new(model.amount_minor),
            remarks: model.remarks,
            due_date: model.due_date,
            payment_date: model.payment_date,
            settled: model.settled,
            recurrence,
            recurring_group_id: model.recurring_group_id,
        })
    }
}

impl From<&Entry> for ActiveModel {
    fn from(entry: &Entry) -> Self {
        Self {
            id: ActiveValue::Set(entry.id),
            user_id: ActiveValue::Set(entry.user_id.clone()),
            bank_account_id: ActiveValue::Set(entry.bank_account_id),
            category_id: ActiveValue::Set(entry.category_id),
            amount_minor: ActiveValue::Set(entry.amount.cents()),
            remarks: ActiveValue::Set(entry.remarks.clone()),
            due_date: ActiveValue::Set(entry.due_date),
            payment_date: ActiveValue::Set(entry.payment_date),
            settled: ActiveValue::Set(entry.settled),
            is_recurring: ActiveValue::Set(entry.recurrence.is_some()),
            recurring_kind: ActiveValue::Set(
                entry.recurrence.map(|r| r.kind.as_str().to_string()),
            ),
            recurring_day: ActiveValue::Set(
                entry.recurrence.and_then(|r| r.day).map(i32::from),
            ),
            recur_until: ActiveValue::Set(entry.recurrence.and_then(|r| r.until)),
            recurring_group_id: ActiveValue::Set(entry.recurring_group_id),
        }
    }
}
