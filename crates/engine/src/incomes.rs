//! Incomes table: credits against a bank account.

use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Entry, EntryKind, Money, ResultEngine, entries::recurrence_from_columns,
};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "incomes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: String,
    pub bank_account_id: Uuid,
    pub source_id: Uuid,
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
        belongs_to = "super::income_sources::Entity",
        from = "Column::SourceId",
        to = "super::income_sources::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Source,
}

impl Related<super::bank_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BankAccount.def()
    }
}

impl Related<super::income_sources::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Source.def()
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
            kind: EntryKind::Income,
            user_id: model.user_id,
            bank_account_id: model.bank_account_id,
            source_id: Some(model.source_id),
            category_id: None,
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

impl TryFrom<&Entry> for ActiveModel {
    type Error = EngineError;

    fn try_from(entry: &Entry) -> ResultEngine<Self> {
        let source_id = entry
            .source_id
            .ok_or_else(|| EngineError::Validation("income requires a source".to_string()))?;
        Ok(Self {
            id: ActiveValue::Set(entry.id),
            user_id: ActiveValue::Set(entry.user_id.clone()),
            bank_account_id: ActiveValue::Set(entry.bank_account_id),
            source_id: ActiveValue::Set(source_id),
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
        })
    }
}
