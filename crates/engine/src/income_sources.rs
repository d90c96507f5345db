//! Sources of income (employer, client, ...), referenced by income records.
//!
//! Deletion is blocked while any income still references the source.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "income_sources")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::incomes::Entity")]
    Incomes,
}

impl Related<super::incomes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Incomes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeSource {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
}

impl From<Model> for IncomeSource {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
        }
    }
}

impl From<&IncomeSource> for ActiveModel {
    fn from(source: &IncomeSource) -> Self {
        Self {
            id: ActiveValue::Set(source.id),
            user_id: ActiveValue::Set(source.user_id.clone()),
            name: ActiveValue::Set(source.name.clone()),
        }
    }
}
