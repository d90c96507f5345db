//! Source-of-income CRUD. Deletion is blocked while incomes reference the
//! source.

use sea_orm::{
    ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{EngineError, IncomeSource, Page, PageMeta, ResultEngine, income_sources, incomes};

use super::{Engine, normalize_optional_text, normalize_required_name, with_tx};

impl Engine {
    pub async fn create_income_source(
        &self,
        user_id: &str,
        name: &str,
    ) -> ResultEngine<IncomeSource> {
        let source = IncomeSource {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            name: normalize_required_name(name, "source of income")?,
        };

        with_tx!(self, |db_tx| {
            income_sources::ActiveModel::from(&source)
                .insert(&db_tx)
                .await?;
            Ok(source)
        })
    }

    pub async fn update_income_source(
        &self,
        user_id: &str,
        source_id: Uuid,
        name: &str,
    ) -> ResultEngine<IncomeSource> {
        let name = normalize_required_name(name, "source of income")?;
        with_tx!(self, |db_tx| {
            self.require_income_source(&db_tx, source_id, user_id).await?;

            let model = income_sources::ActiveModel {
                id: ActiveValue::Set(source_id),
                name: ActiveValue::Set(name),
                ..Default::default()
            }
            .update(&db_tx)
            .await?;

            Ok(IncomeSource::from(model))
        })
    }

    pub async fn delete_income_source(&self, user_id: &str, source_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_income_source(&db_tx, source_id, user_id).await?;

            let referenced = incomes::Entity::find()
                .filter(incomes::Column::SourceId.eq(source_id))
                .count(&db_tx)
                .await?;
            if referenced > 0 {
                return Err(EngineError::InUse(model.name));
            }

            income_sources::Entity::delete_by_id(source_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    pub async fn income_source(
        &self,
        user_id: &str,
        source_id: Uuid,
    ) -> ResultEngine<IncomeSource> {
        with_tx!(self, |db_tx| {
            let model = self.require_income_source(&db_tx, source_id, user_id).await?;
            Ok(IncomeSource::from(model))
        })
    }

    pub async fn list_income_sources(
        &self,
        user_id: &str,
        page: u64,
        per_page: u64,
        search: Option<&str>,
    ) -> ResultEngine<Page<IncomeSource>> {
        let page = page.max(1);
        let per_page = if per_page == 0 { 15 } else { per_page.min(100) };

        with_tx!(self, |db_tx| {
            let mut query = income_sources::Entity::find()
                .filter(income_sources::Column::UserId.eq(user_id))
                .order_by_asc(income_sources::Column::Name);
            if let Some(search) = normalize_optional_text(search) {
                query = query.filter(income_sources::Column::Name.contains(&search));
            }

            let paginator = query.paginate(&db_tx, per_page);
            let total = paginator.num_items().await?;
            let models = paginator.fetch_page(page - 1).await?;

            let items: Vec<IncomeSource> = models.into_iter().map(IncomeSource::from).collect();
            let meta = PageMeta::new(page, per_page, total, items.len() as u64);
            Ok(Page { items, meta })
        })
    }
}
