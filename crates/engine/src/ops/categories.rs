//! Category CRUD. Deletion is blocked while expenses reference the category.

use sea_orm::{
    ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{Category, EngineError, Page, PageMeta, ResultEngine, categories, expenses};

use super::{Engine, normalize_optional_text, normalize_required_name, with_tx};

impl Engine {
    pub async fn create_category(
        &self,
        user_id: &str,
        name: &str,
        description: Option<&str>,
    ) -> ResultEngine<Category> {
        let category = Category {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            name: normalize_required_name(name, "category")?,
            description: normalize_optional_text(description),
        };

        with_tx!(self, |db_tx| {
            categories::ActiveModel::from(&category)
                .insert(&db_tx)
                .await?;
            Ok(category)
        })
    }

    pub async fn update_category(
        &self,
        user_id: &str,
        category_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> ResultEngine<Category> {
        let name = normalize_required_name(name, "category")?;
        with_tx!(self, |db_tx| {
            self.require_category(&db_tx, category_id, user_id).await?;

            let model = categories::ActiveModel {
                id: ActiveValue::Set(category_id),
                name: ActiveValue::Set(name),
                description: ActiveValue::Set(normalize_optional_text(description)),
                ..Default::default()
            }
            .update(&db_tx)
            .await?;

            Ok(Category::from(model))
        })
    }

    pub async fn delete_category(&self, user_id: &str, category_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_category(&db_tx, category_id, user_id).await?;

            let referenced = expenses::Entity::find()
                .filter(expenses::Column::CategoryId.eq(category_id))
                .count(&db_tx)
                .await?;
            if referenced > 0 {
                return Err(EngineError::InUse(model.name));
            }

            categories::Entity::delete_by_id(category_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    pub async fn category(&self, user_id: &str, category_id: Uuid) -> ResultEngine<Category> {
        with_tx!(self, |db_tx| {
            let model = self.require_category(&db_tx, category_id, user_id).await?;
            Ok(Category::from(model))
        })
    }

    pub async fn list_categories(
        &self,
        user_id: &str,
        page: u64,
        per_page: u64,
        search: Option<&str>,
    ) -> ResultEngine<Page<Category>> {
        let page = page.max(1);
        let per_page = if per_page == 0 { 15 } else { per_page.min(100) };

        with_tx!(self, |db_tx| {
            let mut query = categories::Entity::find()
                .filter(categories::Column::UserId.eq(user_id))
                .order_by_asc(categories::Column::Name);
            if let Some(search) = normalize_optional_text(search) {
                query = query.filter(categories::Column::Name.contains(&search));
            }

            let paginator = query.paginate(&db_tx, per_page);
            let total = paginator.num_items().await?;
            let models = paginator.fetch_page(page - 1).await?;

            let items: Vec<Category> = models.into_iter().map(Category::from).collect();
            let meta = PageMeta::new(page, per_page, total, items.len() as u64);
            Ok(Page { items, meta })
        })
    }
}
