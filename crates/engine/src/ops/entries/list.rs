//! Paginated entry listing with date-range, settlement and recurrence
//! filters.

use chrono::NaiveDate;
use sea_orm::{PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    EngineError, Entry, EntryKind, Page, PageMeta, ResultEngine, expenses, incomes,
};

use super::super::{Engine, normalize_optional_text, with_tx};

/// Filters for [`Engine::list_entries`]. A default filter lists everything,
/// first page.
#[derive(Clone, Debug, Default)]
pub struct EntryListFilter {
    pub page: u64,
    pub per_page: u64,
    /// Substring match on remarks.
    pub search: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub settled: Option<bool>,
    pub recurring: Option<bool>,
}

/// Builds the filtered query for one entry table; the two tables are
/// column-compatible, so this only varies in the module it is given.
macro_rules! filtered_entries {
    ($table:ident, $db:expr, $user_id:expr, $filter:expr, $page:expr, $per_page:expr) => {{
        let mut query = $table::Entity::find()
            .filter($table::Column::UserId.eq($user_id))
            .order_by_asc($table::Column::DueDate)
            .order_by_asc($table::Column::Id);
        if let Some(search) = normalize_optional_text($filter.search.as_deref()) {
            query = query.filter($table::Column::Remarks.contains(&search));
        }
        if let Some(start_date) = $filter.start_date {
            query = query.filter($table::Column::DueDate.gte(start_date));
        }
        if let Some(end_date) = $filter.end_date {
            query = query.filter($table::Column::DueDate.lte(end_date));
        }
        if let Some(settled) = $filter.settled {
            query = query.filter($table::Column::Settled.eq(settled));
        }
        if let Some(recurring) = $filter.recurring {
            query = query.filter($table::Column::IsRecurring.eq(recurring));
        }

        let paginator = query.paginate($db, $per_page);
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page($page - 1).await?;
        let items = models
            .into_iter()
            .map(Entry::try_from)
            .collect::<ResultEngine<Vec<Entry>>>()?;
        (items, total)
    }};
}

impl Engine {
    /// Lists the caller's entries of one kind, ascending by `(due_date, id)`.
    pub async fn list_entries(
        &self,
        kind: EntryKind,
        user_id: &str,
        filter: &EntryListFilter,
    ) -> ResultEngine<Page<Entry>> {
        if let (Some(start_date), Some(end_date)) = (filter.start_date, filter.end_date)
            && start_date > end_date
        {
            return Err(EngineError::Validation(
                "start date is after end date".to_string(),
            ));
        }

        let page = filter.page.max(1);
        let per_page = if filter.per_page == 0 {
            15
        } else {
            filter.per_page.min(100)
        };

        with_tx!(self, |db_tx| {
            let (items, total) = match kind {
                EntryKind::Income => {
                    filtered_entries!(incomes, &db_tx, user_id, filter, page, per_page)
                }
                EntryKind::Expense => {
                    filtered_entries!(expenses, &db_tx, user_id, filter, page, per_page)
                }
            };

            let meta = PageMeta::new(page, per_page, total, items.len() as u64);
            Ok(Page { items, meta })
        })
    }
}
