//! Page-number pagination for entity lists.

use serde::{Deserialize, Serialize};

/// Pagination metadata returned alongside every list page.
///
/// `from`/`to` are 1-based item positions within the whole result set and are
/// `None` for an empty page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub current_page: u64,
    pub per_page: u64,
    pub total: u64,
    pub from: Option<u64>,
    pub to: Option<u64>,
    pub last_page: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl PageMeta {
    pub(crate) fn new(current_page: u64, per_page: u64, total: u64, items_on_page: u64) -> Self {
        let last_page = if total == 0 {
            1
        } else {
            total.div_ceil(per_page)
        };
        let (from, to) = if items_on_page == 0 {
            (None, None)
        } else {
            let from = (current_page - 1) * per_page + 1;
            (Some(from), Some(from + items_on_page - 1))
        };
        Self {
            current_page,
            per_page,
            total,
            from,
            to,
            last_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_positions_are_one_based() {
        let meta = PageMeta::new(2, 10, 25, 10);
        assert_eq!(meta.from, Some(11));
        assert_eq!(meta.to, Some(20));
        assert_eq!(meta.last_page, 3);
    }

    #[test]
    fn empty_result_has_no_positions() {
        let meta = PageMeta::new(1, 10, 0, 0);
        assert_eq!(meta.from, None);
        assert_eq!(meta.to, None);
        assert_eq!(meta.last_page, 1);
    }
}
