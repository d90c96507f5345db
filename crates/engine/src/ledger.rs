//! Ledger projection types and the running-balance computation.
//!
//! The projection merges incomes (credits) and expenses (debits) into one
//! chronological feed. Ordering is ascending `(date, id)` so that ties on the
//! same calendar day resolve deterministically; the running balance depends
//! on that order being stable.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerItemKind {
    Credit,
    Debit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerItemStatus {
    Completed,
    Pending,
}

/// One row of the projected ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerItem {
    pub id: Uuid,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Money,
    pub kind: LedgerItemKind,
    pub status: LedgerItemStatus,
    pub category: String,
    pub account_name: String,
}

/// Projected totals over the window, **including pending items**.
///
/// This is a forward-looking cash-flow projection, not a cash-basis ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub total_credit: Money,
    pub total_debit: Money,
    pub net_flow: Money,
}

impl LedgerSummary {
    #[must_use]
    pub fn from_items(items: &[LedgerItem]) -> Self {
        let mut total_credit = Money::ZERO;
        let mut total_debit = Money::ZERO;
        for item in items {
            match item.kind {
                LedgerItemKind::Credit => total_credit += item.amount,
                LedgerItemKind::Debit => total_debit += item.amount,
            }
        }
        Self {
            total_credit,
            total_debit,
            net_flow: total_credit - total_debit,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerMeta {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub count: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    pub items: Vec<LedgerItem>,
    pub summary: LedgerSummary,
    pub meta: LedgerMeta,
}

/// Cumulative credit/debit totals through one ledger item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningBalance {
    pub credit: Money,
    pub debit: Money,
    pub balance: Money,
}

pub(crate) fn ledger_order(a: &LedgerItem, b: &LedgerItem) -> std::cmp::Ordering {
    a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id))
}

/// Sums credit/debit for every item up to and including `target_id`, in
/// ascending `(date, id)` order.
///
/// Recomputed on demand: O(n) per call, always consistent with the item set.
pub fn running_balance_at(items: &[LedgerItem], target_id: Uuid) -> ResultEngine<RunningBalance> {
    if !items.iter().any(|item| item.id == target_id) {
        return Err(EngineError::NotFound("ledger item".to_string()));
    }

    let mut ordered: Vec<&LedgerItem> = items.iter().collect();
    ordered.sort_by(|a, b| ledger_order(a, b));

    let mut credit = Money::ZERO;
    let mut debit = Money::ZERO;
    for item in ordered {
        match item.kind {
            LedgerItemKind::Credit => credit += item.amount,
            LedgerItemKind::Debit => debit += item.amount,
        }
        if item.id == target_id {
            break;
        }
    }

    Ok(RunningBalance {
        credit,
        debit,
        balance: credit - debit,
    })
}
