use std::cmp::Ordering;

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::ledger::{
    CategoryTotal, EntryKind, LedgerStore, Period, Stats, TransactionFilter,
};

/// Upper bound on transactions included in an advisory snapshot.
pub const MAX_RECENT_TRANSACTIONS: usize = 20;

/// Upper bound on expense categories included in an advisory snapshot.
pub const MAX_TOP_EXPENSES: usize = 5;

/// The bounded financial snapshot sent to the text-generation service.
///
/// Holds at most [`MAX_RECENT_TRANSACTIONS`] current-month transactions and
/// [`MAX_TOP_EXPENSES`] expense categories, sorted by descending amount with
/// ties keeping their first-appearance order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryContext {
    pub current_month_stats: Stats,
    pub top_expenses: Vec<CategoryTotal>,
    pub goals: Vec<GoalSnapshot>,
    pub recent_transactions: Vec<TransactionSnapshot>,
}

/// Goal reduced to the fields the advisory service needs.
#[derive(Debug, Clone, Serialize)]
pub struct GoalSnapshot {
    pub name: String,
    pub target: f64,
    pub current: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
}

/// Transaction reduced to the fields the advisory service needs.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionSnapshot {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub category: String,
    pub amount: f64,
    pub description: String,
}

impl AdvisoryContext {
    pub fn from_store(store: &LedgerStore) -> Self {
        Self::from_store_at(store, Local::now().naive_local())
    }

    pub fn from_store_at(store: &LedgerStore, now: NaiveDateTime) -> Self {
        let current_month_stats = store.stats_at(Period::Month, now);

        let mut top_expenses = store.category_data_at(Period::Month, now);
        // Stable sort: equal amounts keep their first-appearance order.
        top_expenses.sort_by(|a, b| b.amount.partial_cmp(&a.amount).unwrap_or(Ordering::Equal));
        top_expenses.truncate(MAX_TOP_EXPENSES);

        let goals = store
            .goals()
            .iter()
            .map(|goal| GoalSnapshot {
                name: goal.name.clone(),
                target: goal.target,
                current: goal.current,
                deadline: goal.deadline,
            })
            .collect();

        let month = TransactionFilter::new().period(Period::Month);
        let recent_transactions = store
            .transactions_at(&month, now)
            .into_iter()
            .take(MAX_RECENT_TRANSACTIONS)
            .map(|transaction| TransactionSnapshot {
                date: transaction.date,
                kind: transaction.kind,
                category: transaction.category,
                amount: transaction.amount,
                description: transaction.description,
            })
            .collect();

        Self {
            current_month_stats,
            top_expenses,
            goals,
            recent_transactions,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
