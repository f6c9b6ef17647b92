use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{common::Identifiable, id::EntryId};

/// A single income or expense entry.
///
/// Immutable once recorded; the only way to change history is to delete the
/// entry and record a new one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: EntryId,
    pub kind: EntryKind,
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
}

impl Identifiable for Transaction {
    fn id(&self) -> EntryId {
        self.id
    }
}

/// Caller-supplied fields of a transaction before the store assigns an id.
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    pub kind: EntryKind,
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
}

impl TransactionDraft {
    pub fn new(
        kind: EntryKind,
        amount: f64,
        category: impl Into<String>,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            kind,
            amount,
            category: category.into(),
            description: description.into(),
            date,
        }
    }

    pub(crate) fn assign(self, id: EntryId) -> Transaction {
        Transaction {
            id,
            kind: self.kind,
            amount: self.amount,
            category: self.category,
            description: self.description,
            date: self.date,
        }
    }
}

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Income,
    Expense,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntryKind::Income => "income",
            EntryKind::Expense => "expense",
        };
        f.write_str(label)
    }
}
