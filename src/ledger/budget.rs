use serde::{Deserialize, Serialize};

use super::{common::Identifiable, id::EntryId};

/// A monthly spending guardrail for a single expense category.
///
/// One budget per category is a UI convention; the store does not reject
/// duplicates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Budget {
    pub id: EntryId,
    pub category: String,
    pub amount: f64,
}

impl Identifiable for Budget {
    fn id(&self) -> EntryId {
        self.id
    }
}

/// Caller-supplied fields of a budget before the store assigns an id.
#[derive(Debug, Clone)]
pub struct BudgetDraft {
    pub category: String,
    pub amount: f64,
}

impl BudgetDraft {
    pub fn new(category: impl Into<String>, amount: f64) -> Self {
        Self {
            category: category.into(),
            amount,
        }
    }

    pub(crate) fn assign(self, id: EntryId) -> Budget {
        Budget {
            id,
            category: self.category,
            amount: self.amount,
        }
    }
}
