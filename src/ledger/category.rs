use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::transaction::EntryKind;

static DEFAULT_TAXONOMY: Lazy<CategoryTaxonomy> = Lazy::new(|| CategoryTaxonomy {
    income: to_names(&[
        "Salary",
        "Freelance",
        "Investment",
        "Business",
        "Gift",
        "Other Income",
    ]),
    expense: to_names(&[
        "Food & Dining",
        "Transportation",
        "Shopping",
        "Entertainment",
        "Bills & Utilities",
        "Healthcare",
        "Education",
        "Travel",
        "Rent",
        "Other Expense",
    ]),
});

fn to_names(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

/// Ordered, type-partitioned lists of permissible category labels.
///
/// Names are unique within each list and display order equals insertion
/// order. Transactions are never checked against the taxonomy: deleting a
/// category leaves entries tagged with it untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryTaxonomy {
    pub income: Vec<String>,
    pub expense: Vec<String>,
}

impl CategoryTaxonomy {
    /// The built-in taxonomy used when no persisted one exists.
    pub fn seeded() -> Self {
        DEFAULT_TAXONOMY.clone()
    }

    pub fn list(&self, kind: EntryKind) -> &[String] {
        match kind {
            EntryKind::Income => &self.income,
            EntryKind::Expense => &self.expense,
        }
    }

    fn list_mut(&mut self, kind: EntryKind) -> &mut Vec<String> {
        match kind {
            EntryKind::Income => &mut self.income,
            EntryKind::Expense => &mut self.expense,
        }
    }

    pub fn contains(&self, kind: EntryKind, name: &str) -> bool {
        self.list(kind).iter().any(|existing| existing == name)
    }

    /// Appends a category name, reporting `false` without mutation when the
    /// exact name is already present.
    pub fn add(&mut self, kind: EntryKind, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.contains(kind, &name) {
            return false;
        }
        self.list_mut(kind).push(name);
        true
    }

    /// Removes the first exact match, reporting whether one was found.
    pub fn remove(&mut self, kind: EntryKind, name: &str) -> bool {
        let list = self.list_mut(kind);
        match list.iter().position(|existing| existing == name) {
            Some(index) => {
                list.remove(index);
                true
            }
            None => false,
        }
    }
}

impl Default for CategoryTaxonomy {
    fn default() -> Self {
        Self::seeded()
    }
}
