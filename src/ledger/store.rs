use std::sync::Arc;

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::{
    errors::LedgerError,
    storage::{JsonStorage, StorageBackend},
};

use super::{
    budget::{Budget, BudgetDraft},
    category::CategoryTaxonomy,
    common::{remove_by_id, Identifiable},
    filter::{Period, TransactionFilter},
    goal::{Goal, GoalDraft, GoalPatch},
    id::{EntryId, IdGenerator},
    reports::{CategoryTotal, Stats, TrendPoint},
    transaction::{EntryKind, Transaction, TransactionDraft},
};

pub const TRANSACTIONS_KEY: &str = "transactions";
pub const BUDGETS_KEY: &str = "budgets";
pub const GOALS_KEY: &str = "goals";
pub const CATEGORIES_KEY: &str = "categories";

/// Owns the canonical ledger collections and their persistence round-trip.
///
/// Collections are loaded once at construction, mutated in memory, and each
/// mutation re-serializes the entire affected collection under its storage
/// key. The mutate-then-persist sequence is not atomic; embedders serving
/// multiple callers must wrap mutations in their own mutual exclusion.
pub struct LedgerStore {
    transactions: Vec<Transaction>,
    budgets: Vec<Budget>,
    goals: Vec<Goal>,
    categories: CategoryTaxonomy,
    storage: Arc<dyn StorageBackend>,
    ids: IdGenerator,
}

impl LedgerStore {
    /// Loads all collections from the backend, falling back to empty
    /// collections (or the seeded taxonomy) when a key is missing or does
    /// not decode. Load problems are logged, never fatal.
    pub fn open(storage: Arc<dyn StorageBackend>) -> Self {
        let transactions: Vec<Transaction> = load_or(storage.as_ref(), TRANSACTIONS_KEY, Vec::new);
        let budgets: Vec<Budget> = load_or(storage.as_ref(), BUDGETS_KEY, Vec::new);
        let goals: Vec<Goal> = load_or(storage.as_ref(), GOALS_KEY, Vec::new);
        let categories = load_or(storage.as_ref(), CATEGORIES_KEY, CategoryTaxonomy::seeded);

        let mut ids = IdGenerator::new();
        for id in transactions
            .iter()
            .map(Identifiable::id)
            .chain(budgets.iter().map(Identifiable::id))
            .chain(goals.iter().map(Identifiable::id))
        {
            ids.observe(id);
        }

        Self {
            transactions,
            budgets,
            goals,
            categories,
            storage,
            ids,
        }
    }

    /// Opens a store backed by JSON files in the default data directory.
    pub fn open_default() -> Result<Self, LedgerError> {
        let storage = JsonStorage::new_default()?;
        Ok(Self::open(Arc::new(storage)))
    }

    pub fn storage(&self) -> &Arc<dyn StorageBackend> {
        &self.storage
    }

    // ---- Transactions ----

    /// Records a transaction: assigns a fresh id, prepends it so the list
    /// stays newest-first, persists, and returns the stored record.
    pub fn add_transaction(&mut self, draft: TransactionDraft) -> Result<Transaction, LedgerError> {
        let record = draft.assign(self.ids.next());
        self.transactions.insert(0, record.clone());
        self.persist(TRANSACTIONS_KEY, &self.transactions)?;
        debug!(id = %record.id, kind = %record.kind, "recorded transaction");
        Ok(record)
    }

    /// Removes the matching transaction; a no-op when the id is unknown.
    pub fn delete_transaction(&mut self, id: EntryId) -> Result<(), LedgerError> {
        remove_by_id(&mut self.transactions, id);
        self.persist(TRANSACTIONS_KEY, &self.transactions)
    }

    /// Returns a filtered copy of the transaction list, newest first.
    pub fn transactions(&self, filter: &TransactionFilter) -> Vec<Transaction> {
        self.transactions_at(filter, Local::now().naive_local())
    }

    /// Like [`transactions`](Self::transactions) with an explicit reference
    /// instant for the period window.
    pub fn transactions_at(
        &self,
        filter: &TransactionFilter,
        now: NaiveDateTime,
    ) -> Vec<Transaction> {
        self.transactions
            .iter()
            .filter(|transaction| filter.matches(transaction, now))
            .cloned()
            .collect()
    }

    pub fn all_transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    // ---- Budgets ----

    pub fn add_budget(&mut self, draft: BudgetDraft) -> Result<Budget, LedgerError> {
        let record = draft.assign(self.ids.next());
        self.budgets.push(record.clone());
        self.persist(BUDGETS_KEY, &self.budgets)?;
        debug!(id = %record.id, category = %record.category, "recorded budget");
        Ok(record)
    }

    pub fn delete_budget(&mut self, id: EntryId) -> Result<(), LedgerError> {
        remove_by_id(&mut self.budgets, id);
        self.persist(BUDGETS_KEY, &self.budgets)
    }

    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    /// Total expense spending in the category during the current calendar
    /// month. 0 when nothing matches.
    pub fn budget_spending(&self, category: &str) -> f64 {
        self.budget_spending_at(category, Local::now().naive_local())
    }

    pub fn budget_spending_at(&self, category: &str, now: NaiveDateTime) -> f64 {
        self.transactions
            .iter()
            .filter(|transaction| {
                transaction.kind == EntryKind::Expense
                    && transaction.category == category
                    && Period::Month.contains(transaction.date, now)
            })
            .map(|transaction| transaction.amount)
            .sum()
    }

    // ---- Goals ----

    pub fn add_goal(&mut self, draft: GoalDraft) -> Result<Goal, LedgerError> {
        let record = draft.assign(self.ids.next());
        self.goals.push(record.clone());
        self.persist(GOALS_KEY, &self.goals)?;
        debug!(id = %record.id, name = %record.name, "recorded goal");
        Ok(record)
    }

    pub fn delete_goal(&mut self, id: EntryId) -> Result<(), LedgerError> {
        remove_by_id(&mut self.goals, id);
        self.persist(GOALS_KEY, &self.goals)
    }

    /// Merges the patch into the matching goal and persists. Returns the
    /// updated record, or `None` (without persisting) when no goal has the
    /// given id.
    pub fn update_goal(
        &mut self,
        id: EntryId,
        patch: GoalPatch,
    ) -> Result<Option<Goal>, LedgerError> {
        let Some(goal) = self.goals.iter_mut().find(|goal| goal.id == id) else {
            return Ok(None);
        };
        patch.apply(goal);
        let updated = goal.clone();
        self.persist(GOALS_KEY, &self.goals)?;
        Ok(Some(updated))
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    // ---- Categories ----

    pub fn taxonomy(&self) -> &CategoryTaxonomy {
        &self.categories
    }

    /// Appends a category name; `Ok(false)` without mutation or persistence
    /// when the exact name already exists for that kind.
    pub fn add_category(
        &mut self,
        kind: EntryKind,
        name: impl Into<String>,
    ) -> Result<bool, LedgerError> {
        if !self.categories.add(kind, name) {
            return Ok(false);
        }
        self.persist(CATEGORIES_KEY, &self.categories)?;
        Ok(true)
    }

    /// Removes the first exact match. Existing transactions tagged with the
    /// name are left untouched.
    pub fn delete_category(
        &mut self,
        kind: EntryKind,
        name: &str,
    ) -> Result<bool, LedgerError> {
        if !self.categories.remove(kind, name) {
            return Ok(false);
        }
        self.persist(CATEGORIES_KEY, &self.categories)?;
        Ok(true)
    }

    // ---- Derived views ----

    pub fn stats(&self, period: Period) -> Stats {
        self.stats_at(period, Local::now().naive_local())
    }

    pub fn stats_at(&self, period: Period, now: NaiveDateTime) -> Stats {
        let filter = TransactionFilter::new().period(period);
        let mut income = 0.0;
        let mut expenses = 0.0;
        for transaction in self
            .transactions
            .iter()
            .filter(|transaction| filter.matches(transaction, now))
        {
            match transaction.kind {
                EntryKind::Income => income += transaction.amount,
                EntryKind::Expense => expenses += transaction.amount,
            }
        }

        let avg_goal_progress = if self.goals.is_empty() {
            0.0
        } else {
            self.goals
                .iter()
                .map(Goal::progress_percent)
                .sum::<f64>()
                / self.goals.len() as f64
        };

        Stats {
            income,
            expenses,
            balance: income - expenses,
            avg_goal_progress,
        }
    }

    /// Expense totals per category for the period, ordered by first
    /// appearance in the (newest-first) transaction list. Categories with
    /// no matching transactions are absent.
    pub fn category_data(&self, period: Period) -> Vec<CategoryTotal> {
        self.category_data_at(period, Local::now().naive_local())
    }

    pub fn category_data_at(&self, period: Period, now: NaiveDateTime) -> Vec<CategoryTotal> {
        let filter = TransactionFilter::new()
            .kind(EntryKind::Expense)
            .period(period);
        let mut totals: Vec<CategoryTotal> = Vec::new();
        for transaction in self
            .transactions
            .iter()
            .filter(|transaction| filter.matches(transaction, now))
        {
            match totals
                .iter_mut()
                .find(|total| total.category == transaction.category)
            {
                Some(total) => total.amount += transaction.amount,
                None => totals.push(CategoryTotal {
                    category: transaction.category.clone(),
                    amount: transaction.amount,
                }),
            }
        }
        totals
    }

    /// One point per calendar month for the trailing `months` months ending
    /// at the current month inclusive, oldest first.
    pub fn trend_data(&self, months: usize) -> Vec<TrendPoint> {
        self.trend_data_at(months, Local::now().naive_local())
    }

    pub fn trend_data_at(&self, months: usize, now: NaiveDateTime) -> Vec<TrendPoint> {
        let anchor = now.year() * 12 + now.month0() as i32;
        let mut points = Vec::with_capacity(months);
        for offset in (0..months as i32).rev() {
            let slot = anchor - offset;
            let year = slot.div_euclid(12);
            let month0 = slot.rem_euclid(12) as u32;
            let month = NaiveDate::from_ymd_opt(year, month0 + 1, 1)
                .map(|first| first.format("%b %Y").to_string())
                .unwrap_or_default();

            let mut income = 0.0;
            let mut expenses = 0.0;
            for transaction in self
                .transactions
                .iter()
                .filter(|t| t.date.year() == year && t.date.month0() == month0)
            {
                match transaction.kind {
                    EntryKind::Income => income += transaction.amount,
                    EntryKind::Expense => expenses += transaction.amount,
                }
            }
            points.push(TrendPoint {
                month,
                income,
                expenses,
            });
        }
        points
    }

    fn persist<T: Serialize>(&self, key: &str, value: &T) -> Result<(), LedgerError> {
        let json = serde_json::to_string(value)?;
        self.storage.write(key, &json)
    }
}

fn load_or<T: DeserializeOwned>(
    storage: &dyn StorageBackend,
    key: &str,
    fallback: impl FnOnce() -> T,
) -> T {
    match storage.read(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, error = %err, "discarding undecodable collection");
                fallback()
            }
        },
        Ok(None) => fallback(),
        Err(err) => {
            warn!(key, error = %err, "failed to read collection");
            fallback()
        }
    }
}
