use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use finance_core::{
    ledger::{
        BudgetDraft, EntryId, EntryKind, GoalDraft, GoalPatch, LedgerStore, Period,
        TransactionDraft, TransactionFilter,
    },
    storage::JsonStorage,
};
use tempfile::TempDir;

fn open_store() -> (LedgerStore, TempDir) {
    let temp = TempDir::new().expect("temp dir");
    let storage = JsonStorage::new(Some(temp.path().to_path_buf())).expect("json storage");
    (LedgerStore::open(Arc::new(storage)), temp)
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

// Mid-March reference keeps period windows unambiguous under test.
fn reference() -> NaiveDateTime {
    date(2025, 3, 15).and_hms_opt(12, 0, 0).expect("valid time")
}

fn income(amount: f64, category: &str, on: NaiveDate) -> TransactionDraft {
    TransactionDraft::new(EntryKind::Income, amount, category, "", on)
}

fn expense(amount: f64, category: &str, on: NaiveDate) -> TransactionDraft {
    TransactionDraft::new(EntryKind::Expense, amount, category, "", on)
}

#[test]
fn add_transaction_assigns_fresh_ids_and_prepends() {
    let (mut store, _guard) = open_store();
    let first = store
        .add_transaction(income(100.0, "Salary", date(2025, 3, 1)))
        .expect("add");
    let second = store
        .add_transaction(expense(40.0, "Rent", date(2025, 3, 2)))
        .expect("add");

    assert_ne!(first.id, second.id);
    assert!(second.id > first.id, "ids must sort by creation order");
    assert_eq!(store.all_transactions().len(), 2);
    assert_eq!(store.all_transactions()[0].id, second.id, "newest first");
}

#[test]
fn delete_transaction_is_a_noop_for_unknown_ids() {
    let (mut store, _guard) = open_store();
    let kept = store
        .add_transaction(income(100.0, "Salary", date(2025, 3, 1)))
        .expect("add");
    let removed = store
        .add_transaction(expense(40.0, "Rent", date(2025, 3, 2)))
        .expect("add");

    store.delete_transaction(removed.id).expect("delete");
    let remaining = store.transactions(&TransactionFilter::new());
    assert!(remaining.iter().all(|t| t.id != removed.id));
    assert_eq!(remaining.len(), 1);

    store
        .delete_transaction(EntryId::from_millis(12345))
        .expect("delete unknown");
    assert_eq!(store.all_transactions().len(), 1);
    assert_eq!(store.all_transactions()[0].id, kept.id);
}

#[test]
fn filters_combine_with_logical_and() {
    let (mut store, _guard) = open_store();
    let now = reference();
    store
        .add_transaction(expense(50.0, "Rent", date(2025, 3, 10)))
        .expect("add");
    store
        .add_transaction(expense(30.0, "Shopping", date(2025, 3, 11)))
        .expect("add");
    store
        .add_transaction(income(900.0, "Salary", date(2025, 3, 12)))
        .expect("add");
    store
        .add_transaction(expense(75.0, "Rent", date(2024, 3, 10)))
        .expect("add");

    let filter = TransactionFilter::new()
        .kind(EntryKind::Expense)
        .category("Rent")
        .period(Period::Month);
    let matched = store.transactions_at(&filter, now);
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].amount, 50.0);

    let everything = store.transactions_at(&TransactionFilter::new(), now);
    assert_eq!(everything.len(), 4);
}

#[test]
fn week_filter_is_a_rolling_window() {
    let (mut store, _guard) = open_store();
    let now = reference();
    store
        .add_transaction(expense(10.0, "Food & Dining", date(2025, 3, 9)))
        .expect("add");
    store
        .add_transaction(expense(20.0, "Food & Dining", date(2025, 3, 8)))
        .expect("add");

    let filter = TransactionFilter::new().period(Period::Week);
    let matched = store.transactions_at(&filter, now);
    assert_eq!(matched.len(), 1, "only dates within the trailing 7x24h pass");
    assert_eq!(matched[0].amount, 10.0);
}

#[test]
fn stats_match_the_monthly_scenario() {
    let (mut store, _guard) = open_store();
    let now = reference();
    store
        .add_transaction(income(5000.0, "Salary", date(2025, 3, 1)))
        .expect("add");
    store
        .add_transaction(expense(1200.0, "Rent", date(2025, 3, 2)))
        .expect("add");

    let stats = store.stats_at(Period::Month, now);
    assert_eq!(stats.income, 5000.0);
    assert_eq!(stats.expenses, 1200.0);
    assert_eq!(stats.balance, 3800.0);
}

#[test]
fn stats_on_an_empty_store_are_all_zero() {
    let (store, _guard) = open_store();
    let stats = store.stats_at(Period::Month, reference());
    assert_eq!(stats.income, 0.0);
    assert_eq!(stats.expenses, 0.0);
    assert_eq!(stats.balance, 0.0);
    assert_eq!(stats.avg_goal_progress, 0.0);
}

#[test]
fn balance_equals_income_minus_expenses_for_every_period() {
    let (mut store, _guard) = open_store();
    let now = reference();
    store
        .add_transaction(income(100.0, "Salary", date(2025, 3, 15)))
        .expect("add");
    store
        .add_transaction(expense(60.0, "Shopping", date(2025, 3, 14)))
        .expect("add");
    store
        .add_transaction(income(10.0, "Gift", date(2024, 11, 2)))
        .expect("add");

    for period in [
        Period::Today,
        Period::Week,
        Period::Month,
        Period::Year,
        Period::All,
    ] {
        let stats = store.stats_at(period, now);
        assert_eq!(stats.balance, stats.income - stats.expenses);
    }
}

#[test]
fn goal_progress_is_guarded_and_capped() {
    let (mut store, _guard) = open_store();
    store
        .add_goal(GoalDraft::new("Overfunded", 1000.0, 2500.0))
        .expect("add");
    store
        .add_goal(GoalDraft::new("Zero target", 0.0, 500.0))
        .expect("add");

    let stats = store.stats_at(Period::Month, reference());
    // Capped at 100 and guarded at 0, averaged over both goals.
    assert_eq!(stats.avg_goal_progress, 50.0);
    assert!(stats.avg_goal_progress >= 0.0 && stats.avg_goal_progress <= 100.0);
}

#[test]
fn category_data_skips_categories_without_spending() {
    let (mut store, _guard) = open_store();
    let now = reference();
    store
        .add_transaction(expense(25.0, "Shopping", date(2025, 3, 3)))
        .expect("add");
    store
        .add_transaction(expense(75.0, "Rent", date(2025, 3, 4)))
        .expect("add");
    store
        .add_transaction(expense(99.0, "Travel", date(2025, 1, 4)))
        .expect("add");
    store
        .add_transaction(income(500.0, "Salary", date(2025, 3, 5)))
        .expect("add");

    let totals = store.category_data_at(Period::Month, now);
    let names: Vec<&str> = totals.iter().map(|t| t.category.as_str()).collect();
    assert_eq!(names, vec!["Rent", "Shopping"], "newest-first appearance order");
    assert!(totals.iter().all(|t| t.amount > 0.0));
}

#[test]
fn category_data_sums_per_category() {
    let (mut store, _guard) = open_store();
    let now = reference();
    store
        .add_transaction(expense(20.0, "Food & Dining", date(2025, 3, 3)))
        .expect("add");
    store
        .add_transaction(expense(22.5, "Food & Dining", date(2025, 3, 9)))
        .expect("add");

    let totals = store.category_data_at(Period::Month, now);
    assert_eq!(totals.len(), 1);
    assert_eq!(totals[0].amount, 42.5);
}

#[test]
fn trend_data_covers_the_trailing_months_oldest_first() {
    let (mut store, _guard) = open_store();
    let now = reference();
    store
        .add_transaction(income(100.0, "Salary", date(2024, 10, 20)))
        .expect("add");
    store
        .add_transaction(expense(40.0, "Rent", date(2025, 2, 5)))
        .expect("add");
    store
        .add_transaction(income(60.0, "Freelance", date(2025, 3, 1)))
        .expect("add");

    let points = store.trend_data_at(6, now);
    let labels: Vec<&str> = points.iter().map(|p| p.month.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "Oct 2024", "Nov 2024", "Dec 2024", "Jan 2025", "Feb 2025", "Mar 2025"
        ]
    );
    assert_eq!(points[0].income, 100.0);
    assert_eq!(points[4].expenses, 40.0);
    assert_eq!(points[5].income, 60.0);
    assert_eq!(points[5].expenses, 0.0);
}

#[test]
fn budget_spending_sums_current_month_expenses_only() {
    let (mut store, _guard) = open_store();
    let now = reference();
    store
        .add_transaction(expense(100.0, "Rent", date(2025, 3, 2)))
        .expect("add");
    store
        .add_transaction(expense(50.0, "Rent", date(2025, 3, 9)))
        .expect("add");
    store
        .add_transaction(expense(80.0, "Rent", date(2025, 2, 9)))
        .expect("add");
    store
        .add_transaction(income(500.0, "Rent", date(2025, 3, 10)))
        .expect("add");

    assert_eq!(store.budget_spending_at("Rent", now), 150.0);
    assert_eq!(store.budget_spending_at("Travel", now), 0.0);
}

#[test]
fn budgets_append_and_delete_by_id() {
    let (mut store, _guard) = open_store();
    let first = store
        .add_budget(BudgetDraft::new("Rent", 1000.0))
        .expect("add");
    let second = store
        .add_budget(BudgetDraft::new("Shopping", 300.0))
        .expect("add");

    assert_eq!(store.budgets().len(), 2);
    assert_eq!(store.budgets()[0].id, first.id, "budgets keep append order");

    store.delete_budget(first.id).expect("delete");
    assert_eq!(store.budgets().len(), 1);
    assert_eq!(store.budgets()[0].id, second.id);
}

#[test]
fn duplicate_budget_categories_are_not_rejected() {
    let (mut store, _guard) = open_store();
    store
        .add_budget(BudgetDraft::new("Rent", 1000.0))
        .expect("add");
    store
        .add_budget(BudgetDraft::new("Rent", 800.0))
        .expect("add duplicate");
    assert_eq!(store.budgets().len(), 2);
}

#[test]
fn update_goal_merges_supplied_fields_only() {
    let (mut store, _guard) = open_store();
    let goal = store
        .add_goal(GoalDraft::new("Laptop", 1000.0, 250.0))
        .expect("add");

    let updated = store
        .update_goal(goal.id, GoalPatch::current(500.0))
        .expect("update")
        .expect("goal exists");
    assert_eq!(updated.current, 500.0);
    assert_eq!(updated.target, 1000.0);
    assert_eq!(updated.name, "Laptop");

    let missing = store
        .update_goal(EntryId::from_millis(7), GoalPatch::current(1.0))
        .expect("update");
    assert!(missing.is_none());
}

#[test]
fn deleting_goals_leaves_others_untouched() {
    let (mut store, _guard) = open_store();
    let kept = store
        .add_goal(GoalDraft::new("Emergency Fund", 5000.0, 100.0))
        .expect("add");
    let removed = store
        .add_goal(GoalDraft::new("Holiday", 800.0, 0.0))
        .expect("add");

    store.delete_goal(removed.id).expect("delete");
    assert_eq!(store.goals().len(), 1);
    assert_eq!(store.goals()[0].id, kept.id);
}

#[test]
fn duplicate_category_add_reports_failure() {
    let (mut store, _guard) = open_store();
    let before = store.taxonomy().expense.len();
    assert!(store.add_category(EntryKind::Expense, "Pets").expect("add"));
    assert!(!store.add_category(EntryKind::Expense, "Pets").expect("add"));
    assert_eq!(store.taxonomy().expense.len(), before + 1);
}

#[test]
fn deleting_a_category_does_not_cascade_to_transactions() {
    let (mut store, _guard) = open_store();
    store
        .add_transaction(expense(10.0, "Rent", date(2025, 3, 3)))
        .expect("add");

    assert!(store
        .delete_category(EntryKind::Expense, "Rent")
        .expect("delete"));
    assert!(!store
        .delete_category(EntryKind::Expense, "Rent")
        .expect("delete again"));
    // The entry keeps its now-orphaned label.
    assert_eq!(store.all_transactions()[0].category, "Rent");
}
