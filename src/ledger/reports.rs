use serde::Serialize;

/// Headline numbers for a period.
///
/// `balance` is always `income - expenses`; `avg_goal_progress` spans all
/// goals regardless of the period and stays within `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub income: f64,
    pub expenses: f64,
    pub balance: f64,
    pub avg_goal_progress: f64,
}

/// Summed expense amount for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
}

/// Income and expense totals for one calendar month, labelled for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub month: String,
    pub income: f64,
    pub expenses: f64,
}
