//! Server-computed statistics under `/api/v1/statistics/`.
//!
//! All fields default when absent; the statistics service omits
//! sections it has no data for.

use serde::{Deserialize, Serialize};

use super::RawId;

/// Start and end of the period a statistic covers (ISO dates).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Period {
    /// First day of the period.
    pub start_date: String,
    /// Last day of the period.
    pub end_date: String,
}

/// Savings section of [`BalanceSummary`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SavingsSnapshot {
    /// Sum of all goal targets.
    pub total_savings_target: f64,
    /// Sum of all saved amounts.
    pub total_saved: f64,
    /// Overall progress in percent.
    pub savings_progress: f64,
    /// Amount still to save.
    pub remaining_to_save: f64,
}

/// Response of `/statistics/summary`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BalanceSummary {
    /// Income in the period.
    pub total_income: f64,
    /// Expenses in the period.
    pub total_expenses: f64,
    /// Income minus expenses.
    pub balance: f64,
    /// Savings overview.
    pub savings_summary: SavingsSnapshot,
    /// Covered period.
    pub period: Period,
}

/// Budgeted-versus-actual totals for one kind (income or expenses).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BudgetTotals {
    /// Planned total.
    pub budgeted: f64,
    /// Realized total.
    pub actual: f64,
    /// Signed difference; positive is favourable.
    pub difference: f64,
    /// `actual / budgeted`.
    pub performance: f64,
}

/// Net planned and realized totals (income minus expenses).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NetTotals {
    /// Planned net.
    pub budgeted: f64,
    /// Realized net.
    pub actual: f64,
}

/// Budget-versus-actual overview per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BudgetComparisonSummary {
    /// Income totals.
    pub income: BudgetTotals,
    /// Expense totals.
    pub expenses: BudgetTotals,
    /// Net totals.
    pub net: NetTotals,
}

/// One category row of [`BudgetComparison`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryComparison {
    /// Category identifier.
    pub category_id: Option<RawId>,
    /// Category name.
    #[serde(default)]
    pub category_name: String,
    /// Planned amount.
    #[serde(default)]
    pub budgeted: f64,
    /// Realized amount.
    #[serde(default)]
    pub actual: f64,
    /// Signed difference.
    #[serde(default)]
    pub difference: f64,
}

/// Response of `/statistics/budget-comparison`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BudgetComparison {
    /// Totals per kind.
    pub summary: BudgetComparisonSummary,
    /// Income rows.
    pub income_by_category: Vec<CategoryComparison>,
    /// Expense rows.
    pub expenses_by_category: Vec<CategoryComparison>,
}

/// One category row of [`SpendingByCategory`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySpending {
    /// Category identifier.
    pub category_id: Option<RawId>,
    /// Category name.
    #[serde(default)]
    pub category_name: String,
    /// Amount spent.
    #[serde(default)]
    pub amount: f64,
    /// Number of transactions.
    #[serde(default)]
    pub count: u32,
    /// Share of total spending in percent.
    #[serde(default)]
    pub percentage: f64,
}

/// Response of `/statistics/spending-by-category`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpendingByCategory {
    /// Per-category rows.
    pub categories: Vec<CategorySpending>,
    /// Sum of all spending, which can exceed the listed rows.
    pub total_spending: f64,
    /// Covered period.
    pub period: Period,
}

/// One month of [`MonthlyTrends`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MonthlyTrendPoint {
    /// Display label, e.g. `Jan`.
    pub month: String,
    /// Income total.
    pub income: f64,
    /// Expense total.
    pub expenses: f64,
    /// Income minus expenses.
    pub balance: f64,
    /// Stable key, e.g. `2024-01`.
    pub key: String,
}

/// Window length of [`MonthlyTrends`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrendWindow {
    /// Number of months covered.
    pub months: u32,
}

/// Response of `/statistics/monthly-trends`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MonthlyTrends {
    /// Months, oldest first.
    pub trends: Vec<MonthlyTrendPoint>,
    /// Covered window.
    pub period: TrendWindow,
}

/// One goal of [`SavingsProgressReport`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    /// Goal identifier.
    pub id: RawId,
    /// Category name.
    #[serde(default)]
    pub category_name: String,
    /// Target amount.
    #[serde(default)]
    pub target: f64,
    /// Saved amount.
    #[serde(default)]
    pub saved: f64,
    /// Amount still to save.
    #[serde(default)]
    pub remaining: f64,
    /// Progress in percent.
    #[serde(default)]
    pub progress: f64,
    /// Whether the target is reached.
    #[serde(default)]
    pub is_complete: bool,
}

/// Totals of [`SavingsProgressReport`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SavingsTotals {
    /// Number of goals.
    pub total_goals: u32,
    /// Number of reached goals.
    pub completed: u32,
    /// Sum of targets.
    pub total_target: f64,
    /// Sum of saved amounts.
    pub total_saved: f64,
    /// Sum still to save.
    pub total_remaining: f64,
    /// Overall progress in percent.
    pub overall_progress: f64,
}

/// Response of `/statistics/savings-progress`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SavingsProgressReport {
    /// Per-goal progress.
    pub goals: Vec<GoalProgress>,
    /// Totals.
    pub summary: SavingsTotals,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_budget_comparison() {
        let json = r#"{
            "summary": {
                "income": {"budgeted": 3700, "actual": 3950, "difference": 250, "performance": 1.07},
                "expenses": {"budgeted": 1650, "actual": 1720, "difference": -70, "performance": 1.04},
                "net": {"budgeted": 2050, "actual": 2230}
            },
            "incomeByCategory": [],
            "expensesByCategory": [
                {"categoryId": 3, "categoryName": "Groceries", "budgeted": 300, "actual": 350, "difference": -50, "items": []}
            ]
        }"#;
        let comparison: BudgetComparison = serde_json::from_str(json).unwrap();
        assert!((comparison.summary.expenses.difference + 70.0).abs() < f64::EPSILON);
        assert_eq!(comparison.expenses_by_category.len(), 1);
        assert_eq!(
            comparison.expenses_by_category[0].category_id,
            Some(RawId::Number(3))
        );
    }

    #[test]
    fn deserialize_partial_summary_uses_defaults() {
        let summary: BalanceSummary =
            serde_json::from_str(r#"{"totalIncome": 3000, "balance": 1000}"#).unwrap();
        assert!((summary.total_income - 3000.0).abs() < f64::EPSILON);
        assert!(summary.total_expenses.abs() < f64::EPSILON);
        assert!(summary.period.start_date.is_empty());
    }

    #[test]
    fn deserialize_savings_report() {
        let json = r#"{
            "goals": [{"id": "1", "categoryId": "c1", "categoryName": "Emergency Fund",
                       "target": 5000, "saved": 1500, "remaining": 3500, "progress": 30, "isComplete": false}],
            "summary": {"totalGoals": 1, "completed": 0, "totalTarget": 5000,
                        "totalSaved": 1500, "totalRemaining": 3500, "overallProgress": 30}
        }"#;
        let report: SavingsProgressReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.goals[0].category_name, "Emergency Fund");
        assert_eq!(report.summary.total_goals, 1);
    }

    #[test]
    fn deserialize_monthly_trends() {
        let json = r#"{"trends": [{"month": "Jan", "income": 10, "expenses": 4, "balance": 6, "key": "2024-01"}],
                       "period": {"months": 6}}"#;
        let trends: MonthlyTrends = serde_json::from_str(json).unwrap();
        assert_eq!(trends.period.months, 6);
        assert_eq!(trends.trends[0].key, "2024-01");
    }
}
