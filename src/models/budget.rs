//! Budget lines and savings goals.

use serde::{Deserialize, Serialize};

use super::{BudgetItemId, SavingsGoalId};

/// A planned-versus-realized line for one income source or expense
/// category.
///
/// The wire format labels the line `source` for income and `category`
/// for expenses; both land in [`BudgetItem::label`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetItem {
    /// Unique identifier.
    pub id: BudgetItemId,
    /// Category or source name.
    #[serde(alias = "category", alias = "source")]
    pub label: String,
    /// Planned amount.
    pub budgeted: f64,
    /// Realized amount.
    pub actual: f64,
}

impl BudgetItem {
    /// Creates a budget line.
    #[inline]
    #[must_use]
    pub fn new<I: Into<BudgetItemId>, L: Into<String>>(
        id: I,
        label: L,
        budgeted: f64,
        actual: f64,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            budgeted,
            actual,
        }
    }
}

/// A savings target for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    /// Unique identifier.
    pub id: SavingsGoalId,
    /// Category the goal saves for.
    #[serde(alias = "categoryName")]
    pub category: String,
    /// Amount to reach.
    pub target: f64,
    /// Amount saved so far.
    pub saved: f64,
}

impl SavingsGoal {
    /// Creates a savings goal.
    #[inline]
    #[must_use]
    pub fn new<I: Into<SavingsGoalId>, C: Into<String>>(
        id: I,
        category: C,
        target: f64,
        saved: f64,
    ) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            target,
            saved,
        }
    }

    /// Amount still missing (`target - saved`); negative once exceeded.
    #[inline]
    #[must_use]
    pub const fn remaining(&self) -> f64 {
        self.target - self.saved
    }

    /// Saved share of the target in percent, unclamped. Zero when the
    /// target is not positive.
    #[inline]
    #[must_use]
    pub const fn progress_percent(&self) -> f64 {
        if self.target > 0.0 {
            self.saved / self.target * 100.0
        } else {
            0.0
        }
    }

    /// Whether the saved amount has reached the target.
    #[inline]
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.target > 0.0 && self.saved >= self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_expense_and_income_labels() {
        let expense: BudgetItem = serde_json::from_str(
            r#"{"id": "3", "category": "Groceries", "budgeted": 300, "actual": 350}"#,
        )
        .unwrap();
        assert_eq!(expense.label, "Groceries");

        let income: BudgetItem = serde_json::from_str(
            r#"{"id": "2", "source": "Freelance", "budgeted": 500, "actual": 800}"#,
        )
        .unwrap();
        assert_eq!(income.label, "Freelance");
        assert!((income.actual - 800.0).abs() < f64::EPSILON);
    }

    #[test]
    fn goal_remaining_and_progress() {
        let goal = SavingsGoal::new("1", "Emergency Fund", 5000.0, 1500.0);
        assert!((goal.remaining() - 3500.0).abs() < f64::EPSILON);
        assert!((goal.progress_percent() - 30.0).abs() < 1e-9);
        assert!(!goal.is_complete());
    }

    #[test]
    fn goal_with_zero_target_has_zero_progress() {
        let goal = SavingsGoal::new("z", "Nothing", 0.0, 10.0);
        assert!(goal.progress_percent().abs() < f64::EPSILON);
        assert!(!goal.is_complete());
    }

    #[test]
    fn exceeded_goal_is_complete_with_negative_remaining() {
        let goal = SavingsGoal::new("v", "Vacation", 2000.0, 2500.0);
        assert!(goal.is_complete());
        assert!((goal.remaining() + 500.0).abs() < f64::EPSILON);
        assert!((goal.progress_percent() - 125.0).abs() < 1e-9);
    }
}
