//! Budgeted-versus-actual comparisons.

use crate::models::{BudgetComparisonSummary, BudgetItem, BudgetTotals, NetTotals, TransactionKind};

/// Signed difference of a budget line; positive is favourable.
///
/// Spending less than planned and earning more than planned are both
/// positive: expenses yield `budgeted - actual`, income `actual - budgeted`.
#[inline]
#[must_use]
pub const fn budget_difference(item: &BudgetItem, kind: TransactionKind) -> f64 {
    match kind {
        TransactionKind::Expense => item.budgeted - item.actual,
        TransactionKind::Income => item.actual - item.budgeted,
    }
}

/// Totals income and expense lines into one comparison.
///
/// Performance is `actual / budgeted`, or 0 when nothing was budgeted.
#[must_use]
pub fn budget_comparison(income: &[BudgetItem], expenses: &[BudgetItem]) -> BudgetComparisonSummary {
    let income_totals = totals(income, TransactionKind::Income);
    let expense_totals = totals(expenses, TransactionKind::Expense);
    BudgetComparisonSummary {
        income: income_totals,
        expenses: expense_totals,
        net: NetTotals {
            budgeted: income_totals.budgeted - expense_totals.budgeted,
            actual: income_totals.actual - expense_totals.actual,
        },
    }
}

/// Sums one kind of budget lines.
fn totals(items: &[BudgetItem], kind: TransactionKind) -> BudgetTotals {
    let budgeted: f64 = items.iter().map(|item| item.budgeted).sum();
    let actual: f64 = items.iter().map(|item| item.actual).sum();
    let difference = match kind {
        TransactionKind::Expense => budgeted - actual,
        TransactionKind::Income => actual - budgeted,
    };
    BudgetTotals {
        budgeted,
        actual,
        difference,
        performance: if budgeted.abs() < f64::EPSILON {
            0.0
        } else {
            actual / budgeted
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difference_sign_depends_on_kind() {
        let item = BudgetItem::new("1", "Groceries", 100.0, 80.0);
        assert!((budget_difference(&item, TransactionKind::Expense) - 20.0).abs() < f64::EPSILON);
        assert!((budget_difference(&item, TransactionKind::Income) + 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn comparison_totals_and_net() {
        let income = [
            BudgetItem::new("i1", "Salary", 3000.0, 3000.0),
            BudgetItem::new("i2", "Freelance", 500.0, 800.0),
        ];
        let expenses = [
            BudgetItem::new("e1", "Rent", 1200.0, 1200.0),
            BudgetItem::new("e2", "Groceries", 300.0, 350.0),
        ];
        let summary = budget_comparison(&income, &expenses);

        assert!((summary.income.actual - 3800.0).abs() < f64::EPSILON);
        assert!((summary.income.difference - 300.0).abs() < f64::EPSILON);
        assert!((summary.expenses.difference + 50.0).abs() < f64::EPSILON);
        assert!((summary.expenses.performance - 1550.0 / 1500.0).abs() < 1e-12);
        assert!((summary.net.budgeted - 2000.0).abs() < f64::EPSILON);
        assert!((summary.net.actual - 2250.0).abs() < f64::EPSILON);
    }

    #[test]
    fn nothing_budgeted_has_zero_performance() {
        let expenses = [BudgetItem::new("e", "Surprise", 0.0, 40.0)];
        let summary = budget_comparison(&[], &expenses);
        assert!(summary.expenses.performance.abs() < f64::EPSILON);
        assert!(summary.income.performance.abs() < f64::EPSILON);
        assert!((summary.net.actual + 40.0).abs() < f64::EPSILON);
    }
}
