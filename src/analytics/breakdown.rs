//! Category breakdowns: grouping, percentages and top-N selection.

use std::collections::HashMap;

use crate::models::{BudgetItem, Transaction, TransactionKind};

/// Anything that contributes an amount to a category.
pub trait CategoryAmount {
    /// Category label.
    fn category(&self) -> &str;
    /// Amount attributed to the category.
    fn amount(&self) -> f64;
}

impl CategoryAmount for BudgetItem {
    #[inline]
    fn category(&self) -> &str {
        &self.label
    }

    /// Realized amount.
    #[inline]
    fn amount(&self) -> f64 {
        self.actual
    }
}

impl CategoryAmount for (String, f64) {
    #[inline]
    fn category(&self) -> &str {
        &self.0
    }

    #[inline]
    fn amount(&self) -> f64 {
        self.1
    }
}

impl CategoryAmount for (&str, f64) {
    #[inline]
    fn category(&self) -> &str {
        self.0
    }

    #[inline]
    fn amount(&self) -> f64 {
        self.1
    }
}

/// Sum of one category's transactions.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    /// Category label.
    pub category: String,
    /// Summed amount.
    pub amount: f64,
    /// Number of transactions summed.
    pub count: usize,
}

impl CategoryAmount for CategoryTotal {
    #[inline]
    fn category(&self) -> &str {
        &self.category
    }

    #[inline]
    fn amount(&self) -> f64 {
        self.amount
    }
}

/// One row of a category breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    /// Category label.
    pub category: String,
    /// Amount.
    pub amount: f64,
    /// Share of the total in percent; 0 when the total is not positive.
    pub percentage: f64,
}

/// The head of a breakdown plus how many entries were left out.
#[derive(Debug, Clone, PartialEq)]
pub struct TopCategories {
    /// Entries to display.
    pub shown: Vec<CategorySummary>,
    /// Number of entries not shown ("+K more").
    pub remaining: usize,
}

/// Computes each item's share of the total, largest first.
///
/// `total_override` replaces the sum of `items` as the denominator, for
/// when the items are a subset of a known total. Ties keep their input
/// order. Items with the same label are not merged; group them first with
/// [`spending_by_category`] if needed.
///
/// # Examples
///
/// ```
/// use fintrack_rs::analytics::category_breakdown;
///
/// let rows = category_breakdown(&[("Rent", 150.0), ("Food", 50.0)], None);
/// assert_eq!(rows[0].category, "Rent");
/// assert!((rows[0].percentage - 75.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn category_breakdown<T: CategoryAmount>(
    items: &[T],
    total_override: Option<f64>,
) -> Vec<CategorySummary> {
    let total = total_override.unwrap_or_else(|| items.iter().map(CategoryAmount::amount).sum());
    let mut rows: Vec<CategorySummary> = items
        .iter()
        .map(|item| CategorySummary {
            category: item.category().to_owned(),
            amount: item.amount(),
            percentage: share_of(item.amount(), total),
        })
        .collect();
    rows.sort_by(|left, right| right.amount.total_cmp(&left.amount));
    rows
}

/// Percentage of `amount` in `total`, 0 for a non-positive total.
const fn share_of(amount: f64, total: f64) -> f64 {
    if total > 0.0 {
        amount / total * 100.0
    } else {
        0.0
    }
}

/// Groups expense transactions by category in first-seen order.
#[must_use]
pub fn spending_by_category(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<CategoryTotal> = Vec::new();

    for tx in transactions
        .iter()
        .filter(|tx| tx.kind == TransactionKind::Expense)
    {
        if let Some(&slot) = index.get(tx.category.as_str()) {
            if let Some(total) = totals.get_mut(slot) {
                total.amount += tx.amount;
                total.count += 1;
            }
        } else {
            let _previous = index.insert(tx.category.as_str(), totals.len());
            totals.push(CategoryTotal {
                category: tx.category.clone(),
                amount: tx.amount,
                count: 1,
            });
        }
    }

    totals
}

/// Splits off the first `n` entries of a sorted breakdown.
#[must_use]
pub fn top_n(breakdown: &[CategorySummary], n: usize) -> TopCategories {
    let shown: Vec<CategorySummary> = breakdown.iter().take(n).cloned().collect();
    TopCategories {
        remaining: breakdown.len() - shown.len(),
        shown,
    }
}

/// Keeps the first `n` entries and folds the rest into one entry called
/// `label`.
///
/// Returns the breakdown unchanged when nothing is left to fold.
#[must_use]
pub fn collapse_tail(breakdown: &[CategorySummary], n: usize, label: &str) -> Vec<CategorySummary> {
    if breakdown.len() <= n {
        return breakdown.to_vec();
    }
    let (head, tail) = breakdown.split_at(n);
    let mut rows = head.to_vec();
    rows.push(CategorySummary {
        category: label.to_owned(),
        amount: tail.iter().map(|row| row.amount).sum(),
        percentage: tail.iter().map(|row| row.percentage).sum(),
    });
    rows
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::TransactionId;

    fn tx(id: &str, amount: f64, category: &str, kind: TransactionKind) -> Transaction {
        Transaction {
            id: TransactionId::new(id.to_owned()),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            amount,
            category: category.to_owned(),
            description: String::new(),
            kind,
        }
    }

    fn seven_categories() -> Vec<CategorySummary> {
        let items = [
            ("Rent", 1200.0),
            ("Food", 400.0),
            ("Transport", 150.0),
            ("Fun", 100.0),
            ("Health", 80.0),
            ("Gifts", 40.0),
            ("Books", 30.0),
        ];
        category_breakdown(&items, None)
    }

    #[test]
    fn percentages_sum_to_hundred() {
        let rows = seven_categories();
        let sum: f64 = rows.iter().map(|row| row.percentage).sum();
        assert!((sum - 100.0).abs() < 1e-9);
        assert!(rows.iter().all(|row| (0.0..=100.0).contains(&row.percentage)));
    }

    #[test]
    fn sorted_descending_and_stable_for_ties() {
        let rows = category_breakdown(&[("A", 10.0), ("B", 30.0), ("C", 10.0)], None);
        let names: Vec<&str> = rows.iter().map(|row| row.category.as_str()).collect();
        assert_eq!(names, ["B", "A", "C"]);
    }

    #[test]
    fn zero_total_gives_zero_percentages() {
        let rows = category_breakdown(&[("A", 0.0), ("B", 0.0)], None);
        assert!(rows.iter().all(|row| row.percentage.abs() < f64::EPSILON));

        let empty: Vec<(String, f64)> = Vec::new();
        assert!(category_breakdown(&empty, None).is_empty());
    }

    #[test]
    fn total_override_is_denominator() {
        let rows = category_breakdown(&[("Food", 25.0)], Some(200.0));
        assert!((rows[0].percentage - 12.5).abs() < 1e-9);
    }

    #[test]
    fn duplicate_labels_are_not_merged() {
        let rows = category_breakdown(&[("Food", 10.0), ("Food", 20.0)], None);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn budget_items_use_actual() {
        let items = [
            BudgetItem::new("1", "Groceries", 300.0, 350.0),
            BudgetItem::new("2", "Rent", 1200.0, 1200.0),
        ];
        let rows = category_breakdown(&items, None);
        assert_eq!(rows[0].category, "Rent");
        assert!((rows[1].amount - 350.0).abs() < f64::EPSILON);
    }

    #[test]
    fn top_three_of_seven() {
        let rows = seven_categories();
        let top = top_n(&rows, 3);
        assert_eq!(top.shown.len(), 3);
        assert_eq!(top.remaining, 4);
        assert_eq!(top.shown[0].category, "Rent");
        assert_eq!(rows.len(), 7);
    }

    #[test]
    fn top_n_larger_than_input() {
        let rows = category_breakdown(&[("A", 1.0)], None);
        let top = top_n(&rows, 5);
        assert_eq!(top.shown.len(), 1);
        assert_eq!(top.remaining, 0);
    }

    #[test]
    fn collapse_tail_folds_into_other() {
        let rows = seven_categories();
        let collapsed = collapse_tail(&rows, 5, "Other");
        assert_eq!(collapsed.len(), 6);
        let other = &collapsed[5];
        assert_eq!(other.category, "Other");
        assert!((other.amount - 70.0).abs() < 1e-9);
        let sum: f64 = collapsed.iter().map(|row| row.percentage).sum();
        assert!((sum - 100.0).abs() < 1e-9);

        assert_eq!(collapse_tail(&rows, 7, "Other"), rows);
    }

    #[test]
    fn spending_groups_expenses_in_first_seen_order() {
        let transactions = [
            tx("1", 50.0, "Food", TransactionKind::Expense),
            tx("2", 3000.0, "Salary", TransactionKind::Income),
            tx("3", 1200.0, "Rent", TransactionKind::Expense),
            tx("4", 25.0, "Food", TransactionKind::Expense),
        ];
        let totals = spending_by_category(&transactions);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].category, "Food");
        assert!((totals[0].amount - 75.0).abs() < f64::EPSILON);
        assert_eq!(totals[0].count, 2);

        let rows = category_breakdown(&totals, None);
        assert_eq!(rows[0].category, "Rent");
    }
}
