//! Month-by-month income and expense totals.

use std::collections::HashMap;

use chrono::{Datelike, Months, NaiveDate, Utc};

use crate::models::{MonthlyTrendPoint, Transaction, TransactionKind};

/// Totals of one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthBucket {
    /// First day of the month.
    pub month: NaiveDate,
    /// Three-letter month label, e.g. `Jan`.
    pub label: String,
    /// Income total.
    pub income: f64,
    /// Expense total.
    pub expense: f64,
    /// `income - expense`.
    pub balance: f64,
}

impl MonthBucket {
    /// Empty bucket for the month starting at `month`.
    fn empty(month: NaiveDate) -> Self {
        Self {
            month,
            label: month.format("%b").to_string(),
            income: 0.0,
            expense: 0.0,
            balance: 0.0,
        }
    }

    /// Stable `YYYY-MM` key of the month.
    #[inline]
    #[must_use]
    pub fn key(&self) -> String {
        self.month.format("%Y-%m").to_string()
    }
}

impl From<&MonthBucket> for MonthlyTrendPoint {
    #[inline]
    fn from(bucket: &MonthBucket) -> Self {
        Self {
            month: bucket.label.clone(),
            income: bucket.income,
            expenses: bucket.expense,
            balance: bucket.balance,
            key: bucket.key(),
        }
    }
}

/// Buckets transactions into the `month_count` calendar months ending
/// with the month of `today`, oldest first.
///
/// Months without transactions are reported with zeros; transactions
/// outside the window are ignored.
///
/// # Examples
///
/// ```
/// use fintrack_rs::analytics::monthly_trend;
/// use fintrack_rs::models::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
/// let buckets = monthly_trend(&[], 3, today);
/// let labels: Vec<&str> = buckets.iter().map(|b| b.label.as_str()).collect();
/// assert_eq!(labels, ["Jan", "Feb", "Mar"]);
/// ```
#[must_use]
pub fn monthly_trend(transactions: &[Transaction], month_count: u32, today: NaiveDate) -> Vec<MonthBucket> {
    let Some(current) = today.with_day(1) else {
        return Vec::new();
    };

    let mut buckets: Vec<MonthBucket> = (0..month_count)
        .rev()
        .filter_map(|back| current.checked_sub_months(Months::new(back)))
        .map(MonthBucket::empty)
        .collect();
    let index: HashMap<NaiveDate, usize> = buckets
        .iter()
        .enumerate()
        .map(|(slot, bucket)| (bucket.month, slot))
        .collect();

    for tx in transactions {
        let Some(slot) = tx.date.with_day(1).and_then(|month| index.get(&month)) else {
            continue;
        };
        if let Some(bucket) = buckets.get_mut(*slot) {
            match tx.kind {
                TransactionKind::Income => bucket.income += tx.amount,
                TransactionKind::Expense => bucket.expense += tx.amount,
            }
        }
    }

    for bucket in &mut buckets {
        bucket.balance = bucket.income - bucket.expense;
    }
    buckets
}

/// [`monthly_trend`] ending with the current UTC month.
#[inline]
#[must_use]
pub fn monthly_trend_now(transactions: &[Transaction], month_count: u32) -> Vec<MonthBucket> {
    monthly_trend(transactions, month_count, Utc::now().date_naive())
}
