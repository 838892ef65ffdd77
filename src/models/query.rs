//! Transaction listing: query parameters and the page they return.

use chrono::NaiveDate;

use super::{PageMeta, SortBy, SortOrder, Transaction, TransactionKind};

/// Default page size used when none is set.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Composable query for `GET /api/v1/transactions`.
///
/// Every set criterion is sent as a query parameter; the server combines
/// them with AND.
///
/// # Examples
///
/// ```
/// use fintrack_rs::models::{NaiveDate, SortBy, TransactionKind, TransactionQuery};
///
/// let query = TransactionQuery::new()
///     .page(2)
///     .kind(TransactionKind::Expense)
///     .date_range(
///         NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///         NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
///     )
///     .sort_by(SortBy::Amount);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionQuery {
    /// 1-based page number.
    pub page: u32,
    /// Records per page.
    pub page_size: u32,
    /// Only income or only expenses.
    pub kind: Option<TransactionKind>,
    /// Sort field.
    pub sort_by: Option<SortBy>,
    /// Sort direction.
    pub sort_order: Option<SortOrder>,
    /// Start date (inclusive).
    pub from_date: Option<NaiveDate>,
    /// End date (inclusive).
    pub to_date: Option<NaiveDate>,
    /// Minimum amount.
    pub min_amount: Option<f64>,
    /// Maximum amount.
    pub max_amount: Option<f64>,
    /// Category name.
    pub category: Option<String>,
}

impl Default for TransactionQuery {
    #[inline]
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            kind: None,
            sort_by: None,
            sort_order: None,
            from_date: None,
            to_date: None,
            min_amount: None,
            max_amount: None,
            category: None,
        }
    }
}

impl TransactionQuery {
    /// Creates a query for the first page with no filters.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page number (values below 1 become 1).
    #[inline]
    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Sets the page size (values below 1 become 1).
    #[inline]
    #[must_use]
    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = size.max(1);
        self
    }

    /// Restricts to one transaction kind.
    #[inline]
    #[must_use]
    pub const fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Sets the sort field.
    #[inline]
    #[must_use]
    pub const fn sort_by(mut self, by: SortBy) -> Self {
        self.sort_by = Some(by);
        self
    }

    /// Sets the sort direction.
    #[inline]
    #[must_use]
    pub const fn sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = Some(order);
        self
    }

    /// Restricts to transactions within the given date range (inclusive).
    #[inline]
    #[must_use]
    pub const fn date_range(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.from_date = Some(from);
        self.to_date = Some(to);
        self
    }

    /// Restricts to amounts within `[min, max]`.
    #[inline]
    #[must_use]
    pub const fn amount_range(mut self, min: f64, max: f64) -> Self {
        self.min_amount = Some(min);
        self.max_amount = Some(max);
        self
    }

    /// Restricts to one category.
    #[inline]
    #[must_use]
    pub fn category<T: Into<String>>(mut self, name: T) -> Self {
        self.category = Some(name.into());
        self
    }

    /// Query parameters in the order the server documents them.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("pageSize", self.page_size.to_string()),
        ];
        if let Some(kind) = self.kind {
            pairs.push(("type", kind.as_str().to_owned()));
        }
        if let Some(by) = self.sort_by {
            pairs.push(("sortBy", by.as_str().to_owned()));
        }
        if let Some(order) = self.sort_order {
            pairs.push(("sortOrder", order.as_str().to_owned()));
        }
        if let Some(from) = self.from_date {
            pairs.push(("fromDate", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = self.to_date {
            pairs.push(("toDate", to.format("%Y-%m-%d").to_string()));
        }
        if let Some(min) = self.min_amount {
            pairs.push(("minAmount", min.to_string()));
        }
        if let Some(max) = self.max_amount {
            pairs.push(("maxAmount", max.to_string()));
        }
        if let Some(category) = self.category.as_ref() {
            pairs.push(("category", category.clone()));
        }
        pairs
    }
}

/// One page of a transaction listing.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionPage {
    /// Normalized transactions on this page.
    pub transactions: Vec<Transaction>,
    /// 1-based page number.
    pub page: u32,
    /// Records per page.
    pub page_size: u32,
    /// Total matching records across all pages.
    pub total_count: u64,
    /// Whether a further page exists.
    pub has_more: bool,
}

impl TransactionPage {
    /// Builds a page from server metadata, falling back to the requested
    /// paging when the server omits it.
    #[must_use]
    pub fn from_parts(
        transactions: Vec<Transaction>,
        meta: Option<PageMeta>,
        query: &TransactionQuery,
    ) -> Self {
        let paging = meta.unwrap_or_default();
        let page = paging.page.unwrap_or(query.page);
        let page_size = paging.page_size.unwrap_or(query.page_size);
        let has_more = paging
            .count
            .is_some_and(|count| u64::from(page) * u64::from(page_size) < count);
        Self {
            transactions,
            page,
            page_size,
            total_count: paging.count.unwrap_or_default(),
            has_more,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_query_only_pages() {
        let pairs = TransactionQuery::new().to_pairs();
        assert_eq!(
            pairs,
            vec![("page", "1".to_owned()), ("pageSize", "10".to_owned())]
        );
    }

    #[test]
    fn full_query_pairs() {
        let query = TransactionQuery::new()
            .page(3)
            .page_size(25)
            .kind(TransactionKind::Income)
            .sort_by(SortBy::Date)
            .sort_order(SortOrder::Asc)
            .date_range(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            )
            .amount_range(10.0, 99.5)
            .category("Salary");
        let pairs = query.to_pairs();
        let names: Vec<&str> = pairs.iter().map(|&(name, _)| name).collect();
        assert_eq!(
            names,
            [
                "page", "pageSize", "type", "sortBy", "sortOrder", "fromDate", "toDate",
                "minAmount", "maxAmount", "category"
            ]
        );
        assert!(pairs.contains(&("fromDate", "2024-01-01".to_owned())));
        assert!(pairs.contains(&("maxAmount", "99.5".to_owned())));
    }

    #[test]
    fn page_clamped_to_one() {
        let query = TransactionQuery::new().page(0).page_size(0);
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 1);
    }

    #[test]
    fn page_from_meta() {
        let query = TransactionQuery::new().page(2).page_size(10);
        let meta = PageMeta {
            count: Some(25),
            page: None,
            page_size: None,
        };
        let page = TransactionPage::from_parts(Vec::new(), Some(meta), &query);
        assert_eq!(page.page, 2);
        assert_eq!(page.total_count, 25);
        assert!(page.has_more);

        let last = TransactionPage::from_parts(Vec::new(), Some(meta), &query.clone().page(3));
        assert!(!last.has_more);
    }

    #[test]
    fn page_without_meta_has_no_more() {
        let page = TransactionPage::from_parts(Vec::new(), None, &TransactionQuery::new());
        assert_eq!(page.total_count, 0);
        assert!(!page.has_more);
    }
}
