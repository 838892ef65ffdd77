//! Data models for the finance API.
//!
//! This module contains strongly-typed representations of transactions,
//! budget lines, savings goals and server statistics, the response
//! envelope, newtype ID wrappers, and enumeration types for constrained
//! values.

mod auth;
mod budget;
mod enums;
mod envelope;
mod ids;
mod query;
mod statistics;
mod transaction;

pub use auth::{AuthSession, AuthUser, LoginRequest, RegisterRequest};
pub use budget::{BudgetItem, SavingsGoal};
pub use chrono::NaiveDate;
pub use enums::{SortBy, SortOrder, TransactionKind};
pub use envelope::{ApiEnvelope, CodeValue, ErrorPayload, PageMeta};
pub use ids::{BudgetItemId, SavingsGoalId, TransactionId, UserId};
pub use query::{DEFAULT_PAGE_SIZE, TransactionPage, TransactionQuery};
pub use statistics::{
    BalanceSummary, BudgetComparison, BudgetComparisonSummary, BudgetTotals, CategoryComparison,
    CategorySpending, GoalProgress, MonthlyTrendPoint, MonthlyTrends, NetTotals, Period,
    SavingsProgressReport, SavingsSnapshot, SavingsTotals, SpendingByCategory, TrendWindow,
};
pub use transaction::{
    NewTransaction, RawAmount, RawCategory, RawDate, RawId, RawTransaction, Transaction,
    TransactionUpdate, UNCATEGORIZED,
};
