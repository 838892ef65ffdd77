//! Financial aggregation engine.
//!
//! Pure functions that turn transactions, budget lines and savings goals
//! into display-ready summaries. Nothing here performs I/O; inputs are
//! expected to be normalized already (see [`crate::models::RawTransaction`]).

mod breakdown;
mod budget;
mod savings;
mod trend;

pub use breakdown::{
    CategoryAmount, CategorySummary, CategoryTotal, TopCategories, category_breakdown,
    collapse_tail, spending_by_category, top_n,
};
pub use budget::{budget_comparison, budget_difference};
pub use savings::{SavingsProgress, savings_progress};
pub use trend::{MonthBucket, monthly_trend, monthly_trend_now};
