//! Aggregation engine and resilient API client for a personal finance
//! tracker.
//!
//! The crate has two halves:
//!
//! - [`analytics`]: pure functions turning transactions, budget lines and
//!   savings goals into category breakdowns, budget comparisons, savings
//!   progress and monthly trends;
//! - [`client`] (feature `async`): an HTTP client that keeps a session
//!   alive across token expiry, throttling and server hiccups, with tokens
//!   kept in a pluggable [`storage::CredentialStore`].
//!
//! # Example
//!
//! ```rust
//! use fintrack_rs::analytics::{category_breakdown, top_n};
//!
//! let spending = [("Rent", 1200.0), ("Food", 450.0), ("Transport", 150.0)];
//! let breakdown = category_breakdown(&spending, None);
//! let top = top_n(&breakdown, 2);
//! assert_eq!(top.shown[0].category, "Rent");
//! assert_eq!(top.remaining, 1);
//! ```

pub mod analytics;
#[cfg(feature = "async")]
pub mod client;
pub mod error;
pub mod models;
pub mod storage;

#[cfg(feature = "async")]
pub use client::{ApiClient, ApiClientBuilder, RetryPolicy, SessionEvent};
pub use error::{ApiError, ApiResult, ErrorCode, FinTrackError, Result};
