//! Transaction model and boundary normalization.
//!
//! The API is loose about how it encodes transactions: amounts arrive as
//! numbers or numeric strings, dates as ISO strings, RFC 3339 timestamps,
//! epoch milliseconds or `{year, month, day}` objects, and categories as
//! plain names or nested objects. [`RawTransaction`] accepts all of those;
//! converting it into a [`Transaction`] is the one place they are
//! validated.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{TransactionId, TransactionKind};
use crate::error::{FinTrackError, Result};

/// Category label used when a transaction carries none.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// A normalized financial transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique identifier.
    pub id: TransactionId,
    /// Booking date.
    pub date: NaiveDate,
    /// Amount in the account currency.
    pub amount: f64,
    /// Category label.
    pub category: String,
    /// Free-text description.
    pub description: String,
    /// Income or expense.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
}

/// Identifier as sent by the API (string or number).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    /// String identifier.
    Text(String),
    /// Numeric identifier.
    Number(i64),
}

impl RawId {
    /// Returns the identifier as a string.
    #[inline]
    #[must_use]
    pub fn into_string(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
        }
    }
}

/// Amount as sent by the API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    /// JSON number.
    Number(f64),
    /// Numeric string, e.g. `"12.50"`.
    Text(String),
}

/// Date as sent by the API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawDate {
    /// `YYYY-MM-DD` or an RFC 3339 timestamp.
    Text(String),
    /// Milliseconds since the Unix epoch.
    Millis(i64),
    /// Calendar parts; missing month or day default to 1.
    Parts {
        /// Calendar year.
        year: i32,
        /// Month of year (1-12).
        month: Option<u32>,
        /// Day of month.
        day: Option<u32>,
    },
}

/// Category as sent by the API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawCategory {
    /// Plain category name.
    Name(String),
    /// Category object; only the name is used.
    Object {
        /// Category name.
        name: Option<String>,
    },
}

/// A transaction exactly as the API returned it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    /// Identifier.
    pub id: RawId,
    /// Booking date.
    #[serde(default)]
    pub date: Option<RawDate>,
    /// Amount.
    pub amount: RawAmount,
    /// Category.
    #[serde(default)]
    pub category: Option<RawCategory>,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Income or expense.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
}

impl TryFrom<RawTransaction> for Transaction {
    type Error = FinTrackError;

    #[inline]
    fn try_from(raw: RawTransaction) -> Result<Self> {
        let id = raw.id.into_string();
        let record = format!("transaction {id}");
        let date = normalize_date(raw.date.as_ref(), &record)?;
        let amount = normalize_amount(&raw.amount, &record)?;
        let category = normalize_category(raw.category);

        Ok(Self {
            id: TransactionId::new(id),
            date,
            amount,
            category,
            description: raw.description.unwrap_or_default(),
            kind: raw.kind,
        })
    }
}

/// Builds an [`FinTrackError::InvalidRecord`] for a transaction field.
fn invalid(record: &str, field: &'static str, reason: String) -> FinTrackError {
    FinTrackError::InvalidRecord {
        record: record.to_owned(),
        field,
        reason,
    }
}

/// Converts any accepted date encoding into a calendar date.
fn normalize_date(raw: Option<&RawDate>, record: &str) -> Result<NaiveDate> {
    let Some(raw_date) = raw else {
        return Err(invalid(record, "date", "missing".to_owned()));
    };
    match *raw_date {
        RawDate::Text(ref text) => {
            let trimmed = text.trim();
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .or_else(|| {
                    DateTime::parse_from_rfc3339(trimmed)
                        .ok()
                        .map(|stamp| stamp.date_naive())
                })
                .ok_or_else(|| invalid(record, "date", format!("unrecognized date '{trimmed}'")))
        }
        RawDate::Millis(millis) => DateTime::from_timestamp_millis(millis)
            .map(|stamp| stamp.date_naive())
            .ok_or_else(|| invalid(record, "date", format!("timestamp {millis} out of range"))),
        RawDate::Parts { year, month, day } => {
            let month_num = month.unwrap_or(1);
            let day_num = day.unwrap_or(1);
            NaiveDate::from_ymd_opt(year, month_num, day_num).ok_or_else(|| {
                invalid(
                    record,
                    "date",
                    format!("no such date {year}-{month_num}-{day_num}"),
                )
            })
        }
    }
}

/// Converts a numeric or string amount into a finite `f64`.
fn normalize_amount(raw: &RawAmount, record: &str) -> Result<f64> {
    let value = match *raw {
        RawAmount::Number(number) => number,
        RawAmount::Text(ref text) => text
            .trim()
            .parse::<f64>()
            .map_err(|err| invalid(record, "amount", format!("'{text}' is not a number: {err}")))?,
    };
    if value.is_finite() {
        Ok(value)
    } else {
        Err(invalid(record, "amount", "not a finite number".to_owned()))
    }
}

/// Resolves a category label, falling back to [`UNCATEGORIZED`].
fn normalize_category(raw: Option<RawCategory>) -> String {
    let name = match raw {
        Some(RawCategory::Name(name) | RawCategory::Object { name: Some(name) }) => name,
        Some(RawCategory::Object { name: None }) | None => String::new(),
    };
    if name.trim().is_empty() {
        UNCATEGORIZED.to_owned()
    } else {
        name
    }
}

/// Body for creating a transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    /// Booking date.
    pub date: NaiveDate,
    /// Amount.
    pub amount: f64,
    /// Category label.
    pub category: String,
    /// Description.
    pub description: String,
    /// Income or expense.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
}

/// Partial update body; only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionUpdate {
    /// New booking date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// New amount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// New category label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New kind.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionKind>,
}
