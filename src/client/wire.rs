//! Lenient payload shapes of the transaction endpoints.

use serde::Deserialize;
use serde_json::Value;

use crate::error::FinTrackError;
use crate::models::{PageMeta, RawTransaction, Transaction};

/// `data` of a transaction listing: a bare list, or a nested object with
/// its own paging metadata.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum TransactionList {
    /// `data: [...]`, paging in the envelope's `meta`.
    Flat(Vec<Value>),
    /// `data: {data: [...], meta|pagination: {...}}`.
    Nested {
        /// The records.
        data: Vec<Value>,
        /// Paging metadata.
        #[serde(default)]
        meta: Option<PageMeta>,
        /// Paging metadata under its alternative name.
        #[serde(default)]
        pagination: Option<PageMeta>,
    },
}

impl TransactionList {
    /// Splits into records and the most specific paging metadata.
    pub(super) fn into_parts(self, envelope_meta: Option<PageMeta>) -> (Vec<Value>, Option<PageMeta>) {
        match self {
            Self::Flat(items) => (items, envelope_meta),
            Self::Nested {
                data,
                meta,
                pagination,
            } => (data, meta.or(pagination).or(envelope_meta)),
        }
    }
}

/// `data` of a single-transaction response: bare or under `transaction`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum TransactionDetail {
    /// `{transaction: {...}}`.
    Wrapped {
        /// The record.
        transaction: Value,
    },
    /// The record itself.
    Plain(Value),
}

impl TransactionDetail {
    /// Normalizes the contained record.
    pub(super) fn into_transaction(self) -> Result<Transaction, FinTrackError> {
        let (Self::Wrapped { transaction: value } | Self::Plain(value)) = self;
        normalize(value)
    }
}

/// Deserializes and normalizes one record.
pub(super) fn normalize(value: Value) -> Result<Transaction, FinTrackError> {
    let raw: RawTransaction = serde_json::from_value(value)?;
    Transaction::try_from(raw)
}

/// Normalizes a page of records, dropping (and logging) the ones that
/// cannot be read.
pub(super) fn normalize_all(items: Vec<Value>) -> Vec<Transaction> {
    let total = items.len();
    let transactions: Vec<Transaction> = items
        .into_iter()
        .enumerate()
        .filter_map(|(position, item)| match normalize(item) {
            Ok(tx) => Some(tx),
            Err(err) => {
                tracing::warn!(position, error = %err, "skipping unreadable transaction");
                None
            }
        })
        .collect();
    tracing::debug!(total, kept = transactions.len(), "normalized transactions");
    transactions
}
