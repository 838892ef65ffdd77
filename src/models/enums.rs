//! Enumeration types for constrained API values.

use serde::{Deserialize, Serialize};

/// Direction of money flow for a transaction or budget line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in.
    Income,
    /// Money going out.
    Expense,
}

impl TransactionKind {
    /// Returns the wire representation.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

/// Field used to order a transaction listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Order by transaction date.
    Date,
    /// Order by amount.
    Amount,
}

impl SortBy {
    /// Returns the wire representation.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Amount => "amount",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl SortOrder {
    /// Returns the wire representation.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_kind_serde_roundtrip() {
        let variants = [
            (TransactionKind::Income, r#""income""#),
            (TransactionKind::Expense, r#""expense""#),
        ];
        for (variant, expected_json) in variants {
            let json = serde_json::to_string(&variant).unwrap();
            assert_eq!(json, expected_json);
            let deserialized: TransactionKind = serde_json::from_str(&json).unwrap();
            assert_eq!(deserialized, variant);
            assert_eq!(format!(r#""{}""#, variant.as_str()), expected_json);
        }
    }

    #[test]
    fn sort_enums_match_wire_names() {
        assert_eq!(SortBy::Amount.as_str(), "amount");
        assert_eq!(SortOrder::Desc.as_str(), "desc");
        let by: SortBy = serde_json::from_str(r#""date""#).unwrap();
        assert_eq!(by, SortBy::Date);
    }

    #[test]
    fn invalid_kind_fails() {
        let result = serde_json::from_str::<TransactionKind>(r#""transfer""#);
        assert!(result.is_err());
    }
}
