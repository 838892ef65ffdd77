//! Error types for the finance tracker client library.
//!
//! Two layers exist: [`FinTrackError`] for local failures (storage,
//! serialization, malformed records) and [`ApiError`], the single
//! normalized shape every API call surfaces.

use serde::{Deserialize, Serialize};

/// Convenience alias for results carrying a [`FinTrackError`].
pub type Result<T> = core::result::Result<T, FinTrackError>;

/// Convenience alias for results returned by API client calls.
pub type ApiResult<T> = core::result::Result<T, ApiError>;

/// All local errors that can occur when using the library.
#[derive(Debug, thiserror::Error)]
pub enum FinTrackError {
    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Credential storage backend failed.
    #[error("credential storage error: {0}")]
    CredentialStorage(Box<dyn core::error::Error + Send + Sync>),

    /// A record received from the API could not be normalized.
    #[error("invalid {record} field `{field}`: {reason}")]
    InvalidRecord {
        /// Record kind and identifier, e.g. `transaction tx-1`.
        record: String,
        /// Offending field name.
        field: &'static str,
        /// Human-readable reason.
        reason: String,
    },

    /// Client configuration is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Normalized error category surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The session is no longer valid and could not be refreshed.
    AuthExpired,
    /// The server throttled the request and retries were exhausted.
    RateLimitExceeded,
    /// The server failed (5xx) and retries were exhausted.
    ServerError,
    /// Connectivity, DNS or timeout failure.
    NetworkError,
    /// The request was rejected as malformed.
    ValidationError,
    /// Anything else.
    UnknownError,
}

impl ErrorCode {
    /// Returns the wire representation of the code.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AuthExpired => "AUTH_EXPIRED",
            Self::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            Self::ServerError => "SERVER_ERROR",
            Self::NetworkError => "NETWORK_ERROR",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

impl core::fmt::Display for ErrorCode {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single error shape returned by every API call.
///
/// `message` is suitable for direct display; `code` is what callers
/// branch on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("{message} [{code}]")]
pub struct ApiError {
    /// Display message.
    pub message: String,
    /// Normalized error category.
    pub code: ErrorCode,
    /// HTTP status, when a response was received.
    pub status: Option<u16>,
    /// Raw application error code reported by the server, if any.
    pub server_code: Option<String>,
}

impl ApiError {
    /// Creates an error with the given code and message and no status.
    #[inline]
    #[must_use]
    pub fn new<M: Into<String>>(code: ErrorCode, message: M) -> Self {
        Self {
            message: message.into(),
            code,
            status: None,
            server_code: None,
        }
    }

    /// Attaches an HTTP status.
    #[inline]
    #[must_use]
    pub const fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Attaches the server-reported error code.
    #[inline]
    #[must_use]
    pub fn with_server_code(mut self, server_code: Option<String>) -> Self {
        self.server_code = server_code;
        self
    }

    /// Returns `true` for the terminal authentication failure.
    #[inline]
    #[must_use]
    pub fn is_auth_expired(&self) -> bool {
        self.code == ErrorCode::AuthExpired
    }
}

impl From<FinTrackError> for ApiError {
    #[inline]
    fn from(err: FinTrackError) -> Self {
        let code = match err {
            FinTrackError::InvalidRecord { .. } => ErrorCode::ValidationError,
            FinTrackError::Serialization(_)
            | FinTrackError::CredentialStorage(_)
            | FinTrackError::InvalidConfig(_) => ErrorCode::UnknownError,
        };
        Self::new(code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_from_serde_json() {
        let serde_err = serde_json::from_str::<String>("not json").unwrap_err();
        let err = FinTrackError::from(serde_err);
        assert!(matches!(err, FinTrackError::Serialization(_)));
        assert!(err.to_string().contains("serialization error"));
    }

    #[test]
    fn credential_storage_display() {
        let inner = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err = FinTrackError::CredentialStorage(Box::new(inner));
        let msg = err.to_string();
        assert!(msg.contains("credential storage error"));
        assert!(msg.contains("file missing"));
    }

    #[test]
    fn invalid_record_names_field() {
        let err = FinTrackError::InvalidRecord {
            record: "transaction tx-9".to_owned(),
            field: "amount",
            reason: "not a number: abc".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "invalid transaction tx-9 field `amount`: not a number: abc"
        );
    }

    #[test]
    fn invalid_record_maps_to_validation_error() {
        let err = FinTrackError::InvalidRecord {
            record: "transaction".to_owned(),
            field: "date",
            reason: "empty".to_owned(),
        };
        let api: ApiError = err.into();
        assert_eq!(api.code, ErrorCode::ValidationError);
        assert!(api.status.is_none());
    }

    #[test]
    fn storage_error_maps_to_unknown_error() {
        let err = FinTrackError::CredentialStorage("disk gone".into());
        let api = ApiError::from(err);
        assert_eq!(api.code, ErrorCode::UnknownError);
        assert!(api.message.contains("disk gone"));
    }

    #[test]
    fn error_code_serializes_screaming_snake() {
        let json = serde_json::to_string(&ErrorCode::RateLimitExceeded).unwrap();
        assert_eq!(json, r#""RATE_LIMIT_EXCEEDED""#);
        assert_eq!(ErrorCode::AuthExpired.to_string(), "AUTH_EXPIRED");
    }

    #[test]
    fn api_error_display_includes_code() {
        let err = ApiError::new(ErrorCode::ServerError, "boom").with_status(503);
        assert_eq!(err.to_string(), "boom [SERVER_ERROR]");
        assert_eq!(err.status, Some(503));
    }

    #[test]
    fn errors_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FinTrackError>();
        assert_send_sync::<ApiError>();
    }
}
