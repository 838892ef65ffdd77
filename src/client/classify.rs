//! Maps a raw HTTP response onto the request state machine.
//!
//! Every response, whatever shape its error takes, ends up as one
//! [`Attempt`]; [`failure`] is the single place a server error becomes an
//! [`ApiError`].

use secrecy::SecretString;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{ApiError, ErrorCode};
use crate::models::{ApiEnvelope, ErrorPayload};

/// Server code announcing an expired access token.
const TOKEN_EXPIRED: &str = "TOKEN_EXPIRED";
/// Server code announcing throttling.
const RATE_LIMIT_EXCEEDED: &str = "RATE_LIMIT_EXCEEDED";
/// Server code announcing a rejected payload.
const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
/// Message fragments (lowercase) that mark an authentication failure.
const AUTH_MESSAGE_MARKERS: [&str; 3] = ["unauthorized", "invalid user", "token expired"];

/// Outcome of a single HTTP attempt.
#[derive(Debug)]
pub(super) enum Attempt<T> {
    /// The server accepted the request.
    Success(ApiEnvelope<T>),
    /// The access token was rejected.
    AuthExpired {
        /// Normalized error.
        error: ApiError,
        /// Token the rejected attempt carried.
        stale_token: Option<SecretString>,
    },
    /// Throttled (429) or server failure (5xx); worth retrying.
    Transient(ApiError),
    /// Not worth retrying.
    Fatal(ApiError),
}

/// Loose view of an error body; servers put the error under `error`,
/// `detail` or a top-level `message`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    /// Envelope success flag.
    #[serde(default)]
    success: Option<bool>,
    /// Envelope error.
    #[serde(default)]
    error: Option<ErrorPayload>,
    /// Framework-style error detail.
    #[serde(default)]
    detail: Option<ErrorPayload>,
    /// Bare message.
    #[serde(default)]
    message: Option<String>,
}

impl ErrorBody {
    /// The most specific payload present.
    fn into_payload(self) -> Option<ErrorPayload> {
        self.error
            .or(self.detail)
            .or_else(|| self.message.map(ErrorPayload::Message))
    }
}

/// Classifies a response by status and body.
///
/// `stale_token` is the bearer token the request carried; it is handed
/// back on auth failures so the caller can tell whether a refresh already
/// happened meanwhile.
pub(super) fn classify<T: DeserializeOwned>(
    status: u16,
    body: &str,
    stale_token: Option<SecretString>,
) -> Attempt<T> {
    let trimmed = body.trim();
    let error_body: Option<ErrorBody> = if trimmed.is_empty() {
        None
    } else {
        serde_json::from_str(trimmed).ok()
    };

    if (200..300).contains(&status) {
        if trimmed.is_empty() {
            return Attempt::Success(ApiEnvelope::empty());
        }
        let declared_failure = error_body
            .as_ref()
            .is_some_and(|parsed| parsed.success == Some(false));
        if !declared_failure {
            return match serde_json::from_str::<ApiEnvelope<T>>(trimmed) {
                Ok(envelope) => Attempt::Success(envelope),
                Err(err) => Attempt::Fatal(
                    ApiError::new(
                        ErrorCode::UnknownError,
                        format!("malformed response body: {err}"),
                    )
                    .with_status(status),
                ),
            };
        }
    }

    let payload = error_body.and_then(ErrorBody::into_payload);
    match failure(status, payload.as_ref()) {
        Failure::Auth(error) => Attempt::AuthExpired { error, stale_token },
        Failure::Transient(error) => Attempt::Transient(error),
        Failure::Fatal(error) => Attempt::Fatal(error),
    }
}

/// A classified server-side failure.
#[derive(Debug)]
enum Failure {
    /// Authentication failure.
    Auth(ApiError),
    /// Retryable failure.
    Transient(ApiError),
    /// Permanent failure.
    Fatal(ApiError),
}

/// Normalizes a failed response into an [`ApiError`] and decides how the
/// state machine treats it.
fn failure(status: u16, payload: Option<&ErrorPayload>) -> Failure {
    let server_code = payload.and_then(ErrorPayload::code);
    let message = payload
        .and_then(ErrorPayload::message)
        .filter(|text| !text.trim().is_empty())
        .unwrap_or_else(|| default_message(status));
    let code_is = |expected: &str| {
        server_code
            .as_deref()
            .is_some_and(|code| code.eq_ignore_ascii_case(expected))
    };

    let build = |code: ErrorCode| {
        ApiError::new(code, message.clone())
            .with_status(status)
            .with_server_code(server_code.clone())
    };

    if status == 401 || code_is("401") || code_is(TOKEN_EXPIRED) || mentions_auth(&message) {
        Failure::Auth(build(ErrorCode::AuthExpired))
    } else if status == 429 || code_is(RATE_LIMIT_EXCEEDED) {
        Failure::Transient(build(ErrorCode::RateLimitExceeded))
    } else if status >= 500 {
        Failure::Transient(build(ErrorCode::ServerError))
    } else if status == 400 || status == 422 || code_is(VALIDATION_ERROR) {
        Failure::Fatal(build(ErrorCode::ValidationError))
    } else {
        Failure::Fatal(build(ErrorCode::UnknownError))
    }
}

/// Whether a message reads like an authentication failure.
fn mentions_auth(message: &str) -> bool {
    let lower = message.to_lowercase();
    AUTH_MESSAGE_MARKERS
        .iter()
        .any(|marker| lower.contains(marker))
}

/// Message used when the server gave none.
fn default_message(status: u16) -> String {
    match status {
        401 => "authentication required".to_owned(),
        429 => "too many requests".to_owned(),
        500..=599 => format!("server error (HTTP {status})"),
        _ => format!("request failed (HTTP {status})"),
    }
}

/// Converts a transport failure into a `NETWORK_ERROR`.
pub(super) fn network_error(err: &reqwest::Error) -> ApiError {
    let detail = if err.is_timeout() {
        "request timed out"
    } else if err.is_connect() {
        "could not connect to server"
    } else {
        "network failure"
    };
    ApiError::new(ErrorCode::NetworkError, format!("{detail}: {err}"))
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;

    fn code_of(attempt: Attempt<Value>) -> Option<ErrorCode> {
        match attempt {
            Attempt::Success(_) => None,
            Attempt::AuthExpired { error, .. } | Attempt::Transient(error) | Attempt::Fatal(error) => {
                Some(error.code)
            }
        }
    }

    #[test]
    fn success_envelope() {
        let attempt = classify::<Vec<u32>>(200, r#"{"success": true, "data": [1, 2]}"#, None);
        let Attempt::Success(envelope) = attempt else {
            panic!("expected success");
        };
        assert_eq!(envelope.data, Some(vec![1, 2]));
    }

    #[test]
    fn empty_success_body() {
        let attempt = classify::<Value>(204, "", None);
        let Attempt::Success(envelope) = attempt else {
            panic!("expected success");
        };
        assert!(envelope.success);
        assert!(envelope.data.is_none());
    }

    #[test]
    fn status_401_is_auth() {
        let attempt = classify::<Value>(401, "", None);
        assert_eq!(code_of(attempt), Some(ErrorCode::AuthExpired));
    }

    #[test]
    fn ok_status_with_unauthorized_envelope_is_auth() {
        let attempt = classify::<Value>(
            200,
            r#"{"success": false, "error": {"code": "AUTH", "message": "Invalid user session"}}"#,
            None,
        );
        assert!(matches!(attempt, Attempt::AuthExpired { .. }));
    }

    #[test]
    fn numeric_401_code_and_token_expired_code() {
        let attempt = classify::<Value>(
            403,
            r#"{"success": false, "error": {"code": 401, "message": "nope"}}"#,
            None,
        );
        assert_eq!(code_of(attempt), Some(ErrorCode::AuthExpired));

        let attempt = classify::<Value>(
            403,
            r#"{"success": false, "error": {"code": "TOKEN_EXPIRED", "message": "nope"}}"#,
            None,
        );
        assert_eq!(code_of(attempt), Some(ErrorCode::AuthExpired));
    }

    #[test]
    fn rate_limit_by_status_and_code() {
        assert_eq!(
            code_of(classify::<Value>(429, "", None)),
            Some(ErrorCode::RateLimitExceeded)
        );
        let attempt = classify::<Value>(
            200,
            r#"{"success": false, "error": {"code": "RATE_LIMIT_EXCEEDED", "message": "slow down"}}"#,
            None,
        );
        assert!(matches!(attempt, Attempt::Transient(_)));
    }

    #[test]
    fn server_errors_are_transient() {
        let attempt = classify::<Value>(503, "<html>Service Unavailable</html>", None);
        let Attempt::Transient(error) = attempt else {
            panic!("expected transient");
        };
        assert_eq!(error.code, ErrorCode::ServerError);
        assert_eq!(error.status, Some(503));
        assert_eq!(error.message, "server error (HTTP 503)");
    }

    #[test]
    fn validation_errors_keep_server_code() {
        let attempt = classify::<Value>(
            422,
            r#"{"detail": [{"loc": ["body", "amount"], "msg": "field required"}]}"#,
            None,
        );
        let Attempt::Fatal(error) = attempt else {
            panic!("expected fatal");
        };
        assert_eq!(error.code, ErrorCode::ValidationError);
        assert_eq!(error.message, "field required");

        let attempt = classify::<Value>(
            409,
            r#"{"success": false, "error": {"code": "VALIDATION_ERROR", "message": "bad"}}"#,
            None,
        );
        let Attempt::Fatal(error) = attempt else {
            panic!("expected fatal");
        };
        assert_eq!(error.code, ErrorCode::ValidationError);
        assert_eq!(error.server_code.as_deref(), Some("VALIDATION_ERROR"));
    }

    #[test]
    fn other_errors_are_unknown() {
        let attempt = classify::<Value>(
            404,
            r#"{"success": false, "error": "Transaction not found"}"#,
            None,
        );
        let Attempt::Fatal(error) = attempt else {
            panic!("expected fatal");
        };
        assert_eq!(error.code, ErrorCode::UnknownError);
        assert_eq!(error.message, "Transaction not found");
    }

    #[test]
    fn malformed_success_body_is_fatal() {
        let attempt = classify::<Vec<u32>>(200, r#"{"success": true, "data": "oops"}"#, None);
        assert!(matches!(attempt, Attempt::Fatal(_)));
    }

    #[test]
    fn stale_token_is_handed_back() {
        let token = SecretString::from("old".to_owned());
        let attempt = classify::<Value>(401, "", Some(token));
        let Attempt::AuthExpired { stale_token, .. } = attempt else {
            panic!("expected auth failure");
        };
        assert!(stale_token.is_some());
    }
}
