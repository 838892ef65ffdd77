//! The `{success, data, error, meta}` wrapper every endpoint responds with.

use serde::Deserialize;
use serde_json::Value;

/// Pagination metadata attached to list responses.
///
/// Appears as `meta: {count, page, pageSize}` on the envelope or as
/// `pagination: {totalCount, page, pageSize}` inside a nested payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageMeta {
    /// Total number of matching records.
    #[serde(alias = "totalCount")]
    pub count: Option<u64>,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Records per page.
    pub page_size: Option<u32>,
}

/// Error code as sent by the server: a string or a bare number.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CodeValue {
    /// String code, e.g. `"TOKEN_EXPIRED"`.
    Text(String),
    /// Numeric code, e.g. `401`.
    Number(i64),
}

impl CodeValue {
    /// Returns the code as a string.
    #[inline]
    #[must_use]
    pub fn to_code_string(&self) -> String {
        match *self {
            Self::Text(ref text) => text.clone(),
            Self::Number(number) => number.to_string(),
        }
    }
}

/// Every shape the server uses for the `error` field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ErrorPayload {
    /// Bare message string.
    Message(String),
    /// List of messages or objects, e.g. per-field validation failures.
    Many(Vec<Value>),
    /// Structured error object.
    Detailed {
        /// Machine-readable code.
        #[serde(default)]
        code: Option<CodeValue>,
        /// Human-readable message.
        #[serde(default)]
        message: Option<String>,
        /// Arbitrary extra detail (field errors and the like).
        #[serde(default)]
        details: Option<Value>,
    },
}

impl ErrorPayload {
    /// Server code, if the payload carries one.
    #[inline]
    #[must_use]
    pub fn code(&self) -> Option<String> {
        match *self {
            Self::Detailed {
                code: Some(ref code),
                ..
            } => Some(code.to_code_string()),
            Self::Message(_) | Self::Many(_) | Self::Detailed { code: None, .. } => None,
        }
    }

    /// Best human-readable message the payload offers.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match *self {
            Self::Message(ref message) => Some(message.clone()),
            Self::Detailed {
                ref message,
                ref details,
                ..
            } => message
                .clone()
                .or_else(|| details.as_ref().and_then(describe_value)),
            Self::Many(ref items) => {
                let parts: Vec<String> = items.iter().filter_map(describe_value).collect();
                (!parts.is_empty()).then(|| parts.join("; "))
            }
        }
    }
}

/// Extracts text from a detail value: a string or an object's `message`
/// or `msg` field.
fn describe_value(value: &Value) -> Option<String> {
    match *value {
        Value::String(ref text) => Some(text.clone()),
        Value::Object(ref map) => map
            .get("message")
            .or_else(|| map.get("msg"))
            .and_then(Value::as_str)
            .map(str::to_owned),
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::Array(_) => None,
    }
}

/// Response wrapper shared by all endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T> {
    /// Whether the server considers the call successful.
    #[serde(default = "default_success")]
    pub success: bool,
    /// Payload on success.
    pub data: Option<T>,
    /// Error on failure.
    #[serde(default)]
    pub error: Option<ErrorPayload>,
    /// Pagination metadata.
    #[serde(default)]
    pub meta: Option<PageMeta>,
}

impl<T> ApiEnvelope<T> {
    /// Envelope standing in for a successful response with no body.
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
            meta: None,
        }
    }
}

/// Servers that omit `success` are treated as successful.
const fn default_success() -> bool {
    true
}
