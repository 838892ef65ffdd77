//! Request and response bodies of the `/auth/` endpoints.
//!
//! Passwords and tokens travel as plain `String`s on the wire; the
//! `Debug` impls redact them so they never reach a log line.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::UserId;

/// Placeholder printed instead of secret values.
const REDACTED: &str = "[REDACTED]";

/// Body of `POST /auth/login`.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
    /// Ask the server for a long-lived refresh token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remember_me: Option<bool>,
}

impl LoginRequest {
    /// Creates a login request.
    #[inline]
    #[must_use]
    pub fn new<E: Into<String>, P: Into<String>>(email: E, password: P) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            remember_me: None,
        }
    }

    /// Sets the remember-me flag.
    #[inline]
    #[must_use]
    pub const fn remember_me(mut self, remember: bool) -> Self {
        self.remember_me = Some(remember);
        self
    }
}

impl fmt::Debug for LoginRequest {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &REDACTED)
            .field("remember_me", &self.remember_me)
            .finish()
    }
}

/// Body of `POST /auth/register`.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Display name.
    pub name: String,
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl RegisterRequest {
    /// Creates a registration request.
    #[inline]
    #[must_use]
    pub fn new<N: Into<String>, E: Into<String>, P: Into<String>>(
        name: N,
        email: E,
        password: P,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for RegisterRequest {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &REDACTED)
            .finish()
    }
}

/// Authenticated user as returned by login and registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    /// User identifier.
    pub id: UserId,
    /// Account email.
    #[serde(default)]
    pub email: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
}

/// Tokens (and optionally the user) returned by login, registration and
/// refresh.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    /// Access token.
    #[serde(alias = "accessToken")]
    pub token: String,
    /// Refresh token; refresh responses may omit it to keep the old one.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// The signed-in user.
    #[serde(default)]
    pub user: Option<AuthUser>,
}

impl fmt::Debug for AuthSession {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("token", &REDACTED)
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| REDACTED))
            .field("user", &self.user)
            .finish()
    }
}
