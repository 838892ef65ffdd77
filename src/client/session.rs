//! Session lifecycle notifications and the refresh request body.

use core::fmt;

use serde::Serialize;

/// Session changes the UI layer reacts to.
///
/// Delivered through [`super::ApiClient::session_events`]; the client
/// never navigates anywhere itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Tokens were obtained through login or registration.
    LoggedIn,
    /// The session ended on request.
    LoggedOut,
    /// The session could not be refreshed; credentials were wiped and the
    /// user must sign in again.
    Expired {
        /// Why the session ended.
        reason: String,
    },
}

/// Body of `POST /auth/refresh`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RefreshRequest<'a> {
    /// Current refresh token.
    pub(super) refresh_token: &'a str,
}

impl fmt::Debug for RefreshRequest<'_> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshRequest")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}
