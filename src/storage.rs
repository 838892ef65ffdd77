//! Pluggable credential storage for the session tokens.
//!
//! The client persists exactly two values, the access token and the
//! refresh token, under the keys in [`CredentialKey`]. Backends implement
//! [`CredentialStore`]; [`InMemoryCredentialStore`] suits tests and
//! short-lived processes, [`FileCredentialStore`] (feature `storage-file`)
//! keeps a session across CLI invocations.

#[cfg(feature = "storage-file")]
mod file;
mod memory;

use core::future::Future;

use secrecy::SecretString;

use crate::error::Result;

#[cfg(feature = "storage-file")]
pub use file::FileCredentialStore;
pub use memory::InMemoryCredentialStore;

/// The persisted credential slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialKey {
    /// Bearer token attached to every request.
    AuthToken,
    /// Long-lived token exchanged for a new access token.
    RefreshToken,
}

impl CredentialKey {
    /// Both keys, in the order they are cleared.
    pub const ALL: [Self; 2] = [Self::AuthToken, Self::RefreshToken];

    /// Storage key string.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AuthToken => "@finance_tracker:auth_token",
            Self::RefreshToken => "@finance_tracker:refresh_token",
        }
    }
}

/// Async key-value store for session credentials.
///
/// All methods take `&self`; implementations use interior mutability
/// (e.g. `Mutex`) for thread-safe mutation.
pub trait CredentialStore: core::fmt::Debug + Send + Sync {
    /// Reads one credential; `Ok(None)` when it was never stored or has
    /// been removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails to read.
    fn get(&self, key: CredentialKey) -> impl Future<Output = Result<Option<SecretString>>> + Send;

    /// Stores one credential, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails to write.
    fn set(&self, key: CredentialKey, value: SecretString) -> impl Future<Output = Result<()>> + Send;

    /// Removes one credential. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails to write.
    fn remove(&self, key: CredentialKey) -> impl Future<Output = Result<()>> + Send;

    /// Removes both credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails to write.
    #[inline]
    fn clear(&self) -> impl Future<Output = Result<()>> + Send {
        async move {
            for key in CredentialKey::ALL {
                self.remove(key).await?;
            }
            Ok(())
        }
    }
}
