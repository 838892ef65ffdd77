//! In-memory credential store.
//!
//! Provides [`InMemoryCredentialStore`], a thread-safe implementation of
//! [`CredentialStore`] that forgets everything when dropped. Ideal for
//! tests and for processes that should not leave a session on disk.

use core::future::{self, Future};
use std::collections::HashMap;
use std::sync::Mutex;

use secrecy::{ExposeSecret as _, SecretString};

use super::{CredentialKey, CredentialStore};
use crate::error::{FinTrackError, Result};

/// Thread-safe in-memory credential store.
///
/// # Example
///
/// ```rust
/// use fintrack_rs::storage::InMemoryCredentialStore;
///
/// let store = InMemoryCredentialStore::with_tokens("access", Some("refresh"));
/// // Use with the API client builder:
/// // ApiClient::builder().credential_store(store).build()
/// ```
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    /// Stored credentials behind a single mutex.
    inner: Mutex<HashMap<CredentialKey, SecretString>>,
}

impl InMemoryCredentialStore {
    /// Creates an empty store.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with an access token and, optionally,
    /// a refresh token.
    #[must_use]
    pub fn with_tokens(access: &str, refresh: Option<&str>) -> Self {
        let mut map = HashMap::with_capacity(2);
        let _prev = map.insert(CredentialKey::AuthToken, SecretString::from(access.to_owned()));
        if let Some(token) = refresh {
            let _replaced = map.insert(CredentialKey::RefreshToken, SecretString::from(token.to_owned()));
        }
        Self {
            inner: Mutex::new(map),
        }
    }

    /// Acquires the inner lock and applies a closure.
    fn with_lock<R>(&self, f: impl FnOnce(&mut HashMap<CredentialKey, SecretString>) -> R) -> Result<R> {
        let mut inner = self.inner.lock().map_err(|err| lock_error(&err))?;
        Ok(f(&mut inner))
    }
}

/// Wraps a mutex poison error.
fn lock_error<T>(err: &std::sync::PoisonError<T>) -> FinTrackError {
    FinTrackError::CredentialStorage(err.to_string().into())
}

impl CredentialStore for InMemoryCredentialStore {
    #[inline]
    fn get(&self, key: CredentialKey) -> impl Future<Output = Result<Option<SecretString>>> + Send {
        future::ready(self.with_lock(|inner| {
            inner
                .get(&key)
                .map(|value| SecretString::from(value.expose_secret().to_owned()))
        }))
    }

    #[inline]
    fn set(&self, key: CredentialKey, value: SecretString) -> impl Future<Output = Result<()>> + Send {
        future::ready(self.with_lock(|inner| {
            let _prev = inner.insert(key, value);
        }))
    }

    #[inline]
    fn remove(&self, key: CredentialKey) -> impl Future<Output = Result<()>> + Send {
        future::ready(self.with_lock(|inner| {
            let _prev = inner.remove(&key);
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_store_returns_none() {
        let store = InMemoryCredentialStore::new();
        assert!(store.get(CredentialKey::AuthToken).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_get_remove() {
        let store = InMemoryCredentialStore::new();
        store
            .set(CredentialKey::AuthToken, SecretString::from("abc".to_owned()))
            .await
            .unwrap();
        let token = store.get(CredentialKey::AuthToken).await.unwrap().unwrap();
        assert_eq!(token.expose_secret(), "abc");

        store.remove(CredentialKey::AuthToken).await.unwrap();
        assert!(store.get(CredentialKey::AuthToken).await.unwrap().is_none());
        store.remove(CredentialKey::AuthToken).await.unwrap();
    }

    #[tokio::test]
    async fn clear_removes_both_tokens() {
        let store = InMemoryCredentialStore::with_tokens("a", Some("r"));
        assert!(store.get(CredentialKey::RefreshToken).await.unwrap().is_some());
        store.clear().await.unwrap();
        assert!(store.get(CredentialKey::AuthToken).await.unwrap().is_none());
        assert!(store.get(CredentialKey::RefreshToken).await.unwrap().is_none());
    }

    #[test]
    fn debug_does_not_leak_tokens() {
        let store = InMemoryCredentialStore::with_tokens("very-secret", None);
        assert!(!format!("{store:?}").contains("very-secret"));
    }
}
