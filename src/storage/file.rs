//! JSON-file-based credential store.
//!
//! Stores both tokens in a single `credentials.json` under a configurable
//! directory (default: `$XDG_DATA_HOME/fintrack-rs/`).

use core::future::{self, Future};
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use secrecy::{ExposeSecret as _, SecretString};

use super::{CredentialKey, CredentialStore};
use crate::error::{FinTrackError, Result};

/// Application name used for the XDG data directory.
const APP_NAME: &str = "fintrack-rs";

/// File holding the credentials.
const CREDENTIALS_FILE: &str = "credentials.json";
/// Sentinel file used for cross-process file locking.
const LOCK_FILE: &str = "credentials.lock";

/// On-disk shape: storage key string to token.
type CredentialMap = BTreeMap<String, String>;

/// File-backed credential store.
///
/// # Concurrency
///
/// Thread safety within a single process is provided by an in-process
/// [`Mutex`]. Cross-process safety is achieved via an advisory file lock
/// on `credentials.lock`. Reads take a shared lock, writes an exclusive
/// one, and every write replaces the file atomically (write to a
/// temporary file, then rename).
///
/// # File layout
///
/// ```text
/// <dir>/
///   credentials.lock      (cross-process lock sentinel)
///   credentials.json      {"@finance_tracker:auth_token": "...", ...}
/// ```
#[derive(Debug)]
pub struct FileCredentialStore {
    /// Directory containing the credentials file.
    dir: PathBuf,
    /// Mutex serializing concurrent in-process access.
    lock: Mutex<()>,
    /// Sentinel file for cross-process advisory locking.
    lock_file: File,
}

impl FileCredentialStore {
    /// Creates a store rooted at the given directory.
    ///
    /// Creates the directory (and parents) if it does not exist, and opens
    /// (or creates) the lock sentinel.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the lock
    /// file cannot be opened.
    #[inline]
    pub fn new(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir).map_err(storage_io_error)?;
        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(dir.join(LOCK_FILE))
            .map_err(storage_io_error)?;
        Ok(Self {
            dir,
            lock: Mutex::new(()),
            lock_file,
        })
    }

    /// Returns the default XDG-compliant data directory for this application.
    ///
    /// On Linux: `$XDG_DATA_HOME/fintrack-rs/` (typically
    /// `~/.local/share/fintrack-rs/`).
    ///
    /// # Errors
    ///
    /// Returns an error if the platform data directory cannot be determined.
    #[inline]
    pub fn default_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|data_path| data_path.join(APP_NAME))
            .ok_or_else(|| {
                FinTrackError::CredentialStorage(
                    "could not determine platform data directory".into(),
                )
            })
    }

    // ── Private helpers ─────────────────────────────────────────────

    /// Returns the full path for a given file name.
    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Acquires an in-process mutex guard and a shared (read) file lock,
    /// executes `op`, then releases the file lock.
    fn with_shared_lock<R, F: FnOnce() -> Result<R>>(&self, op: F) -> Result<R> {
        let _guard: MutexGuard<'_, ()> = self.lock.lock().map_err(|err| lock_poison_error(&err))?;
        self.lock_file.lock_shared().map_err(storage_io_error)?;
        let result = op();
        if let Err(err) = self.lock_file.unlock()
            && result.is_ok()
        {
            return Err(storage_io_error(err));
        }
        result
    }

    /// Acquires an in-process mutex guard and an exclusive (write) file
    /// lock, executes `op`, then releases the file lock.
    fn with_exclusive_lock<R, F: FnOnce() -> Result<R>>(&self, op: F) -> Result<R> {
        let _guard: MutexGuard<'_, ()> = self.lock.lock().map_err(|err| lock_poison_error(&err))?;
        self.lock_file.lock().map_err(storage_io_error)?;
        let result = op();
        if let Err(err) = self.lock_file.unlock()
            && result.is_ok()
        {
            return Err(storage_io_error(err));
        }
        result
    }

    /// Reads the credential map. A missing file is an empty map.
    fn read_map(&self) -> Result<CredentialMap> {
        match fs::read_to_string(self.path(CREDENTIALS_FILE)) {
            Ok(contents) => serde_json::from_str(&contents).map_err(FinTrackError::from),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(CredentialMap::new()),
            Err(err) => Err(storage_io_error(err)),
        }
    }

    /// Atomically writes the credential map; an empty map deletes the file.
    fn write_map(&self, map: &CredentialMap) -> Result<()> {
        let path = self.path(CREDENTIALS_FILE);
        if map.is_empty() {
            return match fs::remove_file(&path) {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(err) => Err(storage_io_error(err)),
            };
        }
        let tmp_path = self.path(&format!("{CREDENTIALS_FILE}.tmp"));
        let json = serde_json::to_string_pretty(map).map_err(FinTrackError::from)?;
        let mut file = create_private(&tmp_path)?;
        file.write_all(json.as_bytes()).map_err(storage_io_error)?;
        file.sync_all().map_err(storage_io_error)?;
        drop(file);
        fs::rename(&tmp_path, &path).map_err(storage_io_error)?;
        Ok(())
    }

    /// Reads one token (with lock).
    fn read_token(&self, key: CredentialKey) -> Result<Option<SecretString>> {
        self.with_shared_lock(|| {
            let mut map = self.read_map()?;
            Ok(map.remove(key.as_str()).map(SecretString::from))
        })
    }

    /// Writes one token (with lock).
    fn write_token(&self, key: CredentialKey, value: &SecretString) -> Result<()> {
        self.with_exclusive_lock(|| {
            let mut map = self.read_map()?;
            let _old = map.insert(key.as_str().to_owned(), value.expose_secret().to_owned());
            self.write_map(&map)
        })
    }

    /// Deletes one token (with lock).
    fn delete_token(&self, key: CredentialKey) -> Result<()> {
        self.with_exclusive_lock(|| {
            let mut map = self.read_map()?;
            if map.remove(key.as_str()).is_none() {
                return Ok(());
            }
            self.write_map(&map)
        })
    }
}

// ── Free-standing helpers ───────────────────────────────────────────────

/// Wraps an I/O error into a [`FinTrackError::CredentialStorage`].
fn storage_io_error(err: std::io::Error) -> FinTrackError {
    FinTrackError::CredentialStorage(Box::new(err))
}

/// Wraps a mutex poison error into a [`FinTrackError::CredentialStorage`].
fn lock_poison_error<T>(err: &std::sync::PoisonError<T>) -> FinTrackError {
    FinTrackError::CredentialStorage(err.to_string().into())
}

/// Opens `path` for writing, truncated and readable by its owner only
/// before any byte is written.
fn create_private(path: &Path) -> Result<File> {
    let mut options = OpenOptions::new();
    let _options = options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt as _;

        let _private = options.mode(0o600);
    }
    let file = options.open(path).map_err(storage_io_error)?;
    // A leftover file keeps its old mode through `open`.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt as _;

        file.set_permissions(fs::Permissions::from_mode(0o600))
            .map_err(storage_io_error)?;
    }
    Ok(file)
}

// ── CredentialStore implementation ──────────────────────────────────────

impl CredentialStore for FileCredentialStore {
    #[inline]
    fn get(&self, key: CredentialKey) -> impl Future<Output = Result<Option<SecretString>>> + Send {
        future::ready(self.read_token(key))
    }

    #[inline]
    fn set(&self, key: CredentialKey, value: SecretString) -> impl Future<Output = Result<()>> + Send {
        future::ready(self.write_token(key, &value))
    }

    #[inline]
    fn remove(&self, key: CredentialKey) -> impl Future<Output = Result<()>> + Send {
        future::ready(self.delete_token(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper to create a [`FileCredentialStore`] in a temporary directory.
    fn temp_store() -> (FileCredentialStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().to_path_buf()).unwrap();
        (store, dir)
    }

    fn secret(value: &str) -> SecretString {
        SecretString::from(value.to_owned())
    }

    #[tokio::test]
    async fn initially_empty() {
        let (store, _dir) = temp_store();
        assert!(store.get(CredentialKey::AuthToken).await.unwrap().is_none());
        assert!(store.get(CredentialKey::RefreshToken).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn tokens_persist_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileCredentialStore::new(dir.path().to_path_buf()).unwrap();
            store.set(CredentialKey::AuthToken, secret("acc")).await.unwrap();
            store.set(CredentialKey::RefreshToken, secret("ref")).await.unwrap();
        }
        let store = FileCredentialStore::new(dir.path().to_path_buf()).unwrap();
        let access = store.get(CredentialKey::AuthToken).await.unwrap().unwrap();
        assert_eq!(access.expose_secret(), "acc");
        let refresh = store.get(CredentialKey::RefreshToken).await.unwrap().unwrap();
        assert_eq!(refresh.expose_secret(), "ref");
    }

    #[tokio::test]
    async fn file_uses_storage_keys() {
        let (store, dir) = temp_store();
        store.set(CredentialKey::AuthToken, secret("acc")).await.unwrap();
        let contents = fs::read_to_string(dir.path().join(CREDENTIALS_FILE)).unwrap();
        let map: CredentialMap = serde_json::from_str(&contents).unwrap();
        assert_eq!(map.get("@finance_tracker:auth_token").map(String::as_str), Some("acc"));
        assert!(!dir.path().join(format!("{CREDENTIALS_FILE}.tmp")).exists());
    }

    #[tokio::test]
    async fn clear_deletes_file() {
        let (store, dir) = temp_store();
        store.set(CredentialKey::AuthToken, secret("acc")).await.unwrap();
        store.set(CredentialKey::RefreshToken, secret("ref")).await.unwrap();
        store.clear().await.unwrap();
        assert!(!dir.path().join(CREDENTIALS_FILE).exists());
        assert!(dir.path().join(LOCK_FILE).exists());
        assert!(store.get(CredentialKey::AuthToken).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn overwrite_replaces_value() {
        let (store, _dir) = temp_store();
        store.set(CredentialKey::AuthToken, secret("old")).await.unwrap();
        store.set(CredentialKey::AuthToken, secret("new")).await.unwrap();
        let token = store.get(CredentialKey::AuthToken).await.unwrap().unwrap();
        assert_eq!(token.expose_secret(), "new");
    }

    #[test]
    fn corrupt_file_is_serialization_error() {
        let (store, dir) = temp_store();
        fs::write(dir.path().join(CREDENTIALS_FILE), "not json").unwrap();
        let err = store.read_token(CredentialKey::AuthToken).unwrap_err();
        assert!(matches!(err, FinTrackError::Serialization(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt as _;

        let (store, dir) = temp_store();
        store.set(CredentialKey::AuthToken, secret("acc")).await.unwrap();
        let mode = fs::metadata(dir.path().join(CREDENTIALS_FILE))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn private_file_is_owner_only_before_writing() {
        use std::os::unix::fs::PermissionsExt as _;

        let dir = tempfile::tempdir().unwrap();
        let leftover = dir.path().join("credentials.json.tmp");
        fs::write(&leftover, "stale").unwrap();
        fs::set_permissions(&leftover, fs::Permissions::from_mode(0o644)).unwrap();

        let file = create_private(&leftover).unwrap();
        let mode = file.metadata().unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(file.metadata().unwrap().len(), 0);

        let fresh = create_private(&dir.path().join("fresh.tmp")).unwrap();
        assert_eq!(fresh.metadata().unwrap().permissions().mode() & 0o777, 0o600);
    }
}
