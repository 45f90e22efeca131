//! Key-value storage backends for session data. `MemoryStorage` lives as long as
//! the process, like a browser tab's session storage; `FileStorage` survives
//! restarts and backs the CLI.

use serde_json::Value;
use std::{
    collections::BTreeMap,
    ffi::OsString,
    fmt,
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("storage file is not a JSON object: {0}")]
    Format(#[from] serde_json::Error),
}

/// String-keyed storage with the semantics of the web storage API.
pub trait KeyValueStore: Send + Sync + fmt::Debug {
    fn get_item(&self, key: &str) -> Option<String>;

    /// # Errors
    /// Returns `StorageError` if the value cannot be persisted.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing a missing key is not an error.
    ///
    /// # Errors
    /// Returns `StorageError` if the backend cannot be updated.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

/// JSON object on disk, rewritten on every change. The file is created with
/// owner-only permissions because it holds bearer tokens.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(err.into()),
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        let value: Value = serde_json::from_str(&raw)?;
        Ok(value
            .as_object()
            .map(|object| {
                object
                    .iter()
                    .filter_map(|(key, value)| Some((key.clone(), value.as_str()?.to_string())))
                    .collect()
            })
            .unwrap_or_default())
    }

    /// Writes to an owner-only sibling file and renames it over the target, so
    /// the target never holds partial contents or wider permissions.
    fn write(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(items)?;

        let staging = self.staging_path();
        let mut file = owner_only_options().open(&staging)?;
        restrict_permissions(&staging)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()?;
        drop(file);
        fs::rename(&staging, &self.path)?;
        Ok(())
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Current items; a corrupt file reads as empty so it gets overwritten.
    fn read_for_update(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match self.read() {
            Ok(items) => Ok(items),
            Err(StorageError::Format(err)) => {
                tracing::warn!(path = %self.path.display(), "replacing corrupt storage file: {err}");
                Ok(BTreeMap::new())
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(unix)]
fn owner_only_options() -> OpenOptions {
    use std::os::unix::fs::OpenOptionsExt;
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true).mode(0o600);
    options
}

#[cfg(not(unix))]
fn owner_only_options() -> OpenOptions {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    options
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}

impl KeyValueStore for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        match self.read() {
            Ok(mut items) => items.remove(key),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), "unreadable storage file: {err}");
                None
            }
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut items = self.read_for_update()?;
        items.insert(key.to_string(), value.to_string());
        self.write(&items)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.path.exists() {
            return Ok(());
        }
        let mut items = self.read_for_update()?;
        items.remove(key);
        self.write(&items)
    }
}
