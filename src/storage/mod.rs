// SPDX-License-Identifier: PMPL-1.0-or-later

//! Client-local key-value storage.
//!
//! The site keeps two values in local storage: the session `token` written
//! by the login flow, and the `site_lang` locale preference. The client only
//! ever reads them; [`WritableStore`] exists for tooling and tests.

use anyhow::{anyhow, Context, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::warn;

/// Key holding the session credential.
pub const TOKEN_KEY: &str = "token";
/// Key holding the locale preference (`zh`, `en`, `ja`).
pub const LOCALE_KEY: &str = "site_lang";

const STORAGE_FILE: &str = "storage.json";
const APP_DIR: &str = "portfolio-client";

/// Read access to a string-valued key-value store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// Stores that can also be written. The API client never needs this.
pub trait WritableStore: KeyValueStore {
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

/// Returns the stored session token, treating blank values as absent.
pub fn session_token<S: KeyValueStore + ?Sized>(store: &S) -> Option<String> {
    store
        .get(TOKEN_KEY)
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

// ─── File-backed store ──────────────────────────────────────────────

/// A JSON object on disk, re-read on every lookup so that values written by
/// another process (the login flow) are picked up without a restart.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/portfolio-client/storage.json`, if the platform has a data dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|mut path| {
            path.push(APP_DIR);
            path.push(STORAGE_FILE);
            path
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All entries in the file. A missing or empty file is an empty store.
    pub fn entries(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        let value: Value = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        match value {
            Value::Object(map) => Ok(map),
            _ => Err(anyhow!("{} is not a JSON object", self.path.display())),
        }
    }

    fn write_entries(&self, entries: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, payload)
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.entries() {
            Ok(entries) => entries.get(key).and_then(value_as_string),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "local storage unreadable");
                None
            }
        }
    }
}

impl WritableStore for FileStore {
    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries()?;
        entries.insert(key.to_string(), Value::String(value.to_string()));
        self.write_entries(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries()?;
        if entries.remove(key).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

// Local storage only holds strings; anything else written by hand is
// stringified the same way a browser would coerce it.
fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ─── In-memory store ────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, key: &str, value: &str) -> Self {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

impl WritableStore for MemoryStore {
    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("storage.json"));
        assert_eq!(store.get(TOKEN_KEY), None);
        assert!(store.entries().unwrap().is_empty());
    }

    #[test]
    fn file_store_set_get_remove() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("storage.json"));

        store.set(TOKEN_KEY, "abc.def.ghi").unwrap();
        store.set(LOCALE_KEY, "ja").unwrap();
        assert_eq!(store.get(TOKEN_KEY).as_deref(), Some("abc.def.ghi"));
        assert_eq!(store.get(LOCALE_KEY).as_deref(), Some("ja"));

        store.remove(TOKEN_KEY).unwrap();
        assert_eq!(store.get(TOKEN_KEY), None);
        assert_eq!(store.get(LOCALE_KEY).as_deref(), Some("ja"));
    }

    #[test]
    fn file_store_sees_external_writes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage.json");
        let store = FileStore::new(&path);
        assert_eq!(store.get(TOKEN_KEY), None);

        fs::write(&path, r#"{"token": "written-by-login"}"#).unwrap();
        assert_eq!(store.get(TOKEN_KEY).as_deref(), Some("written-by-login"));
    }

    #[test]
    fn corrupt_file_reads_as_absent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "not json").unwrap();
        let store = FileStore::new(&path);
        assert_eq!(store.get(TOKEN_KEY), None);
        assert!(store.entries().is_err());
    }

    #[test]
    fn non_string_values_are_stringified() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, r#"{"n": 42, "gone": null}"#).unwrap();
        let store = FileStore::new(&path);
        assert_eq!(store.get("n").as_deref(), Some("42"));
        assert_eq!(store.get("gone"), None);
    }

    #[test]
    fn blank_token_counts_as_absent() {
        let store = MemoryStore::new().with(TOKEN_KEY, "   ");
        assert_eq!(session_token(&store), None);

        let store = MemoryStore::new().with(TOKEN_KEY, " tok ");
        assert_eq!(session_token(&store).as_deref(), Some("tok"));
    }
}
