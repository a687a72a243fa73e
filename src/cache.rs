//! TTL cache over browser key-value storage.
//!
//! Each dataset is stored as a JSON payload under its key, with the write
//! time (epoch milliseconds) under `<key>Timestamp`. A lookup is valid while
//! the entry is younger than the dataset's TTL. Anything unreadable is
//! treated as a miss so the caller falls through to a fresh fetch.
//!
//! # Stores
//! - [`BrowserStorage`]: `localStorage` / `sessionStorage`
//! - [`MemoryStore`]: in-process map, used when browser storage is missing
//!   and in tests

use crate::config::{ANALYTICS_TTL_MIN, BRANCH_LIST_TTL_MIN, COLLEGE_LIST_TTL_MIN};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::HashMap;
use thiserror::Error;

const MS_PER_MINUTE: f64 = 60_000.0;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to serialize cache payload: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("storage rejected write for '{key}'")]
    Write { key: String },
    #[error("storage rejected removal of '{key}'")]
    Remove { key: String },
}

/// Cached datasets with their storage key and lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    BranchList,
    ComparisonColleges,
    CalculatorColleges,
    DirectoryColleges,
    AnalyticsSummary,
}

impl Dataset {
    pub fn key(self) -> &'static str {
        match self {
            Self::BranchList => "branchComparisonBranchesData",
            Self::ComparisonColleges => "branchComparisonCollegesData",
            Self::CalculatorColleges => "calculatorCollegesData",
            Self::DirectoryColleges => "mapCollegesData",
            Self::AnalyticsSummary => "analyticsData",
        }
    }

    pub fn ttl_minutes(self) -> f64 {
        match self {
            Self::BranchList => BRANCH_LIST_TTL_MIN,
            Self::ComparisonColleges | Self::CalculatorColleges | Self::DirectoryColleges => {
                COLLEGE_LIST_TTL_MIN
            }
            Self::AnalyticsSummary => ANALYTICS_TTL_MIN,
        }
    }
}

/// True while an entry written at `written_at_ms` is younger than `ttl_minutes`.
pub fn is_fresh(written_at_ms: f64, ttl_minutes: f64, now_ms: f64) -> bool {
    (now_ms - written_at_ms) / MS_PER_MINUTE < ttl_minutes
}

fn timestamp_key(key: &str) -> String {
    format!("{key}Timestamp")
}

/// Minimal string key-value store.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), CacheError>;
    fn remove_item(&self, key: &str) -> Result<(), CacheError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    map: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.map.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.map.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.map.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), CacheError> {
        self.map.borrow_mut().remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Local,
    Session,
}

/// Wrapper over `window.localStorage` / `window.sessionStorage`.
#[derive(Debug, Clone)]
pub struct BrowserStorage {
    storage: web_sys::Storage,
}

impl BrowserStorage {
    /// `None` when the browser denies storage access (private mode, sandboxed iframe).
    pub fn open(kind: StorageKind) -> Option<Self> {
        let window = gloo_utils::window();
        let storage = match kind {
            StorageKind::Local => window.local_storage(),
            StorageKind::Session => window.session_storage(),
        };
        storage.ok().flatten().map(|storage| Self { storage })
    }
}

impl KeyValueStore for BrowserStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.storage.set_item(key, value).map_err(|_| CacheError::Write {
            key: key.to_string(),
        })
    }

    fn remove_item(&self, key: &str) -> Result<(), CacheError> {
        self.storage.remove_item(key).map_err(|_| CacheError::Remove {
            key: key.to_string(),
        })
    }
}

thread_local! {
    /// Fallback used when browser storage is unavailable. Survives component
    /// re-renders but not page reloads.
    static FALLBACK_STORE: MemoryStore = MemoryStore::new();
}

/// Either backing store; chosen once per page.
pub enum AnyStore {
    Browser(BrowserStorage),
    Fallback,
}

impl KeyValueStore for AnyStore {
    fn get_item(&self, key: &str) -> Option<String> {
        match self {
            Self::Browser(s) => s.get_item(key),
            Self::Fallback => FALLBACK_STORE.with(|s| s.get_item(key)),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), CacheError> {
        match self {
            Self::Browser(s) => s.set_item(key, value),
            Self::Fallback => FALLBACK_STORE.with(|s| s.set_item(key, value)),
        }
    }

    fn remove_item(&self, key: &str) -> Result<(), CacheError> {
        match self {
            Self::Browser(s) => s.remove_item(key),
            Self::Fallback => FALLBACK_STORE.with(|s| s.remove_item(key)),
        }
    }
}

/// JSON payload cache with per-call TTL.
pub struct TtlCache<S: KeyValueStore> {
    store: S,
}

impl TtlCache<AnyStore> {
    /// Cache over `localStorage`, or the in-memory fallback.
    pub fn local() -> Self {
        match BrowserStorage::open(StorageKind::Local) {
            Some(s) => Self::new(AnyStore::Browser(s)),
            None => {
                warn!("localStorage unavailable, caching in memory only");
                Self::new(AnyStore::Fallback)
            }
        }
    }
}

impl<S: KeyValueStore> TtlCache<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store_ref(&self) -> &S {
        &self.store
    }

    /// Cached payload for `key` if present, fresh and decodable.
    pub fn load<T: DeserializeOwned>(&self, key: &str, ttl_minutes: f64, now_ms: f64) -> Option<T> {
        let payload = self.store.get_item(key)?;
        let written = self.store.get_item(&timestamp_key(key))?;
        let written_at_ms = match written.trim().parse::<f64>() {
            Ok(ts) => ts,
            Err(_) => {
                warn!("Ignoring cache entry '{}' with bad timestamp '{}'", key, written);
                return None;
            }
        };
        if !is_fresh(written_at_ms, ttl_minutes, now_ms) {
            debug!("Cache entry '{}' expired", key);
            return None;
        }
        match serde_json::from_str(&payload) {
            Ok(value) => {
                debug!("Cache hit for '{}'", key);
                Some(value)
            }
            Err(e) => {
                warn!("Failed to parse cached '{}': {}", key, e);
                None
            }
        }
    }

    pub fn store<T: Serialize + ?Sized>(&self, key: &str, value: &T, now_ms: f64) -> Result<(), CacheError> {
        let payload = serde_json::to_string(value)?;
        self.store.set_item(key, &payload)?;
        self.store
            .set_item(&timestamp_key(key), &format!("{}", now_ms.trunc() as i64))
    }

    /// Remove the payload and its timestamp. Both removals are attempted;
    /// the first failure is returned.
    pub fn invalidate(&self, key: &str) -> Result<(), CacheError> {
        let payload = self.store.remove_item(key);
        let stamp = self.store.remove_item(&timestamp_key(key));
        payload.and(stamp)
    }

    pub fn load_dataset<T: DeserializeOwned>(&self, dataset: Dataset, now_ms: f64) -> Option<T> {
        self.load(dataset.key(), dataset.ttl_minutes(), now_ms)
    }

    pub fn invalidate_dataset(&self, dataset: Dataset) {
        debug!("Invalidating '{}'", dataset.key());
        if let Err(e) = self.invalidate(dataset.key()) {
            warn!("Failed to invalidate '{}': {}", dataset.key(), e);
        }
    }

    /// Write-through for a dataset. Failures are logged, never surfaced:
    /// a full quota must not break the page.
    pub fn store_dataset<T: Serialize + ?Sized>(&self, dataset: Dataset, value: &T, now_ms: f64) {
        if let Err(e) = self.store(dataset.key(), value, now_ms) {
            warn!("Failed to cache '{}': {}", dataset.key(), e);
        }
    }
}

/// Current time in epoch milliseconds.
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}
