//! Per-browser persistent key-value storage.
//!
//! Each browser is identified by a random id carried in the `resumatch_browser`
//! cookie and owns an isolated partition. Components only ever see the
//! [`KeyValueStore`] trait, so tests can hand them a bare [`MemoryStore`].

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use axum::{
    extract::Request,
    http::{header::SET_COOKIE, HeaderValue},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

/// Stored credential (bearer token).
pub const TOKEN_KEY: &str = "token";
/// Uploaded resume as a data URL.
pub const RESUME_KEY: &str = "resumePdf";
/// Snapshot of the last successful fit-score fetch.
pub const FIT_SCORE_KEY: &str = "fitScoreData";

pub const BROWSER_COOKIE: &str = "resumatch_browser";

/// Matches the usual browser localStorage allowance.
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage quota exceeded: {requested} bytes requested, {available} available")]
    QuotaExceeded { requested: usize, available: usize },
}

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String) -> Result<(), StorageError>;
    fn remove(&self, key: &str);
}

/// In-memory store with a byte quota over keys + values. Last write wins.
#[derive(Debug)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
    quota_bytes: usize,
}

impl MemoryStore {
    pub fn new(quota_bytes: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            quota_bytes,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_QUOTA_BYTES)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());

        let used: usize = entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum();
        let requested = key.len() + value.len();
        let available = self.quota_bytes.saturating_sub(used);
        if requested > available {
            return Err(StorageError::QuotaExceeded {
                requested,
                available,
            });
        }

        entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
    }
}

/// Opaque identifier of one browser, inserted into request extensions by
/// [`assign_browser_id`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BrowserId(pub Uuid);

/// Owns every browser's partition.
pub struct BrowserStorage {
    partitions: RwLock<HashMap<BrowserId, Arc<MemoryStore>>>,
    quota_bytes: usize,
}

impl BrowserStorage {
    pub fn new(quota_bytes: usize) -> Self {
        Self {
            partitions: RwLock::new(HashMap::new()),
            quota_bytes,
        }
    }

    /// View of the partition for `id`. Reads never allocate; the partition is
    /// created by the first write.
    pub fn scope(&self, id: BrowserId) -> Partition<'_> {
        Partition { storage: self, id }
    }

    fn existing(&self, id: BrowserId) -> Option<Arc<MemoryStore>> {
        self.partitions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&id)
            .cloned()
    }

    fn get_or_create(&self, id: BrowserId) -> Arc<MemoryStore> {
        if let Some(store) = self.existing(id) {
            return store;
        }
        let mut partitions = self.partitions.write().unwrap_or_else(|e| e.into_inner());
        partitions
            .entry(id)
            .or_insert_with(|| {
                debug!(browser = %id.0, "creating storage partition");
                Arc::new(MemoryStore::new(self.quota_bytes))
            })
            .clone()
    }

    #[cfg(test)]
    pub fn partition_count(&self) -> usize {
        self.partitions.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}

/// One browser's slice of [`BrowserStorage`]. A browser that never wrote
/// anything reads as empty.
pub struct Partition<'a> {
    storage: &'a BrowserStorage,
    id: BrowserId,
}

impl KeyValueStore for Partition<'_> {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.existing(self.id)?.get(key)
    }

    fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.storage.get_or_create(self.id).set(key, value)
    }

    fn remove(&self, key: &str) {
        if let Some(store) = self.storage.existing(self.id) {
            store.remove(key);
        }
    }
}

impl Default for BrowserStorage {
    fn default() -> Self {
        Self::new(DEFAULT_QUOTA_BYTES)
    }
}

/// Middleware: resolves the browser id cookie (issuing a fresh one when absent
/// or unparsable) and exposes it to handlers as an `Extension<BrowserId>`.
pub async fn assign_browser_id(mut request: Request, next: Next) -> Response {
    let jar = CookieJar::from_headers(request.headers());
    let existing = jar
        .get(BROWSER_COOKIE)
        .and_then(|c| Uuid::parse_str(c.value()).ok());

    let (id, issued) = match existing {
        Some(id) => (BrowserId(id), false),
        None => (BrowserId(Uuid::new_v4()), true),
    };
    request.extensions_mut().insert(id);

    let mut response = next.run(request).await;

    if issued {
        let cookie = Cookie::build((BROWSER_COOKIE, id.0.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build();
        match HeaderValue::from_str(&cookie.to_string()) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => warn!("could not encode browser cookie: {e}"),
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get_returns_value() {
        let store = MemoryStore::default();
        store.set(TOKEN_KEY, "abc".to_string()).unwrap();
        assert_eq!(store.get(TOKEN_KEY).as_deref(), Some("abc"));
    }

    #[test]
    fn test_set_overwrites_last_write_wins() {
        let store = MemoryStore::default();
        store.set(FIT_SCORE_KEY, "old".to_string()).unwrap();
        store.set(FIT_SCORE_KEY, "new".to_string()).unwrap();
        assert_eq!(store.get(FIT_SCORE_KEY).as_deref(), Some("new"));
    }

    #[test]
    fn test_remove_clears_key() {
        let store = MemoryStore::default();
        store.set(TOKEN_KEY, "abc".to_string()).unwrap();
        store.remove(TOKEN_KEY);
        assert!(store.get(TOKEN_KEY).is_none());
    }

    #[test]
    fn test_quota_rejects_oversized_value() {
        let store = MemoryStore::new(16);
        let err = store.set("k", "x".repeat(64)).unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { .. }));
        assert!(store.get("k").is_none());
    }

    #[test]
    fn test_quota_ignores_value_being_replaced() {
        let store = MemoryStore::new(10);
        store.set("k", "12345678".to_string()).unwrap();
        // 9 bytes fit once the old 9-byte entry is discounted
        store.set("k", "abcdefgh".to_string()).unwrap();
        assert_eq!(store.get("k").as_deref(), Some("abcdefgh"));
    }

    #[test]
    fn test_browser_partitions_are_isolated() {
        let storage = BrowserStorage::default();
        let a = BrowserId(Uuid::new_v4());
        let b = BrowserId(Uuid::new_v4());

        storage.scope(a).set(TOKEN_KEY, "token-a".to_string()).unwrap();

        assert_eq!(storage.scope(a).get(TOKEN_KEY).as_deref(), Some("token-a"));
        assert!(storage.scope(b).get(TOKEN_KEY).is_none());
    }

    #[test]
    fn test_reads_and_removes_do_not_create_partitions() {
        let storage = BrowserStorage::default();
        let id = BrowserId(Uuid::new_v4());

        assert!(storage.scope(id).get(TOKEN_KEY).is_none());
        storage.scope(id).remove(TOKEN_KEY);
        assert_eq!(storage.partition_count(), 0);

        storage.scope(id).set(TOKEN_KEY, "t".to_string()).unwrap();
        assert_eq!(storage.partition_count(), 1);
    }
}
