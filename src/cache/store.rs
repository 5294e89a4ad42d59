//! Filesystem store for upstream API responses
//!
//! Provides a `CacheStore` that maps a deterministic request fingerprint to
//! a raw JSON payload, one file per fingerprint. Entries are valid forever
//! or for a configured TTL depending on the store's freshness policy, and
//! the whole store can be wiped at once from the `/clear_cache` route.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::data::Params;
use crate::error::Result;

/// Name of the marker file recording the most recent cache write or clear
const LAST_UPDATED_FILE: &str = "last_updated.txt";

/// Derives the cache fingerprint for a request
///
/// The fingerprint is a pure function of the endpoint and its parameters:
/// a hex SHA-256 over the endpoint path and the canonical (key-ordered)
/// JSON serialization of the parameter map. Identical logical requests
/// always map to the same storage key.
pub fn fingerprint(endpoint: &str, params: &Params) -> String {
    // BTreeMap serializes in key order, so the digest input is canonical.
    let serialized = serde_json::to_string(params).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(endpoint.as_bytes());
    hasher.update(b":");
    hasher.update(serialized.as_bytes());
    hex::encode(hasher.finalize())
}

/// Rule deciding whether a cached entry is still valid
#[derive(Debug, Clone, Copy)]
pub enum FreshnessPolicy {
    /// Entries are valid until the store is cleared
    Permanent,
    /// Entries are valid while `now - stored_at < ttl`
    Ttl(Duration),
}

impl FreshnessPolicy {
    /// Builds a policy from a TTL in seconds, 0 meaning permanent
    pub fn from_ttl_secs(secs: u64) -> Self {
        if secs == 0 {
            FreshnessPolicy::Permanent
        } else {
            FreshnessPolicy::Ttl(Duration::seconds(secs as i64))
        }
    }

    fn is_fresh(&self, stored_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            FreshnessPolicy::Permanent => true,
            FreshnessPolicy::Ttl(ttl) => now - stored_at < *ttl,
        }
    }
}

/// On-disk wrapper for a cached payload
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    /// When the payload was stored
    stored_at: DateTime<Utc>,
    /// The raw upstream JSON
    payload: Value,
}

/// Fingerprint-addressed store of upstream JSON responses
///
/// Stores each entry as `<fingerprint>.json` inside a dedicated cache
/// directory. Reads of an entry mid-overwrite see either the old or the
/// new payload, never a partial one: writes go to a temp file and are
/// renamed into place, and all file operations share one lock.
#[derive(Debug)]
pub struct CacheStore {
    /// Directory where cache files are stored
    cache_dir: PathBuf,
    /// Freshness policy applied to every entry on read
    policy: FreshnessPolicy,
    /// Guards cache-file reads and writes against interleaving
    lock: Mutex<()>,
}

impl CacheStore {
    /// Creates a store rooted at `cache_dir`, ensuring the directory exists
    pub fn new(cache_dir: PathBuf, policy: FreshnessPolicy) -> Result<Self> {
        fs::create_dir_all(&cache_dir)?;
        Ok(Self {
            cache_dir,
            policy,
            lock: Mutex::new(()),
        })
    }

    /// Returns the path to the cache file for the given fingerprint
    fn entry_path(&self, fingerprint: &str) -> PathBuf {
        self.cache_dir.join(format!("{fingerprint}.json"))
    }

    fn marker_path(&self) -> PathBuf {
        self.cache_dir.join(LAST_UPDATED_FILE)
    }

    /// Looks up a fingerprint, returning the payload if present and fresh
    ///
    /// A missing file or a stale entry yields `Ok(None)`. I/O failures and
    /// corrupt entries propagate; there is no fall-through to a live fetch
    /// when the cache directory itself is broken.
    pub fn get(&self, fingerprint: &str) -> Result<Option<Value>> {
        let _guard = self.lock.lock();
        let path = self.entry_path(fingerprint);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let entry: CacheEntry = serde_json::from_str(&content)?;
        if self.policy.is_fresh(entry.stored_at, Utc::now()) {
            Ok(Some(entry.payload))
        } else {
            Ok(None)
        }
    }

    /// Stores a payload under a fingerprint, overwriting any previous entry
    ///
    /// Also bumps the last-updated marker to the current time.
    pub fn put(&self, fingerprint: &str, payload: &Value) -> Result<()> {
        let _guard = self.lock.lock();
        let entry = CacheEntry {
            stored_at: Utc::now(),
            payload: payload.clone(),
        };
        let json = serde_json::to_string(&entry)?;
        self.write_atomic(&self.entry_path(fingerprint), &json)?;
        self.touch_marker()
    }

    /// Removes every entry and resets the last-updated marker
    pub fn clear(&self) -> Result<()> {
        let _guard = self.lock.lock();
        fs::remove_dir_all(&self.cache_dir)?;
        fs::create_dir_all(&self.cache_dir)?;
        self.touch_marker()
    }

    /// Timestamp of the most recent cache write or clear, if any
    pub fn last_updated(&self) -> Option<String> {
        fs::read_to_string(self.marker_path())
            .ok()
            .map(|s| s.trim().to_string())
    }

    /// Write-new-then-rename so concurrent readers never see partial data
    fn write_atomic(&self, path: &PathBuf, content: &str) -> Result<()> {
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    fn touch_marker(&self) -> Result<()> {
        let now = Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        Ok(fs::write(self.marker_path(), now)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread;
    use std::time::Duration as StdDuration;
    use tempfile::TempDir;

    fn create_test_store(policy: FreshnessPolicy) -> (CacheStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = CacheStore::new(temp_dir.path().to_path_buf(), policy)
            .expect("Failed to create store");
        (store, temp_dir)
    }

    fn sample_params() -> Params {
        let mut params = Params::new();
        params.insert("per_page".to_string(), "100".to_string());
        params.insert("page".to_string(), "1".to_string());
        params
    }

    #[test]
    fn test_fingerprint_is_stable_across_calls() {
        let params = sample_params();
        assert_eq!(fingerprint("orders", &params), fingerprint("orders", &params));
    }

    #[test]
    fn test_fingerprint_ignores_param_insertion_order() {
        let mut a = Params::new();
        a.insert("page".to_string(), "1".to_string());
        a.insert("per_page".to_string(), "100".to_string());

        let mut b = Params::new();
        b.insert("per_page".to_string(), "100".to_string());
        b.insert("page".to_string(), "1".to_string());

        assert_eq!(fingerprint("orders", &a), fingerprint("orders", &b));
    }

    #[test]
    fn test_fingerprint_differs_by_endpoint_and_params() {
        let params = sample_params();
        assert_ne!(
            fingerprint("orders", &params),
            fingerprint("customers", &params)
        );

        let mut other = sample_params();
        other.insert("page".to_string(), "2".to_string());
        assert_ne!(fingerprint("orders", &params), fingerprint("orders", &other));
    }

    #[test]
    fn test_put_then_get_returns_payload_unchanged() {
        let (store, _dir) = create_test_store(FreshnessPolicy::Permanent);
        let payload = json!({"id": 42, "status": "processing"});

        store.put("abc", &payload).expect("put should succeed");
        let read = store.get("abc").expect("get should succeed");

        assert_eq!(read, Some(payload));
    }

    #[test]
    fn test_get_returns_none_for_missing_fingerprint() {
        let (store, _dir) = create_test_store(FreshnessPolicy::Permanent);
        assert_eq!(store.get("missing").expect("get should succeed"), None);
    }

    #[test]
    fn test_permanent_policy_never_expires() {
        let (store, _dir) = create_test_store(FreshnessPolicy::Permanent);
        store.put("abc", &json!([1, 2, 3])).expect("put should succeed");

        thread::sleep(StdDuration::from_millis(20));

        assert!(store.get("abc").expect("get should succeed").is_some());
    }

    #[test]
    fn test_ttl_entry_is_present_before_expiry() {
        let (store, _dir) = create_test_store(FreshnessPolicy::Ttl(Duration::seconds(3600)));
        store.put("abc", &json!("fresh")).expect("put should succeed");

        assert_eq!(
            store.get("abc").expect("get should succeed"),
            Some(json!("fresh"))
        );
    }

    #[test]
    fn test_ttl_entry_is_absent_after_expiry() {
        let (store, _dir) = create_test_store(FreshnessPolicy::Ttl(Duration::milliseconds(20)));
        store.put("abc", &json!("stale")).expect("put should succeed");

        thread::sleep(StdDuration::from_millis(40));

        assert_eq!(store.get("abc").expect("get should succeed"), None);
    }

    #[test]
    fn test_put_overwrites_existing_entry() {
        let (store, _dir) = create_test_store(FreshnessPolicy::Permanent);
        store.put("abc", &json!("first")).expect("put should succeed");
        store.put("abc", &json!("second")).expect("put should succeed");

        assert_eq!(
            store.get("abc").expect("get should succeed"),
            Some(json!("second"))
        );
    }

    #[test]
    fn test_clear_empties_store_and_is_idempotent() {
        let (store, _dir) = create_test_store(FreshnessPolicy::Permanent);
        store.put("abc", &json!("data")).expect("put should succeed");

        store.clear().expect("first clear should succeed");
        assert_eq!(store.get("abc").expect("get should succeed"), None);

        store.clear().expect("second clear should succeed");
        assert_eq!(store.get("abc").expect("get should succeed"), None);
    }

    #[test]
    fn test_last_updated_is_none_for_fresh_store() {
        let (store, _dir) = create_test_store(FreshnessPolicy::Permanent);
        assert!(store.last_updated().is_none());
    }

    #[test]
    fn test_put_and_clear_update_last_updated_marker() {
        let (store, _dir) = create_test_store(FreshnessPolicy::Permanent);

        store.put("abc", &json!("data")).expect("put should succeed");
        let after_put = store.last_updated().expect("marker should exist after put");
        assert!(after_put.parse::<DateTime<Utc>>().is_ok());

        store.clear().expect("clear should succeed");
        assert!(store.last_updated().is_some());
    }

    #[test]
    fn test_new_creates_missing_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let nested = temp_dir.path().join("nested").join("cache");
        let store = CacheStore::new(nested.clone(), FreshnessPolicy::Permanent)
            .expect("Failed to create store");

        store.put("abc", &json!(1)).expect("put should succeed");
        assert!(nested.join("abc.json").exists());
    }
}
