//! Request memoizer fusing the cache store and the upstream client
//!
//! Every upstream call — orders, customers, products, variations alike —
//! flows through [`ApiCache::request`], so caching is uniform across entity
//! types. Concurrent misses for the same fingerprint each fetch upstream
//! and overwrite the same entry; there is no single-flight deduplication,
//! which is acceptable at this traffic volume.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::{Params, WcClient};
use crate::cache::{fingerprint, CacheStore};
use crate::error::Result;

/// Cached view of the upstream API
#[derive(Debug, Clone)]
pub struct ApiCache {
    client: WcClient,
    store: Arc<CacheStore>,
}

impl ApiCache {
    /// Creates a memoizer over the given client and store
    pub fn new(client: WcClient, store: Arc<CacheStore>) -> Self {
        Self { client, store }
    }

    /// Returns the response for `endpoint` + `params`, fetching upstream
    /// only when the cache has no fresh entry
    pub async fn request(&self, endpoint: &str, params: &Params) -> Result<Value> {
        let fp = fingerprint(endpoint, params);

        if let Some(payload) = self.store.get(&fp)? {
            debug!(endpoint, "cache hit");
            return Ok(payload);
        }

        debug!(endpoint, "cache miss, fetching upstream");
        let payload = self.client.fetch(endpoint, params).await?;
        self.store.put(&fp, &payload)?;
        Ok(payload)
    }
}
