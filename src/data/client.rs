//! WooCommerce REST API client
//!
//! Issues authenticated GET requests against the store's API, appending the
//! consumer key/secret credential pair to the query string and decoding the
//! JSON body. No retries, rate limiting, or backoff: a failed call fails
//! the page that needed it.
//!
//! Ordering precondition: the `orders` list endpoint is assumed to return
//! pages in descending `date_created` order (newest first). The pagination
//! walker's early termination depends on this; an unsorted upstream would
//! truncate results incorrectly.

use reqwest::Client;
use serde_json::Value;

use super::Params;
use crate::config::Config;
use crate::error::Result;

/// Client for the upstream WooCommerce API
#[derive(Debug, Clone)]
pub struct WcClient {
    client: Client,
    base_url: String,
    consumer_key: String,
    consumer_secret: String,
}

impl WcClient {
    /// Creates a client for the configured store
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.clone(),
            consumer_key: config.consumer_key.clone(),
            consumer_secret: config.consumer_secret.clone(),
        }
    }

    /// Fetches `{base_url}/{endpoint}` with the given query parameters
    ///
    /// Network failures and non-2xx statuses surface as
    /// [`Error::Transport`](crate::error::Error::Transport); a body that
    /// is not JSON as [`Error::Json`](crate::error::Error::Json).
    pub async fn fetch(&self, endpoint: &str, params: &Params) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let mut query: Vec<(&str, &str)> = params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        query.push(("consumer_key", &self.consumer_key));
        query.push(("consumer_secret", &self.consumer_secret));

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await?
            .error_for_status()?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}
