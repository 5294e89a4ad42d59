//! Environment-driven configuration
//!
//! All settings come from environment variables (optionally loaded from a
//! `.env` file in `main`). Only the WooCommerce credential pair is
//! required; everything else has a sensible default.

use std::env;
use std::path::PathBuf;

use chrono::NaiveDate;
use directories::ProjectDirs;

use crate::error::{Error, Result};

/// Default store API root, matching the deployment this dashboard fronts
const DEFAULT_BASE_URL: &str = "https://www.softcogsinc.com/wp-json/wc/v3";

/// Orders created on or before this date are never shown
const DEFAULT_CUTOFF_DATE: &str = "2024-09-22";

/// Application configuration, constructed once at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Upstream WooCommerce API base URL (no trailing slash)
    pub base_url: String,
    /// WooCommerce REST API consumer key
    pub consumer_key: String,
    /// WooCommerce REST API consumer secret
    pub consumer_secret: String,
    /// Directory for cached API responses
    pub cache_dir: PathBuf,
    /// Cache entry time-to-live in seconds; 0 means entries are permanent
    /// until `/clear_cache` is hit
    pub cache_ttl_secs: u64,
    /// Business cutoff date; only orders strictly newer are listed
    pub cutoff_date: NaiveDate,
    /// Page size for walking the orders endpoint
    pub orders_page_size: u32,
    /// Page size for the customers listing
    pub customers_page_size: u32,
    /// TCP port to serve on
    pub port: u16,
}

impl Config {
    /// Loads configuration from the environment
    ///
    /// Required: `WOOCOMMERCE_CONSUMER_KEY`, `WOOCOMMERCE_CONSUMER_SECRET`.
    /// Optional: `WC_API_BASE_URL`, `WC_CACHE_DIR`, `WC_CACHE_TTL_SECS`,
    /// `ORDERS_CUTOFF_DATE` (YYYY-MM-DD), `PORT`.
    pub fn from_env() -> Result<Self> {
        let consumer_key = require_env("WOOCOMMERCE_CONSUMER_KEY")?;
        let consumer_secret = require_env("WOOCOMMERCE_CONSUMER_SECRET")?;

        let base_url = env::var("WC_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let cache_dir = match env::var("WC_CACHE_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => default_cache_dir(),
        };

        let cache_ttl_secs = parse_env("WC_CACHE_TTL_SECS", 0)?;

        let cutoff_raw =
            env::var("ORDERS_CUTOFF_DATE").unwrap_or_else(|_| DEFAULT_CUTOFF_DATE.to_string());
        let cutoff_date = NaiveDate::parse_from_str(&cutoff_raw, "%Y-%m-%d").map_err(|e| {
            Error::Config(format!("invalid ORDERS_CUTOFF_DATE '{cutoff_raw}': {e}"))
        })?;

        let port = parse_env("PORT", 4567)?;

        Ok(Self {
            base_url,
            consumer_key,
            consumer_secret,
            cache_dir,
            cache_ttl_secs,
            cutoff_date,
            orders_page_size: 100,
            customers_page_size: 20,
            port,
        })
    }
}

fn require_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("{name} must be set")))
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("invalid {name} '{raw}': {e}"))),
        Err(_) => Ok(default),
    }
}

/// XDG cache directory for the app, falling back to the system temp dir
fn default_cache_dir() -> PathBuf {
    match ProjectDirs::from("", "", "orderdeck") {
        Some(dirs) => dirs.cache_dir().to_path_buf(),
        None => env::temp_dir().join("wc_api_cache"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cutoff_date_parses() {
        let date = NaiveDate::parse_from_str(DEFAULT_CUTOFF_DATE, "%Y-%m-%d").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 9, 22).unwrap());
    }

    #[test]
    fn test_default_cache_dir_is_not_empty() {
        let dir = default_cache_dir();
        assert!(!dir.as_os_str().is_empty());
    }
}
