//! Cache module for storing upstream API responses to disk
//!
//! This module provides a fingerprint-addressed store that persists raw
//! JSON responses to the filesystem with a configurable freshness policy:
//! entries are either permanent until manually cleared, or expire after a
//! configured number of seconds.

mod store;

pub use store::{fingerprint, CacheStore, FreshnessPolicy};
