//! Orderdeck library
//!
//! Exposes the cache, data, and routing modules for use in integration
//! tests and the server binary.

pub mod app;
pub mod cache;
pub mod config;
pub mod data;
pub mod error;
pub mod ui;
