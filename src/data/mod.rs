//! Core data models and upstream API access
//!
//! This module contains the typed records for the WooCommerce entities the
//! dashboard reads (orders, customers, products, variations), decoded once
//! at the upstream client boundary, plus the enriched view records the
//! pages render. Optional upstream fields use `#[serde(default)]` so a
//! sparse payload never fails decoding.

pub mod client;
pub mod memoizer;
pub mod orders;

pub use client::WcClient;
pub use memoizer::ApiCache;
pub use orders::{enrich_order, product_orders, resolve_customer, walk_orders};

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Query parameters for an upstream request
///
/// A `BTreeMap` so that serialization is deterministically key-ordered,
/// which the cache fingerprint relies on.
pub type Params = BTreeMap<String, String>;

/// An order as returned by the upstream `orders` endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    #[serde(default)]
    pub status: String,
    /// Upstream creation timestamp, kept verbatim for display; parsed on
    /// demand via [`Order::created_date`]
    pub date_created: String,
    #[serde(default)]
    pub billing: Billing,
    /// 0 means a guest checkout with no customer record
    #[serde(default)]
    pub customer_id: u64,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
}

impl Order {
    /// Parses the order's creation date
    ///
    /// Accepts the upstream ISO datetime (`2024-10-01T12:34:56`) or a bare
    /// date. Failure is fatal to the enclosing pagination walk, since its
    /// termination check depends on valid dates.
    pub fn created_date(&self) -> Result<NaiveDate> {
        let raw = &self.date_created;
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
            .map(|dt| dt.date())
            .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
            .map_err(|source| Error::DateParse {
                value: raw.clone(),
                source,
            })
    }
}

/// Billing block embedded in an order; the fallback source of customer
/// identity when no customer record exists
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Billing {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

/// A single line item on an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub product_id: u64,
    /// 0 means the item is not a variation
    #[serde(default)]
    pub variation_id: u64,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub total: String,
}

/// A customer record from `customers/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: u64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

/// A product record from `products/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub sku: String,
}

/// A variation record from `products/{id}/variations/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variation {
    pub id: u64,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl Variation {
    /// Human-readable variant description, e.g. "Red, Large"
    pub fn description(&self) -> String {
        self.attributes
            .iter()
            .map(|a| a.option.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// One attribute descriptor on a variation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attribute {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub option: String,
}

/// Resolved customer identity shown on order listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
}

impl CustomerInfo {
    /// Baseline identity derived from an order's billing block
    pub fn from_billing(billing: &Billing) -> Self {
        Self {
            name: full_name(&billing.first_name, &billing.last_name),
            email: billing.email.clone(),
        }
    }

    /// Identity taken from a resolved customer record
    pub fn from_customer(customer: &Customer) -> Self {
        Self {
            name: full_name(&customer.first_name, &customer.last_name),
            email: customer.email.clone(),
        }
    }
}

/// "first last" with surrounding whitespace trimmed, so a missing half
/// doesn't leave a stray space
fn full_name(first: &str, last: &str) -> String {
    format!("{first} {last}").trim().to_string()
}

/// An order joined with its resolved customer and line-item detail
#[derive(Debug, Clone)]
pub struct EnrichedOrder {
    pub id: u64,
    pub status: String,
    pub date_created: String,
    pub customer: CustomerInfo,
    pub line_items: Vec<EnrichedLineItem>,
}

/// A line item joined with full product and variation detail where found
#[derive(Debug, Clone)]
pub struct EnrichedLineItem {
    pub name: String,
    pub product_id: u64,
    pub variation_id: u64,
    pub quantity: u32,
    /// Absent when the product lookup returned nothing usable
    pub product: Option<Product>,
    /// Absent when the item has no variation or the lookup came back empty
    pub variant: Option<Variation>,
}

/// One row of the product-scoped order listing
#[derive(Debug, Clone)]
pub struct ProductOrderRow {
    pub id: u64,
    pub customer: CustomerInfo,
    pub status: String,
    pub date: String,
    /// Joined variant attribute options, when the matched item has one
    pub variant: Option<String>,
    pub quantity: u32,
    pub product_id: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_with_date(date_created: &str) -> Order {
        Order {
            id: 1,
            status: "processing".to_string(),
            date_created: date_created.to_string(),
            billing: Billing::default(),
            customer_id: 0,
            line_items: Vec::new(),
        }
    }

    #[test]
    fn test_created_date_parses_iso_datetime() {
        let order = order_with_date("2024-10-01T12:34:56");
        assert_eq!(
            order.created_date().unwrap(),
            NaiveDate::from_ymd_opt(2024, 10, 1).unwrap()
        );
    }

    #[test]
    fn test_created_date_parses_bare_date() {
        let order = order_with_date("2024-09-22");
        assert_eq!(
            order.created_date().unwrap(),
            NaiveDate::from_ymd_opt(2024, 9, 22).unwrap()
        );
    }

    #[test]
    fn test_created_date_rejects_garbage() {
        let order = order_with_date("not a date");
        let err = order.created_date().unwrap_err();
        assert!(err.to_string().contains("not a date"));
    }

    #[test]
    fn test_variant_description_joins_options() {
        let variation = Variation {
            id: 7,
            price: String::new(),
            sku: String::new(),
            attributes: vec![
                Attribute {
                    name: "Color".to_string(),
                    option: "Red".to_string(),
                },
                Attribute {
                    name: "Size".to_string(),
                    option: "Large".to_string(),
                },
            ],
        };
        assert_eq!(variation.description(), "Red, Large");
    }

    #[test]
    fn test_variant_description_empty_attributes() {
        let variation = Variation {
            id: 7,
            price: String::new(),
            sku: String::new(),
            attributes: Vec::new(),
        };
        assert_eq!(variation.description(), "");
    }

    #[test]
    fn test_customer_info_from_billing_trims_missing_halves() {
        let billing = Billing {
            first_name: "Ada".to_string(),
            last_name: String::new(),
            email: "ada@example.com".to_string(),
        };
        let info = CustomerInfo::from_billing(&billing);
        assert_eq!(info.name, "Ada");
        assert_eq!(info.email, "ada@example.com");
    }

    #[test]
    fn test_order_decodes_with_sparse_payload() {
        let order: Order = serde_json::from_value(serde_json::json!({
            "id": 9,
            "date_created": "2024-10-02T08:00:00"
        }))
        .unwrap();
        assert_eq!(order.customer_id, 0);
        assert!(order.line_items.is_empty());
        assert_eq!(order.billing.email, "");
    }
}
