//! Order pagination and enrichment
//!
//! `walk_orders` iterates the upstream `orders` endpoint page by page,
//! keeping records strictly newer than the business cutoff date and
//! stopping as soon as the date boundary is crossed. The enrichment
//! functions then join each order with its customer, product, and
//! variation detail through the memoizer, tolerating missing subresources
//! by leaving the corresponding field unset.

use serde::de::DeserializeOwned;
use serde_json::Value;
use chrono::NaiveDate;

use super::{
    ApiCache, Customer, CustomerInfo, EnrichedLineItem, EnrichedOrder, Order, Params, Product,
    ProductOrderRow, Variation,
};
use crate::error::Result;

/// Walks the paginated `orders` endpoint, collecting qualifying orders
///
/// Pages are requested with `per_page` records starting at page 1. An
/// empty page halts the walk. Each page is filtered to orders with
/// `date_created` strictly after `cutoff` that also satisfy `keep`; the
/// walk stops after a page whose last record is dated at or before the
/// cutoff.
///
/// Relies on upstream returning pages newest-first: the last record on a
/// page is its oldest, so crossing the cutoff there means no later page
/// can qualify.
pub async fn walk_orders<F>(
    api: &ApiCache,
    base_params: &Params,
    per_page: u32,
    cutoff: NaiveDate,
    mut keep: F,
) -> Result<Vec<Order>>
where
    F: FnMut(&Order) -> bool,
{
    let mut results = Vec::new();
    let mut page: u32 = 1;

    loop {
        let mut params = base_params.clone();
        params.insert("per_page".to_string(), per_page.to_string());
        params.insert("page".to_string(), page.to_string());

        let payload = api.request("orders", &params).await?;
        let orders: Vec<Order> = serde_json::from_value(payload)?;

        // The page's oldest record decides whether to keep walking; an
        // empty page ends the walk outright.
        let Some(last) = orders.last() else {
            break;
        };
        let last_date = last.created_date()?;

        for order in orders {
            if order.created_date()? > cutoff && keep(&order) {
                results.push(order);
            }
        }

        if last_date <= cutoff {
            break;
        }
        page += 1;
    }

    Ok(results)
}

/// Fetches a single subresource, treating empty or undecodable bodies as
/// absent
///
/// Hard transport errors still propagate; only a 2xx response that is an
/// empty object or does not match the expected record shape resolves to
/// `None`, so one missing customer or product never aborts a page.
pub async fn lookup<T: DeserializeOwned>(api: &ApiCache, endpoint: &str) -> Result<Option<T>> {
    let payload = api.request(endpoint, &Params::new()).await?;
    if !is_populated(&payload) {
        return Ok(None);
    }
    Ok(serde_json::from_value(payload).ok())
}

fn is_populated(payload: &Value) -> bool {
    match payload.as_object() {
        Some(obj) => !obj.is_empty(),
        None => false,
    }
}

/// Resolves an order's customer identity
///
/// Billing fields are the baseline; a nonzero `customer_id` whose lookup
/// returns a populated record overrides both name and email. An empty or
/// missing customer record leaves the billing-derived identity in place.
pub async fn resolve_customer(api: &ApiCache, order: &Order) -> Result<CustomerInfo> {
    let mut info = CustomerInfo::from_billing(&order.billing);

    if order.customer_id != 0 {
        let endpoint = format!("customers/{}", order.customer_id);
        if let Some(customer) = lookup::<Customer>(api, &endpoint).await? {
            info = CustomerInfo::from_customer(&customer);
        }
    }

    Ok(info)
}

/// Joins an order with its customer, product, and variation detail
pub async fn enrich_order(api: &ApiCache, order: Order) -> Result<EnrichedOrder> {
    let customer = resolve_customer(api, &order).await?;

    let mut line_items = Vec::with_capacity(order.line_items.len());
    for item in &order.line_items {
        let mut product = None;
        let mut variant = None;

        if item.product_id != 0 {
            product = lookup::<Product>(api, &format!("products/{}", item.product_id)).await?;

            if item.variation_id != 0 {
                let endpoint =
                    format!("products/{}/variations/{}", item.product_id, item.variation_id);
                variant = lookup::<Variation>(api, &endpoint).await?;
            }
        }

        line_items.push(EnrichedLineItem {
            name: item.name.clone(),
            product_id: item.product_id,
            variation_id: item.variation_id,
            quantity: item.quantity,
            product,
            variant,
        });
    }

    Ok(EnrichedOrder {
        id: order.id,
        status: order.status,
        date_created: order.date_created,
        customer,
        line_items,
    })
}

/// Collects the orders containing a given product, shaped for the
/// product-scoped listing
///
/// Each row carries the matched line item's quantity and, when the item is
/// a variation, a human-readable description of its attribute options.
pub async fn product_orders(
    api: &ApiCache,
    product_id: u64,
    per_page: u32,
    cutoff: NaiveDate,
) -> Result<Vec<ProductOrderRow>> {
    let orders = walk_orders(api, &Params::new(), per_page, cutoff, |order| {
        order.line_items.iter().any(|i| i.product_id == product_id)
    })
    .await?;

    let mut rows = Vec::with_capacity(orders.len());
    for order in orders {
        let customer = resolve_customer(api, &order).await?;

        let line_item = order.line_items.iter().find(|i| i.product_id == product_id);
        let mut quantity = 0;
        let mut variant = None;
        if let Some(item) = line_item {
            quantity = item.quantity;
            if item.variation_id != 0 {
                let endpoint = format!("products/{product_id}/variations/{}", item.variation_id);
                variant = lookup::<Variation>(api, &endpoint)
                    .await?
                    .map(|v| v.description());
            }
        }

        rows.push(ProductOrderRow {
            id: order.id,
            customer,
            status: order.status,
            date: order.date_created,
            variant,
            quantity,
            product_id,
        });
    }

    Ok(rows)
}
