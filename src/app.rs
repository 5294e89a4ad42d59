//! HTTP routes and shared application state
//!
//! Thin layer mapping URL paths onto the data-fetching operations: every
//! handler walks/looks up through the shared [`ApiCache`] and hands the
//! result to a `ui` renderer. Hard errors bubble out as
//! [`Error`](crate::error::Error) and render as an error page.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header::REFERER;
use axum::http::HeaderMap;
use axum::response::{Html, Redirect};
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::cache::CacheStore;
use crate::config::Config;
use crate::data::{
    enrich_order, product_orders, walk_orders, ApiCache, Customer, EnrichedOrder, Params, Product,
};
use crate::error::Result;
use crate::ui;

/// Shared state handed to every route handler
#[derive(Clone)]
pub struct AppState {
    pub api: ApiCache,
    pub store: Arc<CacheStore>,
    pub config: Config,
}

impl AppState {
    pub fn new(api: ApiCache, store: Arc<CacheStore>, config: Config) -> Self {
        Self { api, store, config }
    }
}

/// Builds the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/orders", get(orders))
        .route("/processing_orders", get(processing_orders))
        .route("/customers", get(customers))
        .route("/product/:id", get(product))
        .route("/clear_cache", get(clear_cache))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Redirect {
    Redirect::to("/orders")
}

async fn orders(State(state): State<AppState>) -> Result<Html<String>> {
    let page = orders_listing(&state, "Orders", Params::new(), false).await?;
    Ok(Html(page))
}

async fn processing_orders(State(state): State<AppState>) -> Result<Html<String>> {
    let mut base = Params::new();
    base.insert("status".to_string(), "processing".to_string());
    let page = orders_listing(&state, "Unfilled Orders", base, true).await?;
    Ok(Html(page))
}

/// Shared body of the two order listings: walk, enrich, render
async fn orders_listing(
    state: &AppState,
    title: &str,
    base_params: Params,
    show_all_orders_link: bool,
) -> Result<String> {
    let raw = walk_orders(
        &state.api,
        &base_params,
        state.config.orders_page_size,
        state.config.cutoff_date,
        |_| true,
    )
    .await?;

    let mut enriched: Vec<EnrichedOrder> = Vec::with_capacity(raw.len());
    for order in raw {
        enriched.push(enrich_order(&state.api, order).await?);
    }

    let last_updated = state.store.last_updated();
    Ok(ui::render_orders(
        title,
        &enriched,
        last_updated.as_deref(),
        show_all_orders_link,
    ))
}

async fn customers(State(state): State<AppState>) -> Result<Html<String>> {
    let mut params = Params::new();
    params.insert(
        "per_page".to_string(),
        state.config.customers_page_size.to_string(),
    );
    let payload = state.api.request("customers", &params).await?;
    let customers: Vec<Customer> = serde_json::from_value(payload)?;
    Ok(Html(ui::render_customers(&customers)))
}

async fn product(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Html<String>> {
    let product: Option<Product> =
        crate::data::orders::lookup(&state.api, &format!("products/{id}")).await?;
    let product_name = product
        .map(|p| p.name)
        .unwrap_or_else(|| format!("product {id}"));

    let rows = product_orders(
        &state.api,
        id,
        state.config.orders_page_size,
        state.config.cutoff_date,
    )
    .await?;

    Ok(Html(ui::render_product_orders(&product_name, &rows)))
}

/// Wipes the cache store and bounces back to the referring page
async fn clear_cache(State(state): State<AppState>, headers: HeaderMap) -> Result<Redirect> {
    state.store.clear()?;
    info!("cache cleared");

    let back = headers
        .get(REFERER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("/orders");
    Ok(Redirect::to(back))
}
