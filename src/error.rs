//! Crate-wide error type
//!
//! All hard failures bubble up to the route boundary as an [`Error`]; the
//! `IntoResponse` impl turns them into an error page. A missing customer,
//! product, or variation is not an error — those lookups resolve to `None`
//! and the affected field is simply omitted from the rendered page.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while serving a page
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Upstream HTTP call failed (network error or non-2xx status)
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response or cached payload was not the JSON we expected
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Cache directory read/write failed
    #[error("cache I/O error: {0}")]
    CacheIo(#[from] std::io::Error),

    /// An order's `date_created` could not be parsed; pagination
    /// termination depends on valid dates, so this is fatal to the walk
    #[error("invalid order date '{value}': {source}")]
    DateParse {
        value: String,
        source: chrono::ParseError,
    },

    /// Startup configuration is missing or malformed
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::Transport(_) => StatusCode::BAD_GATEWAY,
            Error::Json(_)
            | Error::CacheIo(_)
            | Error::DateParse { .. }
            | Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");
        let status = self.status_code();
        let body = format!(
            "<!DOCTYPE html><html><body><h1>{}</h1><p>{}</p></body></html>",
            status,
            crate::ui::escape(&self.to_string()),
        );
        (status, Html(body)).into_response()
    }
}
