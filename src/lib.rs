//! Read-only HTTP API over a Project Gutenberg book catalog, with field
//! filters and offset pagination over the `books_view` relation.

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use axum::{routing::get, Router};
use models::storage::StorageBackend;
use routes::{
    books::{book_list, test_api},
    health::health_check,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub type Backend = Arc<dyn StorageBackend + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    pub backend: Backend,
    pub public_base_url: Option<String>,
}

impl AppState {
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            public_base_url: None,
        }
    }

    pub fn with_public_base_url(mut self, url: Option<String>) -> Self {
        self.public_base_url = url;
        self
    }

    /// Scheme and authority for absolute links. `forwarded_proto` is the
    /// `X-Forwarded-Proto` value set by a TLS-terminating proxy.
    pub fn base_url(&self, host: &str, forwarded_proto: Option<&str>) -> String {
        if let Some(url) = &self.public_base_url {
            return url.clone();
        }

        let scheme = match forwarded_proto
            .and_then(|proto| proto.split(',').next())
            .map(str::trim)
        {
            Some(proto) if proto.eq_ignore_ascii_case("https") => "https",
            _ => "http",
        };

        format!("{}://{}", scheme, host)
    }
}

pub fn app(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/", get(book_list))
        .route("/testapi/", get(test_api))
        .route("/status", get(health_check))
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
