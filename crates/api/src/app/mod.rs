//! HTTP application wiring (router + shared service layers).
//!
//! Layout:
//! - `services.rs`: store/cache/registry/token wiring
//! - `routes/`: handlers, one file per resource
//! - `response.rs` / `errors.rs`: the envelope wire contract
//! - `pagination.rs` / `sort.rs`: query parameter helpers
//! - `docs.rs`: route metadata + OpenAPI/Swagger endpoints

use std::sync::Arc;
use std::time::Duration;

use axum::extract::Extension;
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::cors::CorsLayer;

pub mod docs;
pub mod errors;
pub mod pagination;
pub mod response;
pub mod routes;
pub mod services;
pub mod sort;

use errors::ApiError;
use services::AppServices;

/// Build the full router (public entrypoint used by `main.rs` and the
/// black-box tests).
pub fn build_app(services: Arc<AppServices>, cors_origin: &str) -> Router {
    routes::router(services.clone())
        .fallback(not_found)
        .layer(Extension(services))
        .layer(cors_layer(cors_origin))
}

/// Unmatched routes get the same envelope as every other failure.
async fn not_found() -> ApiError {
    ApiError::NotFound("Not Found".to_string())
}

fn cors_layer(origin: &str) -> CorsLayer {
    let origin = origin.parse::<HeaderValue>().unwrap_or_else(|_| {
        tracing::warn!(origin, "invalid CORS_ORIGIN; falling back to dev UI origin");
        HeaderValue::from_static("http://localhost:5173")
    });

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(600))
}
