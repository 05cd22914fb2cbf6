//! Route tree: one module per resource, documentation endpoints at the root.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use crate::app::docs;
use crate::app::services::AppServices;

pub mod auth;
pub mod users;

pub fn router(services: Arc<AppServices>) -> Router {
    Router::new()
        .nest("/auth", auth::router(services.clone()))
        .nest("/users", users::router(services))
        .route("/openapi", get(docs::openapi))
        .route("/swagger", get(docs::swagger))
}
