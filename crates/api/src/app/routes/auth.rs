//! `/auth` routes: login and whoami.

use std::sync::Arc;

use axum::extract::Extension;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::errors::ApiError;
use crate::app::response;
use crate::app::services::AppServices;
use crate::context::Identity;
use crate::middleware::{auth_middleware, AuthState};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub fn router(services: Arc<AppServices>) -> Router {
    Router::new()
        .route("/login", post(login))
        .route(
            "/whoami",
            get(whoami).route_layer(from_fn_with_state(
                AuthState::strict(services, &[]),
                auth_middleware,
            )),
        )
}

/// POST /auth/login — password authentication, returns a bearer token.
async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let user = services.login(&body.email, &body.password).await?;
    let token = services.tokens.issue(&user)?;

    tracing::info!(email = %user.email, "login succeeded");
    Ok(Json(response::success(json!({ "token": token }))))
}

/// GET /auth/whoami — the identity resolved by strict auth.
async fn whoami(Extension(identity): Extension<Identity>) -> Result<Json<Value>, ApiError> {
    Ok(Json(response::success(
        json!({ "user": identity.to_json() }),
    )))
}
