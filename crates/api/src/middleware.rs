//! Authorization middleware: bearer extraction, token verification, and the
//! light/strict identity modes.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request};
use axum::middleware::Next;
use axum::response::Response;

use dashbore_auth::check_permissions;

use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::Identity;

/// How a protected route resolves the caller's identity.
#[derive(Clone)]
pub enum AuthMode {
    /// Trust the verified token claims; no database lookup, no permission
    /// check.
    Light,
    /// Load the full user (roles→permissions eager) and, when `required` is
    /// non-empty, demand the wildcard or at least one listed permission.
    Strict { required: Vec<String> },
}

#[derive(Clone)]
pub struct AuthState {
    pub services: Arc<AppServices>,
    pub mode: AuthMode,
}

impl AuthState {
    pub fn light(services: Arc<AppServices>) -> Self {
        Self {
            services,
            mode: AuthMode::Light,
        }
    }

    pub fn strict(services: Arc<AppServices>, required: &[&str]) -> Self {
        Self {
            services,
            mode: AuthMode::Strict {
                required: required.iter().map(|p| p.to_string()).collect(),
            },
        }
    }
}

/// Gate for protected routes. On success the resolved [`Identity`] is
/// attached to request extensions for downstream handlers.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(req.headers())?;
    let claims = state.services.tokens.verify(token)?;

    let identity = match &state.mode {
        AuthMode::Light => Identity::Light(claims),
        AuthMode::Strict { required } => {
            let user = state
                .services
                .fetch_full_user(claims.id)
                .await?
                .ok_or_else(|| ApiError::unauthorized("Unauthorized due to invalid token."))?;

            if !required.is_empty() && !check_permissions(&user.permissions, required) {
                return Err(ApiError::unauthorized(
                    "Unauthorized due to missing permissions.",
                ));
            }

            Identity::Full(user)
        }
    };

    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, ApiError> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| ApiError::unauthorized("Unauthorized due to missing authorization header."))?;

    let header = header.to_str().map_err(|_| {
        ApiError::unauthorized("Unauthorized due to invalid authorization header. Expected `Bearer <token>`.")
    })?;

    let Some((_scheme, token)) = header.split_once(' ') else {
        return Err(ApiError::unauthorized(
            "Unauthorized due to invalid authorization header. Expected `Bearer <token>`.",
        ));
    };

    let token = token.trim();
    if token.is_empty() {
        return Err(ApiError::unauthorized("Unauthorized due to missing token."));
    }

    Ok(token)
}
