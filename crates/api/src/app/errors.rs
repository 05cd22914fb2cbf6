//! API error taxonomy and its mapping onto the response envelope.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use thiserror::Error;

use dashbore_auth::TokenError;
use dashbore_infra::{CacheError, StoreError};

use super::response;

/// Top-level request failure. Every handler and middleware error funnels
/// through this type; `IntoResponse` renders the uniform envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Rendered cause chain, exposed as `error.stack` in the envelope.
    fn stack(&self) -> String {
        match self {
            ApiError::Internal(err) => format!("{err:?}"),
            other => other.to_string(),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid(_) => ApiError::Unauthorized(err.to_string()),
            TokenError::Sign(_) => ApiError::Internal(err.into()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidSortField(field) => {
                ApiError::Validation(format!("unsupported sort field: {field}"))
            }
            StoreError::Database(_) => ApiError::Internal(err.into()),
        }
    }
}

impl From<CacheError> for ApiError {
    fn from(err: CacheError) -> Self {
        ApiError::Internal(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, status = %status, "request rejected");
        }

        let body = response::error_body(&self.to_string(), &self.stack());
        (status, Json(body)).into_response()
    }
}
