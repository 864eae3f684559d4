//! Error taxonomy for the query service

use thiserror::Error;

/// Errors surfaced by request handlers
#[derive(Error, Debug)]
pub enum ApiError {
    /// The id segment is not an integer
    #[error("Invalid id")]
    InvalidId,

    /// Valid id, no matching record
    #[error("Not found")]
    NotFound,

    /// Data access failed (store unavailable, bad SQL, poisoned lock)
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Status code the HTTP layer maps this error to
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::InvalidId => 400,
            ApiError::NotFound => 404,
            ApiError::Internal(_) => 500,
        }
    }
}

/// Result type alias for handler-facing operations
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(feature = "server")]
mod response {
    use super::ApiError;
    use axum::{
        http::StatusCode,
        response::{IntoResponse, Json, Response},
    };
    use serde::Serialize;

    #[derive(Serialize)]
    struct ErrorBody {
        error: String,
    }

    impl IntoResponse for ApiError {
        fn into_response(self) -> Response {
            if let ApiError::Internal(ref cause) = self {
                tracing::error!("Request failed: {:#}", cause);
            }

            let status = StatusCode::from_u16(self.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

            (status, Json(ErrorBody { error: self.to_string() })).into_response()
        }
    }
}
