//! Public API types

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde_json::json;

// Errors

pub enum ApiError {
    /// Client-side input problem; the message is safe to surface verbatim
    BadRequest(String),
    /// Server-side failure; the detail is sanitized at the collaborator
    /// boundary before it gets here
    Internal {
        message: String,
        detail: Option<String>,
    },
}

/// Convert `ApiError` into an Axum compatible response.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "success": false, "message": message })),
            )
                .into_response(),
            ApiError::Internal { message, detail } => {
                // Always log the error
                tracing::error!("{}", detail.as_deref().unwrap_or(&message));

                let body = match detail {
                    Some(detail) => json!({ "success": false, "message": message, "error": detail }),
                    None => json!({ "success": false, "message": message }),
                };
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

/// Enables using `?` on functions that return `Result<_,
/// anyhow::Error>` to turn them into `Result<_, ApiError>`
impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Internal {
            message: "Something went wrong. Please try again later.".to_string(),
            detail: Some(format!("{:#}", err.into())),
        }
    }
}

// Re-export public types from each route

pub mod booking {
    pub use crate::api::routes::booking::public::*;
}

pub mod contact {
    pub use crate::api::routes::contact::public::*;
}

pub mod newsletter {
    pub use crate::api::routes::newsletter::public::*;
}

pub mod status {
    pub use crate::api::routes::status::public::*;
}
