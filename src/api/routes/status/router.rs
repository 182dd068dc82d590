//! Router for the connectivity probe API. The front end calls this to
//! verify the API is reachable and CORS is wired up.

use std::sync::{Arc, RwLock};

use axum::{Json, Router, body::Bytes};
use chrono::Utc;
use http::{HeaderMap, header};

use super::public;
use crate::api::state::AppState;

type SharedState = Arc<RwLock<AppState>>;

fn request_origin(headers: &HeaderMap) -> String {
    headers
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("Unknown origin")
        .to_string()
}

async fn status_handler(headers: HeaderMap) -> Json<public::StatusResponse> {
    Json(public::StatusResponse {
        success: true,
        message: "API is working correctly!".to_string(),
        data: public::StatusData {
            service: "formrelay".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now().to_rfc3339(),
            origin: request_origin(&headers),
            cors: Some(
                "If you can see this from the site origin, CORS is configured correctly!"
                    .to_string(),
            ),
            received_data: None,
        },
    })
}

async fn status_post_handler(headers: HeaderMap, body: Bytes) -> Json<public::StatusResponse> {
    let received_data = serde_json::from_slice(&body).ok();

    Json(public::StatusResponse {
        success: true,
        message: "POST request received successfully!".to_string(),
        data: public::StatusData {
            service: "formrelay".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now().to_rfc3339(),
            origin: request_origin(&headers),
            cors: None,
            received_data,
        },
    })
}

/// Create the status router
pub fn router() -> Router<SharedState> {
    Router::new().route(
        "/test",
        axum::routing::get(status_handler).post(status_post_handler),
    )
}
