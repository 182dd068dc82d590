//! Router for the newsletter signup API

use std::sync::{Arc, RwLock};

use axum::{Json, Router, extract::State};
use chrono::Utc;
use regex::Regex;

use super::public;
use crate::api::public::ApiError;
use crate::api::state::AppState;
use crate::google::sheets::NEWSLETTER_SHEET;

type SharedState = Arc<RwLock<AppState>>;

async fn subscribe_handler(
    State(state): State<SharedState>,
    Json(form): Json<public::NewsletterForm>,
) -> Result<Json<public::NewsletterResponse>, ApiError> {
    let Some(email) = form.email.as_deref().filter(|v| !v.trim().is_empty()) else {
        return Err(ApiError::BadRequest("Email is required".to_string()));
    };

    tracing::info!("Subscription attempt for email: {}", email);

    let email_re = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    if !email_re.is_match(email) {
        return Err(ApiError::BadRequest("Invalid email format".to_string()));
    }

    let sheets = {
        let state = state.read().expect("Unable to read shared state");
        state.sheets.clone()
    };

    let row = vec![email.to_string(), Utc::now().to_rfc3339()];
    if let Err(err) = sheets.append_row(NEWSLETTER_SHEET, row).await {
        tracing::error!("Subscription error: {:#}", err);

        // Point at the sheet configuration when the range itself failed to
        // resolve; everything else gets the generic message
        let message = if format!("{:#}", err).contains("Unable to parse range") {
            "Server configuration error with the signup sheet. Please contact support."
        } else {
            "Failed to subscribe. Please try again later."
        };
        return Err(ApiError::Internal {
            message: message.to_string(),
            detail: None,
        });
    }

    tracing::info!("Successfully subscribed email: {}", email);

    Ok(Json(public::NewsletterResponse {
        success: true,
        message: "Successfully subscribed to the newsletter!".to_string(),
    }))
}

/// Create the newsletter router
pub fn router() -> Router<SharedState> {
    Router::new().route(
        "/subscribe-newsletter",
        axum::routing::post(subscribe_handler),
    )
}
