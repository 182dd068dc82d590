//! Router for the contact form API

use std::sync::{Arc, RwLock};

use axum::{Json, Router, extract::State};

use super::public;
use crate::api::public::ApiError;
use crate::api::state::AppState;
use crate::mailer::OutboundEmail;
use crate::templates;

type SharedState = Arc<RwLock<AppState>>;

async fn contact_handler(
    State(state): State<SharedState>,
    Json(form): Json<public::ContactForm>,
) -> Result<Json<public::ContactResponse>, ApiError> {
    let (Some(name), Some(email), Some(message)) = (
        form.name.as_deref().filter(|v| !v.trim().is_empty()),
        form.email.as_deref().filter(|v| !v.trim().is_empty()),
        form.message.as_deref().filter(|v| !v.trim().is_empty()),
    ) else {
        return Err(ApiError::BadRequest(
            "Name, email and message are required".to_string(),
        ));
    };

    let (config, mailer) = {
        let state = state.read().expect("Unable to read shared state");
        (state.config.clone(), state.mailer.clone())
    };

    let html = templates::contact_email(&templates::ContactEmail {
        name,
        email,
        phone: form.phone.as_deref().unwrap_or("Not provided"),
        message,
        org_name: &config.org_name,
        year: templates::footer_year(),
    })?;

    let outbound = OutboundEmail {
        to: config.staff_email.clone(),
        subject: form
            .subject
            .clone()
            .unwrap_or_else(|| "New Contact Form Submission".to_string()),
        html,
        text: None,
        attachments: vec![],
    };

    if let Err(err) = mailer.send(&outbound).await {
        tracing::error!("Contact form error: {:#}", err);
        return Err(ApiError::Internal {
            message: "Failed to send message. Please try again later.".to_string(),
            detail: None,
        });
    }

    Ok(Json(public::ContactResponse {
        success: true,
        message: "Your message has been sent successfully!".to_string(),
    }))
}

/// Create the contact router
pub fn router() -> Router<SharedState> {
    Router::new().route("/contact-us", axum::routing::post(contact_handler))
}
