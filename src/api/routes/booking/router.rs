//! Router for the meeting booking API

use std::sync::{Arc, RwLock};

use axum::{Json, Router, extract::State};

use super::public;
use crate::api::public::ApiError;
use crate::api::state::AppState;
use crate::booking::{self, BookingError, BookingForm};

type SharedState = Arc<RwLock<AppState>>;

async fn book_meeting_handler(
    State(state): State<SharedState>,
    Json(form): Json<BookingForm>,
) -> Result<Json<public::BookingResponse>, ApiError> {
    let (config, calendar, sheets, mailer) = {
        let state = state.read().expect("Unable to read shared state");
        (
            state.config.clone(),
            state.calendar.clone(),
            state.sheets.clone(),
            state.mailer.clone(),
        )
    };

    match booking::book_meeting(
        &config,
        calendar.as_ref(),
        sheets.as_ref(),
        mailer.as_ref(),
        &form,
    )
    .await
    {
        Ok(outcome) => Ok(Json(public::BookingResponse {
            success: true,
            message: "Meeting booked successfully!".to_string(),
            data: public::BookingData {
                meeting_id: outcome.meeting_id,
                meet_link: outcome.meet_link,
                calendar_event_link: outcome.calendar_event_link,
                note: outcome.note,
            },
        })),
        Err(BookingError::Validation(message)) => Err(ApiError::BadRequest(message)),
        Err(BookingError::Provider(err)) => Err(ApiError::Internal {
            message: "Failed to book meeting. Please try again later.".to_string(),
            detail: Some(format!("{:#}", err)),
        }),
    }
}

/// Create the booking router
pub fn router() -> Router<SharedState> {
    Router::new().route("/book-meeting", axum::routing::post(book_meeting_handler))
}
