//! Public types for the booking API
use serde::Serialize;

pub use crate::booking::BookingForm;

#[derive(Serialize)]
pub struct BookingResponse {
    pub success: bool,
    pub message: String,
    pub data: BookingData,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingData {
    pub meeting_id: String,
    pub meet_link: Option<String>,
    pub calendar_event_link: String,
    pub note: String,
}
