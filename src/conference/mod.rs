//! Conferencing link capability, selected by configuration.
//!
//! Two providers exist: hosted links minted by the calendar backend
//! (Google Meet) and self-hosted meeting room links generated locally.
//! The booking flow never branches on which one is active; it asks the
//! provider for a [`ConferenceRequest`] and hands it to the calendar
//! client.

use uuid::Uuid;

#[derive(Clone, Debug)]
pub enum ConferenceProvider {
    /// Ask the calendar backend to mint a hosted video call link
    GoogleMeet,
    /// Generate a room link under our own meeting server
    MeetingRoom { base_url: String },
}

/// What the calendar client should do about conferencing for one event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConferenceRequest {
    /// Request a hosted link as part of event creation
    Hosted,
    /// Attach a pre-generated link to the event
    Link(String),
    /// No conferencing for this event
    Disabled,
}

impl ConferenceProvider {
    /// Produce the conferencing request for a new event.
    pub fn request(&self) -> ConferenceRequest {
        match self {
            Self::GoogleMeet => ConferenceRequest::Hosted,
            Self::MeetingRoom { base_url } => {
                let room = Uuid::new_v4();
                ConferenceRequest::Link(format!("{}/{}", base_url.trim_end_matches('/'), room))
            }
        }
    }
}
