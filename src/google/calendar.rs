//! Google Calendar API client for creating booking events.
//!
//! The service account identity cannot invite live attendees without
//! domain-wide delegation, so events are created without attendees and the
//! attendee list is folded into the event description and the generated
//! iCalendar invite instead. Error responses are classified here, at the
//! collaborator boundary, into a conferencing-specific rejection (worth a
//! single retry without a link) or a fatal failure.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use http::StatusCode;
use icalendar::{Calendar, Component, Event as IcsEvent, EventLike, Property};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::conference::ConferenceRequest;
use crate::core::AppConfig;
use crate::google::auth::{ServiceAccountKey, fetch_access_token};

const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

#[derive(Debug, Clone)]
pub struct Attendee {
    pub email: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EventRequest {
    pub summary: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub attendees: Vec<Attendee>,
    pub conference: ConferenceRequest,
}

/// A created event plus the invite content sent along with the
/// confirmation emails.
#[derive(Debug, Clone)]
pub struct CalendarEvent {
    pub id: String,
    pub html_link: String,
    pub conference_link: Option<String>,
    pub ics: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CalendarError {
    /// The backend rejected the conferencing part of the request; the rest
    /// of the event payload may still be valid.
    #[error("conference link unavailable: {0}")]
    ConferenceUnavailable(String),
    #[error(transparent)]
    Fatal(#[from] anyhow::Error),
}

#[async_trait]
pub trait CalendarService: Send + Sync {
    async fn create_event(&self, request: &EventRequest) -> Result<CalendarEvent, CalendarError>;
}

pub struct GoogleCalendar {
    http: Client,
    api_base: String,
    token_url: String,
    key: ServiceAccountKey,
    calendar_id: String,
    organizer_name: String,
    organizer_email: String,
}

impl GoogleCalendar {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            http: Client::new(),
            api_base: config.google_calendar_api_base.clone(),
            token_url: config.google_token_url.clone(),
            key: ServiceAccountKey {
                client_email: config.google_service_account_email.clone(),
                private_key: config.google_private_key.clone(),
            },
            calendar_id: "primary".to_string(),
            organizer_name: config.org_name.clone(),
            organizer_email: config.staff_email.clone(),
        }
    }
}

#[async_trait]
impl CalendarService for GoogleCalendar {
    async fn create_event(&self, request: &EventRequest) -> Result<CalendarEvent, CalendarError> {
        let access_token =
            fetch_access_token(&self.http, &self.token_url, &self.key, CALENDAR_SCOPE)
                .await
                .map_err(CalendarError::Fatal)?;

        let inserted = insert_event(
            &self.http,
            &self.api_base,
            &access_token,
            &self.calendar_id,
            request,
        )
        .await?;
        tracing::info!("Calendar event created with ID: {}", inserted.id);

        let conference_link = match &request.conference {
            ConferenceRequest::Hosted => inserted.hangout_link.clone(),
            ConferenceRequest::Link(url) => Some(url.clone()),
            ConferenceRequest::Disabled => None,
        };

        let ics = invite_ics(
            request,
            &inserted.id,
            &inserted.html_link,
            conference_link.as_deref(),
            &self.organizer_name,
            &self.organizer_email,
        );

        Ok(CalendarEvent {
            id: inserted.id,
            html_link: inserted.html_link,
            conference_link,
            ics,
        })
    }
}

// Wire types from the Calendar v3 events.insert documentation

#[derive(Serialize)]
struct EventResource {
    summary: String,
    description: String,
    start: EventTime,
    end: EventTime,
    // Public so attendees can open the event even though they were not
    // invited directly
    visibility: &'static str,
    transparency: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<String>,
    #[serde(rename = "conferenceData", skip_serializing_if = "Option::is_none")]
    conference_data: Option<ConferenceData>,
}

#[derive(Serialize)]
struct EventTime {
    #[serde(rename = "dateTime")]
    date_time: String,
    #[serde(rename = "timeZone")]
    time_zone: &'static str,
}

#[derive(Serialize)]
struct ConferenceData {
    #[serde(rename = "createRequest")]
    create_request: CreateConferenceRequest,
}

#[derive(Serialize)]
struct CreateConferenceRequest {
    #[serde(rename = "requestId")]
    request_id: String,
}

#[derive(Debug, Deserialize)]
pub struct InsertedEvent {
    pub id: String,
    #[serde(rename = "htmlLink")]
    pub html_link: String,
    #[serde(rename = "hangoutLink")]
    pub hangout_link: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

/// Insert one event. Attendees go into the description, not the payload.
pub async fn insert_event(
    client: &Client,
    api_base: &str,
    access_token: &str,
    calendar_id: &str,
    request: &EventRequest,
) -> Result<InsertedEvent, CalendarError> {
    let attendee_lines = request
        .attendees
        .iter()
        .map(|a| {
            format!(
                "- {} ({})",
                a.display_name.as_deref().unwrap_or(&a.email),
                a.email
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    let description = format!("{}\n\nAttendees:\n{}", request.description, attendee_lines);

    let (conference_data, location, conference_version) = match &request.conference {
        ConferenceRequest::Hosted => (
            Some(ConferenceData {
                create_request: CreateConferenceRequest {
                    request_id: format!("meeting-{}", Uuid::new_v4()),
                },
            }),
            None,
            1,
        ),
        ConferenceRequest::Link(url) => (None, Some(url.clone()), 0),
        ConferenceRequest::Disabled => (None, None, 0),
    };

    let resource = EventResource {
        summary: request.summary.clone(),
        description,
        start: EventTime {
            date_time: request.start.to_rfc3339(),
            time_zone: "UTC",
        },
        end: EventTime {
            date_time: request.end.to_rfc3339(),
            time_zone: "UTC",
        },
        visibility: "public",
        transparency: "opaque",
        location,
        conference_data,
    };

    let url = format!(
        "{}/calendar/v3/calendars/{}/events?conferenceDataVersion={}&sendUpdates=none",
        api_base, calendar_id, conference_version
    );
    let res = client
        .post(&url)
        .bearer_auth(access_token)
        .json(&resource)
        .send()
        .await
        .map_err(|e| CalendarError::Fatal(e.into()))?;
    let status = res.status();
    let text = res.text().await.unwrap_or_default();
    if !status.is_success() {
        return Err(classify_api_error(status, &text, &request.conference));
    }

    let inserted: InsertedEvent =
        serde_json::from_str(&text).map_err(|e| CalendarError::Fatal(e.into()))?;
    Ok(inserted)
}

/// Classify an error response from the events API. A rejected conferencing
/// request surfaces as a 400 whose message names the conference data or
/// calls the value invalid; it is only recoverable when a hosted link was
/// actually requested. Auth failures are reported generically.
fn classify_api_error(
    status: StatusCode,
    body: &str,
    conference: &ConferenceRequest,
) -> CalendarError {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return CalendarError::Fatal(anyhow::anyhow!("authentication error ({})", status));
    }

    let message = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .and_then(|e| e.message)
        .unwrap_or_else(|| format!("{}", status));

    let lowered = message.to_lowercase();
    if *conference == ConferenceRequest::Hosted
        && status == StatusCode::BAD_REQUEST
        && (lowered.contains("conference") || lowered.contains("invalid"))
    {
        return CalendarError::ConferenceUnavailable(message);
    }

    CalendarError::Fatal(anyhow::anyhow!("calendar event creation failed: {}", message))
}

/// Generate the invite attachment. Unlike the live event this carries the
/// attendee list, so recipients can add the meeting with everyone on it.
pub fn invite_ics(
    request: &EventRequest,
    uid: &str,
    event_link: &str,
    conference_link: Option<&str>,
    organizer_name: &str,
    organizer_email: &str,
) -> String {
    let description = match conference_link {
        Some(link) => format!("{}\n\nJoin the call: {}", request.description, link),
        None => request.description.clone(),
    };

    let mut event = IcsEvent::new();
    event.uid(uid);
    event.summary(&request.summary);
    event.description(&description);
    event.location(conference_link.unwrap_or("Online Meeting"));
    event.starts(request.start);
    event.ends(request.end);
    event.add_property("URL", event_link);

    let mut organizer = Property::new("ORGANIZER", format!("mailto:{}", organizer_email));
    organizer.add_parameter("CN", organizer_name);
    event.append_property(organizer);

    // ATTENDEE appears once per attendee
    for attendee in &request.attendees {
        let mut prop = Property::new("ATTENDEE", format!("mailto:{}", attendee.email));
        prop.add_parameter("CN", attendee.display_name.as_deref().unwrap_or(&attendee.email));
        prop.add_parameter("RSVP", "TRUE");
        event.append_multi_property(prop);
    }

    let mut calendar = Calendar::new();
    calendar.name(&format!("{} Meetings", organizer_name));
    calendar.push(event.done());
    calendar.done().to_string()
}
