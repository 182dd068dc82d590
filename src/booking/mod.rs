//! Meeting booking orchestration.
//!
//! One straight-line flow per request: validate the form, create the
//! calendar event (retrying once without conferencing when only the link
//! was rejected), append an audit row best-effort, then send the two
//! confirmation emails. Collaborators come in as trait objects so the
//! whole flow runs against fakes in tests.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use regex::Regex;
use serde::Deserialize;

use crate::conference::ConferenceRequest;
use crate::core::AppConfig;
use crate::google::calendar::{Attendee, CalendarError, CalendarService, EventRequest};
use crate::google::sheets::{APPOINTMENTS_SHEET, SheetStore};
use crate::mailer::{Attachment, EmailSender, OutboundEmail};
use crate::templates;

/// Every booking is exactly one hour. Fixed policy, never user input.
pub const MEETING_DURATION_MINUTES: i64 = 60;

const CALENDAR_FILE_NOTE: &str =
    "Please use the attached calendar file (.ics) in the email to add this meeting to your calendar.";

/// Raw form payload as submitted by the site. Everything is optional at
/// the wire level; [`validate`] decides what is actually required.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingForm {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub company_name: Option<String>,
    pub meeting_date: Option<String>,
    pub meeting_time: Option<String>,
    pub meeting_type: Option<String>,
    pub message: Option<String>,
}

/// A validated booking. Field invariants hold from here on: the email is
/// address-shaped and date+time combine into a real instant.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub full_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub company_name: Option<String>,
    pub meeting_date: NaiveDate,
    pub meeting_time: NaiveTime,
    pub meeting_type: String,
    pub message: Option<String>,
}

impl BookingRequest {
    pub fn start_instant(&self) -> DateTime<Utc> {
        self.meeting_date.and_time(self.meeting_time).and_utc()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeetingWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl MeetingWindow {
    pub fn for_start(start: DateTime<Utc>) -> Self {
        Self {
            start,
            end: start + chrono::Duration::minutes(MEETING_DURATION_MINUTES),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    /// Problem with the submitted form; surfaced verbatim with a 400
    #[error("{0}")]
    Validation(String),
    /// A provider call failed and the booking cannot complete
    #[error(transparent)]
    Provider(#[from] anyhow::Error),
}

/// What the caller gets back on a fully successful booking.
#[derive(Debug, Clone)]
pub struct BookingOutcome {
    pub meeting_id: String,
    pub meet_link: Option<String>,
    pub calendar_event_link: String,
    pub note: String,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Check the form and produce a validated request. No side effects happen
/// before this returns Ok.
pub fn validate(form: &BookingForm) -> Result<BookingRequest, BookingError> {
    let (Some(full_name), Some(email), Some(meeting_date), Some(meeting_time), Some(meeting_type)) = (
        present(&form.full_name),
        present(&form.email),
        present(&form.meeting_date),
        present(&form.meeting_time),
        present(&form.meeting_type),
    ) else {
        return Err(BookingError::Validation(
            "Missing required fields. Please provide fullName, email, meetingDate, meetingTime, and meetingType."
                .to_string(),
        ));
    };

    let email_re = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    if !email_re.is_match(email) {
        return Err(BookingError::Validation("Invalid email format".to_string()));
    }

    let date = NaiveDate::parse_from_str(meeting_date, "%Y-%m-%d");
    let time = NaiveTime::parse_from_str(meeting_time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(meeting_time, "%H:%M:%S"));
    let (Ok(meeting_date), Ok(meeting_time)) = (date, time) else {
        return Err(BookingError::Validation(
            "Invalid date or time format. Please use YYYY-MM-DD for date and HH:MM for time."
                .to_string(),
        ));
    };

    Ok(BookingRequest {
        full_name: full_name.to_string(),
        email: email.to_string(),
        phone_number: present(&form.phone_number).map(str::to_string),
        company_name: present(&form.company_name).map(str::to_string),
        meeting_date,
        meeting_time,
        meeting_type: meeting_type.to_string(),
        message: present(&form.message).map(str::to_string),
    })
}

/// Book one meeting end to end.
///
/// The audit row append is best-effort: a failure there is logged and
/// absorbed because the booking can be reconstructed from the email
/// record. Email delivery failures are fatal since email is how the
/// requester learns the booking succeeded.
pub async fn book_meeting(
    config: &AppConfig,
    calendar: &dyn CalendarService,
    sheets: &dyn SheetStore,
    mailer: &dyn EmailSender,
    form: &BookingForm,
) -> Result<BookingOutcome, BookingError> {
    let request = validate(form)?;
    let window = MeetingWindow::for_start(request.start_instant());

    let formatted_date = window.start.format("%A, %B %-d, %Y").to_string();
    let formatted_time = window.start.format("%-I:%M %p").to_string();

    tracing::info!(
        "Meeting booking from {} ({}) for {} at {}",
        request.full_name,
        request.email,
        formatted_date,
        formatted_time
    );

    let company = request.company_name.as_deref().unwrap_or("N/A");
    let phone_info = match &request.phone_number {
        Some(phone) => format!("Contact Phone: {}", phone),
        None => "No phone number provided".to_string(),
    };
    let mut description = format!(
        "Meeting Type: {}\nCompany: {}\n{}",
        request.meeting_type, company, phone_info
    );
    if let Some(message) = &request.message {
        description.push_str(&format!("\n\nAdditional Notes: {}", message));
    }

    let event_request = EventRequest {
        summary: format!(
            "Meeting with {} from {} - {}",
            request.full_name, company, request.meeting_type
        ),
        description,
        start: window.start,
        end: window.end,
        attendees: vec![
            Attendee {
                email: request.email.clone(),
                display_name: Some(request.full_name.clone()),
            },
            Attendee {
                email: config.staff_email.clone(),
                display_name: Some(config.org_name.clone()),
            },
        ],
        conference: config.conference.request(),
    };

    let event = match calendar.create_event(&event_request).await {
        Ok(event) => event,
        Err(CalendarError::ConferenceUnavailable(reason)) => {
            tracing::warn!(
                "Conference link rejected ({}), retrying event creation without one",
                reason
            );
            let retry = EventRequest {
                conference: ConferenceRequest::Disabled,
                ..event_request
            };
            calendar
                .create_event(&retry)
                .await
                .map_err(|err| BookingError::Provider(err.into()))?
        }
        Err(CalendarError::Fatal(err)) => return Err(BookingError::Provider(err)),
    };

    // Audit row, best-effort
    let row = vec![
        Utc::now().to_rfc3339(),
        request.full_name.clone(),
        request.email.clone(),
        request
            .phone_number
            .clone()
            .unwrap_or_else(|| "Not provided".to_string()),
        request
            .company_name
            .clone()
            .unwrap_or_else(|| "Not provided".to_string()),
        request.meeting_date.to_string(),
        request.meeting_time.format("%H:%M").to_string(),
        request.meeting_type.clone(),
        request
            .message
            .clone()
            .unwrap_or_else(|| "No message provided".to_string()),
        event.conference_link.clone().unwrap_or_default(),
        event.html_link.clone(),
    ];
    if let Err(err) = sheets.append_row(APPOINTMENTS_SHEET, row).await {
        tracing::warn!("Failed to record appointment row: {:#}", err);
    }

    let calendar_note = format!(
        "Note: Due to technical limitations, you won't receive a direct calendar invitation. \
         Please use the attached .ics file to add this meeting to your calendar. {}",
        match &event.conference_link {
            Some(_) => "The video call link is included in the calendar event and in this email.",
            None =>
                "This meeting does not include a video call link. Reply to this email and we can \
                 arrange another way to join.",
        }
    );

    let phone_display = request.phone_number.as_deref().unwrap_or("Not provided");
    let company_display = request.company_name.as_deref().unwrap_or("Not provided");
    let year = templates::footer_year();
    let invite = Attachment {
        filename: "meeting.ics".to_string(),
        content: event.ics.clone(),
        content_type: "text/calendar".to_string(),
    };

    for is_client in [true, false] {
        let html = templates::booking_confirmation_email(&templates::BookingEmail {
            is_client,
            full_name: &request.full_name,
            email: &request.email,
            phone_number: phone_display,
            company_name: company_display,
            meeting_date: &formatted_date,
            meeting_time: &formatted_time,
            meeting_type: &request.meeting_type,
            message: request.message.as_deref(),
            meet_link: event.conference_link.as_deref(),
            calendar_note: &calendar_note,
            org_name: &config.org_name,
            staff_email: &config.staff_email,
            year,
        })?;

        let email = if is_client {
            OutboundEmail {
                to: request.email.clone(),
                subject: format!("Your Meeting Confirmation - {}", config.org_name),
                html,
                text: None,
                attachments: vec![invite.clone()],
            }
        } else {
            OutboundEmail {
                to: config.staff_email.clone(),
                subject: format!(
                    "New Meeting Booking: {} - {}",
                    request.full_name, request.meeting_type
                ),
                html,
                text: None,
                attachments: vec![invite.clone()],
            }
        };
        mailer.send(&email).await?;
        if is_client {
            tracing::info!("Confirmation email sent to client: {}", request.email);
        } else {
            tracing::info!("Notification email sent to staff");
        }
    }

    Ok(BookingOutcome {
        meeting_id: event.id,
        meet_link: event.conference_link,
        calendar_event_link: event.html_link,
        note: CALENDAR_FILE_NOTE.to_string(),
    })
}
