//! Test utilities for integration tests
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use axum::Router;

use formrelay::api::{AppState, app};
use formrelay::conference::{ConferenceProvider, ConferenceRequest};
use formrelay::core::AppConfig;
use formrelay::google::calendar::{
    CalendarError, CalendarEvent, CalendarService, EventRequest,
};
use formrelay::google::sheets::SheetStore;
use formrelay::mailer::{EmailSender, OutboundEmail};

pub fn test_config() -> AppConfig {
    AppConfig {
        google_service_account_email: "relay@test.iam.gserviceaccount.com".to_string(),
        google_private_key: "test-key".to_string(),
        google_sheet_id: "sheet123".to_string(),
        google_calendar_api_base: "http://127.0.0.1:0".to_string(),
        google_sheets_api_base: "http://127.0.0.1:0".to_string(),
        google_token_url: "http://127.0.0.1:0/token".to_string(),
        mailsendr_api_key: "test_api_key".to_string(),
        mailsendr_api_base: "http://127.0.0.1:0".to_string(),
        from_email: "no-reply@example.org".to_string(),
        staff_email: "hello@example.org".to_string(),
        org_name: "Example Org".to_string(),
        allowed_origins: vec![],
        conference: ConferenceProvider::GoogleMeet,
    }
}

#[derive(Default)]
pub struct FakeCalendar {
    pub calls: AtomicUsize,
    pub fail_fatal: AtomicBool,
}

#[async_trait]
impl CalendarService for FakeCalendar {
    async fn create_event(&self, request: &EventRequest) -> Result<CalendarEvent, CalendarError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_fatal.load(Ordering::SeqCst) {
            return Err(CalendarError::Fatal(anyhow::anyhow!(
                "calendar event creation failed: Backend Error"
            )));
        }
        let conference_link = match &request.conference {
            ConferenceRequest::Hosted => Some("https://meet.google.com/abc-defg-hij".to_string()),
            ConferenceRequest::Link(url) => Some(url.clone()),
            ConferenceRequest::Disabled => None,
        };
        Ok(CalendarEvent {
            id: "evt_001".to_string(),
            html_link: "https://calendar.google.com/event?eid=evt_001".to_string(),
            conference_link,
            ics: "BEGIN:VCALENDAR\nUID:evt_001\nEND:VCALENDAR".to_string(),
        })
    }
}

#[derive(Default)]
pub struct FakeSheets {
    pub calls: AtomicUsize,
    pub fail: AtomicBool,
    pub rows: Mutex<Vec<(String, Vec<String>)>>,
}

#[async_trait]
impl SheetStore for FakeSheets {
    async fn append_row(&self, sheet: &str, row: Vec<String>) -> anyhow::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("sheet append failed: Quota exceeded");
        }
        self.rows.lock().unwrap().push((sheet.to_string(), row));
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeMailer {
    pub calls: AtomicUsize,
    pub fail: AtomicBool,
    pub sent: Mutex<Vec<OutboundEmail>>,
}

#[async_trait]
impl EmailSender for FakeMailer {
    async fn send(&self, email: &OutboundEmail) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("mailsendr API error: 500 delivery failed");
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok("msg_001".to_string())
    }
}

/// Fake collaborators wired into a test application, kept around so tests
/// can assert on call counts and captured payloads.
pub struct TestHarness {
    pub calendar: Arc<FakeCalendar>,
    pub sheets: Arc<FakeSheets>,
    pub mailer: Arc<FakeMailer>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self {
            calendar: Arc::new(FakeCalendar::default()),
            sheets: Arc::new(FakeSheets::default()),
            mailer: Arc::new(FakeMailer::default()),
        }
    }
}

/// Creates a test application router backed by the harness's fakes.
pub fn test_app(harness: &TestHarness) -> Router {
    let app_state = AppState::new(
        test_config(),
        harness.calendar.clone(),
        harness.sheets.clone(),
        harness.mailer.clone(),
    );
    app(Arc::new(RwLock::new(app_state)))
}
