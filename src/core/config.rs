use std::env;

use crate::conference::ConferenceProvider;

/// Process-wide configuration, read from the environment exactly once at
/// startup and passed into construction. Handlers and collaborator clients
/// never read ambient env state so tests can build this directly.
#[derive(Clone)]
pub struct AppConfig {
    pub google_service_account_email: String,
    pub google_private_key: String,
    pub google_sheet_id: String,
    pub google_calendar_api_base: String,
    pub google_sheets_api_base: String,
    pub google_token_url: String,
    pub mailsendr_api_key: String,
    pub mailsendr_api_base: String,
    pub from_email: String,
    pub staff_email: String,
    pub org_name: String,
    pub allowed_origins: Vec<String>,
    pub conference: ConferenceProvider,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let google_service_account_email = env::var("GOOGLE_SERVICE_ACCOUNT_EMAIL")
            .expect("Missing env var GOOGLE_SERVICE_ACCOUNT_EMAIL");
        // Deployment environments store the key with literal \n sequences
        let google_private_key = env::var("GOOGLE_PRIVATE_KEY")
            .expect("Missing env var GOOGLE_PRIVATE_KEY")
            .replace("\\n", "\n");
        let google_sheet_id =
            env::var("GOOGLE_SHEET_ID").expect("Missing env var GOOGLE_SHEET_ID");
        let google_calendar_api_base = env::var("FORMRELAY_GOOGLE_CALENDAR_API_BASE")
            .unwrap_or_else(|_| "https://www.googleapis.com".to_string());
        let google_sheets_api_base = env::var("FORMRELAY_GOOGLE_SHEETS_API_BASE")
            .unwrap_or_else(|_| "https://sheets.googleapis.com".to_string());
        let google_token_url = env::var("FORMRELAY_GOOGLE_TOKEN_URL")
            .unwrap_or_else(|_| "https://oauth2.googleapis.com/token".to_string());
        let mailsendr_api_key =
            env::var("MAILSENDR_API_KEY").expect("Missing env var MAILSENDR_API_KEY");
        let mailsendr_api_base = env::var("FORMRELAY_MAILSENDR_API_BASE")
            .unwrap_or_else(|_| "https://api.mailsendr.com".to_string());
        let from_email =
            env::var("MAILSENDR_FROM_EMAIL").expect("Missing env var MAILSENDR_FROM_EMAIL");
        let staff_email =
            env::var("FORMRELAY_STAFF_EMAIL").expect("Missing env var FORMRELAY_STAFF_EMAIL");
        let org_name =
            env::var("FORMRELAY_ORG_NAME").unwrap_or_else(|_| "Formrelay".to_string());
        let allowed_origins = env::var("FORMRELAY_ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        let conference = match env::var("FORMRELAY_CONFERENCE_PROVIDER").as_deref() {
            Ok("meeting-room") => ConferenceProvider::MeetingRoom {
                base_url: env::var("FORMRELAY_MEETING_ROOM_URL")
                    .expect("Missing env var FORMRELAY_MEETING_ROOM_URL"),
            },
            _ => ConferenceProvider::GoogleMeet,
        };

        Self {
            google_service_account_email,
            google_private_key,
            google_sheet_id,
            google_calendar_api_base,
            google_sheets_api_base,
            google_token_url,
            mailsendr_api_key,
            mailsendr_api_base,
            from_email,
            staff_email,
            org_name,
            allowed_origins,
            conference,
        }
    }
}
