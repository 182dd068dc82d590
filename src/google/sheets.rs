//! Google Sheets API client for appending submission rows.
//!
//! Each form writes to a named sheet inside one spreadsheet. When a sheet
//! is missing the client creates it, writes the fixed header row for that
//! sheet name, and retries the append once.

use anyhow::Result;
use async_trait::async_trait;
use http::StatusCode;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::core::AppConfig;
use crate::google::auth::{ServiceAccountKey, fetch_access_token};

const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

pub const APPOINTMENTS_SHEET: &str = "Appointments";
pub const NEWSLETTER_SHEET: &str = "Newsletter";

#[async_trait]
pub trait SheetStore: Send + Sync {
    async fn append_row(&self, sheet: &str, row: Vec<String>) -> Result<()>;
}

pub struct GoogleSheets {
    http: Client,
    api_base: String,
    token_url: String,
    key: ServiceAccountKey,
    spreadsheet_id: String,
}

impl GoogleSheets {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            http: Client::new(),
            api_base: config.google_sheets_api_base.clone(),
            token_url: config.google_token_url.clone(),
            key: ServiceAccountKey {
                client_email: config.google_service_account_email.clone(),
                private_key: config.google_private_key.clone(),
            },
            spreadsheet_id: config.google_sheet_id.clone(),
        }
    }
}

#[async_trait]
impl SheetStore for GoogleSheets {
    async fn append_row(&self, sheet: &str, row: Vec<String>) -> Result<()> {
        let access_token =
            fetch_access_token(&self.http, &self.token_url, &self.key, SHEETS_SCOPE).await?;
        append_with_autocreate(
            &self.http,
            &self.api_base,
            &access_token,
            &self.spreadsheet_id,
            sheet,
            &row,
        )
        .await
    }
}

/// Header row written when a sheet is created on first use.
fn header_row(sheet: &str) -> Option<&'static [&'static str]> {
    match sheet {
        APPOINTMENTS_SHEET => Some(&[
            "Timestamp",
            "Full Name",
            "Email",
            "Phone",
            "Company",
            "Meeting Date",
            "Meeting Time",
            "Meeting Type",
            "Message",
            "Conference Link",
            "Event Link",
        ]),
        NEWSLETTER_SHEET => Some(&["Email", "Subscribed At"]),
        _ => None,
    }
}

enum AppendError {
    /// The named sheet does not exist in the spreadsheet yet
    MissingSheet,
    Fatal(anyhow::Error),
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

/// Append one row, creating the sheet with its header on first use.
pub async fn append_with_autocreate(
    client: &Client,
    api_base: &str,
    access_token: &str,
    spreadsheet_id: &str,
    sheet: &str,
    row: &[String],
) -> Result<()> {
    match append_values(client, api_base, access_token, spreadsheet_id, sheet, row).await {
        Ok(()) => Ok(()),
        Err(AppendError::MissingSheet) => {
            tracing::info!("Sheet {} not found, creating it", sheet);
            add_sheet(client, api_base, access_token, spreadsheet_id, sheet).await?;
            if let Some(header) = header_row(sheet) {
                let header: Vec<String> = header.iter().map(|h| h.to_string()).collect();
                append_values(client, api_base, access_token, spreadsheet_id, sheet, &header)
                    .await
                    .map_err(append_error_to_anyhow)?;
            }
            append_values(client, api_base, access_token, spreadsheet_id, sheet, row)
                .await
                .map_err(append_error_to_anyhow)
        }
        Err(err) => Err(append_error_to_anyhow(err)),
    }
}

fn append_error_to_anyhow(err: AppendError) -> anyhow::Error {
    match err {
        AppendError::MissingSheet => anyhow::anyhow!("Unable to parse range"),
        AppendError::Fatal(err) => err,
    }
}

async fn append_values(
    client: &Client,
    api_base: &str,
    access_token: &str,
    spreadsheet_id: &str,
    sheet: &str,
    row: &[String],
) -> Result<(), AppendError> {
    let url = format!(
        "{}/v4/spreadsheets/{}/values/{}!A1:append?valueInputOption=USER_ENTERED",
        api_base, spreadsheet_id, sheet
    );
    let res = client
        .post(&url)
        .bearer_auth(access_token)
        .json(&json!({ "values": [row] }))
        .send()
        .await
        .map_err(|e| AppendError::Fatal(e.into()))?;
    let status = res.status();
    if status.is_success() {
        return Ok(());
    }

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(AppendError::Fatal(anyhow::anyhow!(
            "authentication error ({})",
            status
        )));
    }

    let text = res.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&text)
        .ok()
        .and_then(|b| b.error)
        .and_then(|e| e.message)
        .unwrap_or_else(|| format!("{}", status));
    if message.contains("Unable to parse range") {
        return Err(AppendError::MissingSheet);
    }
    Err(AppendError::Fatal(anyhow::anyhow!(
        "sheet append failed: {}",
        message
    )))
}

async fn add_sheet(
    client: &Client,
    api_base: &str,
    access_token: &str,
    spreadsheet_id: &str,
    sheet: &str,
) -> Result<()> {
    let url = format!("{}/v4/spreadsheets/{}:batchUpdate", api_base, spreadsheet_id);
    let body = json!({
        "requests": [
            { "addSheet": { "properties": { "title": sheet } } }
        ]
    });
    let res = client
        .post(&url)
        .bearer_auth(access_token)
        .json(&body)
        .send()
        .await?;
    let status = res.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        anyhow::bail!("authentication error ({})", status);
    }
    if !status.is_success() {
        let text = res.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&text)
            .ok()
            .and_then(|b| b.error)
            .and_then(|e| e.message)
            .unwrap_or_else(|| format!("{}", status));
        anyhow::bail!("sheet creation failed: {}", message);
    }
    Ok(())
}
