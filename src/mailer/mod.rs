//! Outbound email via the mailsendr HTTP API.

use anyhow::Result;
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use http::StatusCode;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::core::AppConfig;

#[derive(Debug, Clone)]
pub struct Attachment {
    pub filename: String,
    pub content: String,
    pub content_type: String,
}

#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: Option<String>,
    pub attachments: Vec<Attachment>,
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Send one message and return the provider's message id.
    async fn send(&self, email: &OutboundEmail) -> Result<String>;
}

pub struct Mailsendr {
    http: Client,
    api_base: String,
    api_key: String,
    from_email: String,
    from_name: String,
}

impl Mailsendr {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            http: Client::new(),
            api_base: config.mailsendr_api_base.clone(),
            api_key: config.mailsendr_api_key.clone(),
            from_email: config.from_email.clone(),
            from_name: config.org_name.clone(),
        }
    }
}

#[derive(Serialize)]
struct SendBody<'a> {
    to: &'a str,
    from: &'a str,
    from_name: &'a str,
    subject: &'a str,
    html: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<WireAttachment>,
    tracking_settings: TrackingSettings,
}

#[derive(Serialize)]
struct WireAttachment {
    filename: String,
    // Base64 per the attachment API
    content: String,
    content_type: String,
}

#[derive(Serialize)]
struct TrackingSettings {
    click_tracking: Tracking,
    open_tracking: Tracking,
}

#[derive(Serialize)]
struct Tracking {
    enable: bool,
}

#[derive(Deserialize, Default)]
struct SendResponse {
    #[serde(default)]
    message_id: Option<String>,
}

#[async_trait]
impl EmailSender for Mailsendr {
    async fn send(&self, email: &OutboundEmail) -> Result<String> {
        let attachments = email
            .attachments
            .iter()
            .map(|a| WireAttachment {
                filename: a.filename.clone(),
                content: STANDARD.encode(&a.content),
                content_type: a.content_type.clone(),
            })
            .collect();
        let body = SendBody {
            to: &email.to,
            from: &self.from_email,
            from_name: &self.from_name,
            subject: &email.subject,
            html: &email.html,
            text: email.text.as_deref().unwrap_or(""),
            attachments,
            tracking_settings: TrackingSettings {
                click_tracking: Tracking { enable: true },
                open_tracking: Tracking { enable: true },
            },
        };

        let res = self
            .http
            .post(format!("{}/v1/send", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let status = res.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            // The error body can reference the API key so it stays out of
            // the error chain entirely
            anyhow::bail!("authentication error ({})", status);
        }
        let text = res.text().await.unwrap_or_default();
        if !status.is_success() {
            anyhow::bail!("mailsendr API error: {} {}", status, text);
        }

        let parsed: SendResponse = serde_json::from_str(&text).unwrap_or_default();
        Ok(parsed.message_id.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_mailer(api_base: String) -> Mailsendr {
        Mailsendr {
            http: Client::new(),
            api_base,
            api_key: "test_api_key".to_string(),
            from_email: "no-reply@example.org".to_string(),
            from_name: "Example Org".to_string(),
        }
    }

    fn test_email() -> OutboundEmail {
        OutboundEmail {
            to: "ada@example.com".to_string(),
            subject: "Your Meeting Confirmation".to_string(),
            html: "<p>Confirmed</p>".to_string(),
            text: None,
            attachments: vec![Attachment {
                filename: "meeting.ics".to_string(),
                content: "BEGIN:VCALENDAR\nEND:VCALENDAR".to_string(),
                content_type: "text/calendar".to_string(),
            }],
        }
    }

    #[tokio::test]
    async fn test_send_returns_message_id() {
        let mut server = mockito::Server::new_async().await;
        let mailer = test_mailer(server.url());

        let mock = server
            .mock("POST", "/v1/send")
            .match_header("authorization", "Bearer test_api_key")
            .match_body(mockito::Matcher::PartialJsonString(
                r#"{"to": "ada@example.com", "from": "no-reply@example.org"}"#.to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message_id": "msg_001"}"#)
            .create();

        let message_id = mailer.send(&test_email()).await.unwrap();
        assert_eq!(message_id, "msg_001");
        mock.assert();
    }

    #[tokio::test]
    async fn test_attachments_are_base64_encoded() {
        let mut server = mockito::Server::new_async().await;
        let mailer = test_mailer(server.url());

        let encoded = STANDARD.encode("BEGIN:VCALENDAR\nEND:VCALENDAR");
        let mock = server
            .mock("POST", "/v1/send")
            .match_body(mockito::Matcher::PartialJsonString(format!(
                r#"{{"attachments": [{{"filename": "meeting.ics", "content": "{}", "content_type": "text/calendar"}}]}}"#,
                encoded
            )))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message_id": "msg_002"}"#)
            .create();

        mailer.send(&test_email()).await.unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn test_auth_failure_is_sanitized() {
        let mut server = mockito::Server::new_async().await;
        let mailer = test_mailer(server.url());

        let _mock = server
            .mock("POST", "/v1/send")
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "invalid api key test_api_key"}"#)
            .create();

        let err = mailer.send(&test_email()).await.unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("authentication error"));
        assert!(!message.contains("test_api_key"));
    }

    #[tokio::test]
    async fn test_api_errors_propagate() {
        let mut server = mockito::Server::new_async().await;
        let mailer = test_mailer(server.url());

        let _mock = server
            .mock("POST", "/v1/send")
            .with_status(422)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "recipient address rejected"}"#)
            .create();

        let err = mailer.send(&test_email()).await.unwrap_err();
        assert!(format!("{:#}", err).contains("recipient address rejected"));
    }
}
