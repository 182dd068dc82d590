//! Public types for the newsletter API
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct NewsletterForm {
    pub email: Option<String>,
}

#[derive(Serialize)]
pub struct NewsletterResponse {
    pub success: bool,
    pub message: String,
}
