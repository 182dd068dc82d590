//! Public types for the connectivity probe API
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
pub struct StatusResponse {
    pub success: bool,
    pub message: String,
    pub data: StatusData,
}

#[derive(Serialize)]
pub struct StatusData {
    pub service: String,
    pub version: String,
    pub timestamp: String,
    pub origin: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cors: Option<String>,
    #[serde(rename = "receivedData", skip_serializing_if = "Option::is_none")]
    pub received_data: Option<Value>,
}
