use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// In-app notification record, created once per first view
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub tracking_id: String,
    pub estimate_title: String,
    pub customer_name: Option<String>,
    pub message: String,
    pub viewed_at: DateTime<Utc>,
    pub is_read: bool,
}

/// Payload handed to the push port, one send per device
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PushPayload {
    pub title: String,
    pub body: String,
}
