use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A push-capable device, unique by token
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub token: String,
    pub platform: String,
    pub bundle_id: Option<String>,
    pub registered_at: DateTime<Utc>,
}

/// Model for registering a device
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewDevice {
    pub token: String,
    pub platform: String,
    pub bundle_id: Option<String>,
}
