use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::estimates::Estimate;

/// A single recorded access against a tracking id. Immutable once written.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct View {
    pub sequence_id: u64,
    pub tracking_id: String,
    pub viewed_at: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

/// Request metadata captured alongside a view
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ViewMetadata {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

/// Outcome of recording a view, including the first-view flag that gates
/// notification dispatch
#[derive(Debug, Clone)]
pub struct RecordedView {
    pub view: View,
    pub estimate: Estimate,
    pub is_first_view: bool,
}

/// Per-tracking-id view statistics projection
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ViewStats {
    pub tracking_id: String,
    pub view_count: usize,
    pub last_viewed_at: Option<DateTime<Utc>>,
    pub views: Vec<ViewStatEntry>,
}

/// A redacted view entry: the raw IP address never leaves the store
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ViewStatEntry {
    pub timestamp: DateTime<Utc>,
    pub ip_hash: Option<String>,
    pub user_agent: Option<String>,
}
