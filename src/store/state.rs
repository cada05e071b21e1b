use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::contractor::Contractor;
use crate::devices::Device;
use crate::estimates::Estimate;
use crate::notifications::Notification;
use crate::views::View;

/// Complete in-memory state: the single document persisted to disk.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct AppData {
    /// Estimates keyed by tracking id
    #[serde(default)]
    pub estimates: HashMap<String, Estimate>,
    /// Append-only view history, oldest first
    #[serde(default)]
    pub views: Vec<View>,
    /// Registered push devices, unique by token
    #[serde(default)]
    pub devices: Vec<Device>,
    /// In-app notification feed, newest first
    #[serde(default)]
    pub notifications: Vec<Notification>,
    /// Singleton notification recipient
    #[serde(default)]
    pub contractor: Option<Contractor>,
}

impl AppData {
    /// Sequence id for the next appended view. Views are append-only and
    /// eviction drops from the front, so the tail always holds the maximum.
    pub fn next_sequence_id(&self) -> u64 {
        self.views.last().map(|v| v.sequence_id + 1).unwrap_or(1)
    }

    /// Whether any view exists for the given tracking id.
    pub fn has_view_for(&self, tracking_id: &str) -> bool {
        self.views.iter().any(|v| v.tracking_id == tracking_id)
    }
}
