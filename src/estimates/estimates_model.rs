use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An estimate shared with a customer through a tracking link
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    pub tracking_id: String,
    pub title: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub total: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl Estimate {
    /// Minimal record created when an unregistered tracking id is viewed
    pub fn stub(tracking_id: &str, created_at: DateTime<Utc>) -> Self {
        Estimate {
            tracking_id: tracking_id.to_string(),
            title: None,
            customer_name: None,
            customer_email: None,
            total: None,
            created_at,
        }
    }

    pub fn display_title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| format!("Estimate {}", self.tracking_id))
    }
}

/// Model for registering (or re-registering) an estimate
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewEstimate {
    pub tracking_id: String,
    pub title: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub total: Option<f64>,
}

/// Estimate listing entry with aggregated view data
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EstimateSummary {
    pub tracking_id: String,
    pub title: Option<String>,
    pub customer_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub view_count: usize,
    pub last_viewed_at: Option<DateTime<Utc>>,
}
