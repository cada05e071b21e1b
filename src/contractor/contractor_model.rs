use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The notification recipient. At most one per deployment; re-registration
/// overwrites the prior value wholesale.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Contractor {
    pub email: String,
    pub name: Option<String>,
    pub company_name: Option<String>,
    pub registered_at: DateTime<Utc>,
}

/// Model for registering the contractor
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewContractor {
    pub email: String,
    pub name: Option<String>,
    pub company_name: Option<String>,
}
