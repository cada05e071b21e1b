use std::sync::Arc;

use chrono::Utc;

use crate::constants::ESTIMATE_LIST_LIMIT;
use crate::errors::{Result, ValidationError};
use crate::estimates::estimates_model::{Estimate, EstimateSummary, NewEstimate};
use crate::store::DataStore;

pub struct EstimateService {
    store: Arc<DataStore>,
}

impl EstimateService {
    pub fn new(store: Arc<DataStore>) -> Self {
        EstimateService { store }
    }

    /// Register an estimate, replacing any existing record for the same
    /// tracking id. The creation timestamp is preserved across
    /// re-registration so the listing order stays stable.
    pub fn register_estimate(&self, new_estimate: NewEstimate) -> Result<Estimate> {
        if new_estimate.tracking_id.trim().is_empty() {
            return Err(ValidationError::MissingField("trackingId".to_string()).into());
        }

        let estimate = self.store.mutate(|data| {
            let created_at = data
                .estimates
                .get(&new_estimate.tracking_id)
                .map(|existing| existing.created_at)
                .unwrap_or_else(Utc::now);

            let estimate = Estimate {
                tracking_id: new_estimate.tracking_id.clone(),
                title: new_estimate.title.clone(),
                customer_name: new_estimate.customer_name.clone(),
                customer_email: new_estimate.customer_email.clone(),
                total: new_estimate.total,
                created_at,
            };
            data.estimates
                .insert(estimate.tracking_id.clone(), estimate.clone());
            estimate
        });

        Ok(estimate)
    }

    pub fn get_estimate(&self, tracking_id: &str) -> Option<Estimate> {
        self.store
            .read(|data| data.estimates.get(tracking_id).cloned())
    }

    /// All estimates with aggregated view counts, newest first, capped at
    /// the listing limit. O(estimates * views) per call, bounded by the
    /// view history cap.
    pub fn list_estimates(&self) -> Vec<EstimateSummary> {
        self.store.read(|data| {
            let mut summaries: Vec<EstimateSummary> = data
                .estimates
                .values()
                .map(|estimate| {
                    let mut view_count = 0;
                    let mut last_viewed_at = None;
                    for view in &data.views {
                        if view.tracking_id == estimate.tracking_id {
                            view_count += 1;
                            if last_viewed_at.map_or(true, |last| view.viewed_at > last) {
                                last_viewed_at = Some(view.viewed_at);
                            }
                        }
                    }
                    EstimateSummary {
                        tracking_id: estimate.tracking_id.clone(),
                        title: estimate.title.clone(),
                        customer_name: estimate.customer_name.clone(),
                        created_at: estimate.created_at,
                        view_count,
                        last_viewed_at,
                    }
                })
                .collect();

            summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            summaries.truncate(ESTIMATE_LIST_LIMIT);
            summaries
        })
    }
}
