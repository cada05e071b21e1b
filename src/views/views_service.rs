use std::sync::Arc;

use chrono::Utc;
use log::debug;
use sha2::{Digest, Sha256};

use crate::constants::{IP_HASH_LEN, MAX_VIEW_HISTORY, VIEW_STATS_LIMIT};
use crate::errors::{Result, ValidationError};
use crate::estimates::Estimate;
use crate::store::DataStore;
use crate::views::views_model::{RecordedView, View, ViewMetadata, ViewStatEntry, ViewStats};

pub struct ViewTrackerService {
    store: Arc<DataStore>,
    ip_salt: String,
}

impl ViewTrackerService {
    pub fn new(store: Arc<DataStore>, ip_salt: impl Into<String>) -> Self {
        ViewTrackerService {
            store,
            ip_salt: ip_salt.into(),
        }
    }

    /// Record a view against a tracking id.
    ///
    /// Unknown ids are accepted and tracked as-is; a minimal estimate stub
    /// is created on first reference. The first-view flag is computed
    /// against the state immediately before this call's own view is
    /// appended, atomically within a single store mutation.
    pub fn record_view(&self, tracking_id: &str, metadata: ViewMetadata) -> Result<RecordedView> {
        if tracking_id.trim().is_empty() {
            return Err(ValidationError::MissingField("trackingId".to_string()).into());
        }

        let recorded = self.store.mutate(|data| {
            let now = Utc::now();
            let is_first_view = !data.has_view_for(tracking_id);

            // Estimate-before-View ordering within the same mutation
            let estimate = data
                .estimates
                .entry(tracking_id.to_string())
                .or_insert_with(|| Estimate::stub(tracking_id, now))
                .clone();

            let view = View {
                sequence_id: data.next_sequence_id(),
                tracking_id: tracking_id.to_string(),
                viewed_at: now,
                ip_address: metadata.ip_address,
                user_agent: metadata.user_agent,
                referer: metadata.referer,
            };
            data.views.push(view.clone());

            if data.views.len() > MAX_VIEW_HISTORY {
                let excess = data.views.len() - MAX_VIEW_HISTORY;
                data.views.drain(..excess);
            }

            RecordedView {
                view,
                estimate,
                is_first_view,
            }
        });

        debug!(
            "recorded view #{} for {} (first: {})",
            recorded.view.sequence_id, tracking_id, recorded.is_first_view
        );
        Ok(recorded)
    }

    /// View statistics for a tracking id: total count, most recent
    /// timestamp and the most recent entries with redacted IPs. An unknown
    /// id yields zero-valued stats, not an error.
    pub fn get_view_stats(&self, tracking_id: &str) -> ViewStats {
        self.store.read(|data| {
            let mut matching: Vec<&View> = data
                .views
                .iter()
                .filter(|v| v.tracking_id == tracking_id)
                .collect();
            matching.sort_by(|a, b| (b.viewed_at, b.sequence_id).cmp(&(a.viewed_at, a.sequence_id)));

            ViewStats {
                tracking_id: tracking_id.to_string(),
                view_count: matching.len(),
                last_viewed_at: matching.first().map(|v| v.viewed_at),
                views: matching
                    .iter()
                    .take(VIEW_STATS_LIMIT)
                    .map(|v| ViewStatEntry {
                        timestamp: v.viewed_at,
                        ip_hash: v.ip_address.as_deref().map(|ip| self.hash_ip(ip)),
                        user_agent: v.user_agent.clone(),
                    })
                    .collect(),
            }
        })
    }

    /// Salted one-way hash of an IP address, truncated for display
    fn hash_ip(&self, ip_address: &str) -> String {
        let digest = Sha256::digest(format!("{}{}", self.ip_salt, ip_address).as_bytes());
        let mut hex = format!("{:x}", digest);
        hex.truncate(IP_HASH_LEN);
        hex
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> (tempfile::TempDir, ViewTrackerService) {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::load(dir.path().join("store.json"));
        (dir, ViewTrackerService::new(store, "test-salt"))
    }

    fn metadata(ip: &str) -> ViewMetadata {
        ViewMetadata {
            ip_address: Some(ip.to_string()),
            user_agent: Some("Mozilla/5.0".to_string()),
            referer: None,
        }
    }

    #[tokio::test]
    async fn test_first_view_flag_set_once_per_tracking_id() {
        let (_dir, service) = test_service();

        let first = service.record_view("ABC123", metadata("10.0.0.1")).unwrap();
        let second = service.record_view("ABC123", metadata("10.0.0.1")).unwrap();
        let other = service.record_view("XYZ789", metadata("10.0.0.2")).unwrap();

        assert!(first.is_first_view);
        assert!(!second.is_first_view);
        assert!(other.is_first_view);
    }

    #[tokio::test]
    async fn test_empty_tracking_id_is_rejected() {
        let (_dir, service) = test_service();

        assert!(service.record_view("", ViewMetadata::default()).is_err());
        assert!(service.record_view("   ", ViewMetadata::default()).is_err());
    }

    #[tokio::test]
    async fn test_sequence_ids_strictly_increase_across_tracking_ids() {
        let (_dir, service) = test_service();

        let a = service.record_view("A", ViewMetadata::default()).unwrap();
        let b = service.record_view("B", ViewMetadata::default()).unwrap();
        let c = service.record_view("A", ViewMetadata::default()).unwrap();

        assert!(a.view.sequence_id < b.view.sequence_id);
        assert!(b.view.sequence_id < c.view.sequence_id);
    }

    #[tokio::test]
    async fn test_view_creates_estimate_stub() {
        let (_dir, service) = test_service();

        let recorded = service.record_view("UNSEEN", ViewMetadata::default()).unwrap();

        assert_eq!(recorded.estimate.tracking_id, "UNSEEN");
        assert!(recorded.estimate.title.is_none());
    }

    #[tokio::test]
    async fn test_history_cap_evicts_oldest() {
        let (_dir, service) = test_service();

        for i in 0..(MAX_VIEW_HISTORY + 25) {
            service
                .record_view(&format!("T{}", i % 7), ViewMetadata::default())
                .unwrap();
        }

        let (len, first_seq, last_seq) = service.store.read(|data| {
            (
                data.views.len(),
                data.views.first().unwrap().sequence_id,
                data.views.last().unwrap().sequence_id,
            )
        });
        assert_eq!(len, MAX_VIEW_HISTORY);
        // The 25 oldest views were evicted
        assert_eq!(first_seq, 26);
        assert_eq!(last_seq, (MAX_VIEW_HISTORY + 25) as u64);
    }

    #[tokio::test]
    async fn test_stats_redact_ip_and_keep_user_agent() {
        let (_dir, service) = test_service();

        for _ in 0..3 {
            service.record_view("ABC123", metadata("203.0.113.9")).unwrap();
        }

        let stats = service.get_view_stats("ABC123");
        assert_eq!(stats.view_count, 3);
        assert!(stats.last_viewed_at.is_some());
        assert_eq!(stats.views.len(), 3);
        for entry in &stats.views {
            let hash = entry.ip_hash.as_deref().unwrap();
            assert_eq!(hash.len(), IP_HASH_LEN);
            assert!(!hash.contains("203.0.113.9"));
            assert_eq!(entry.user_agent.as_deref(), Some("Mozilla/5.0"));
        }
    }

    #[tokio::test]
    async fn test_stats_for_unknown_id_are_zero_valued() {
        let (_dir, service) = test_service();

        let stats = service.get_view_stats("NOPE");
        assert_eq!(stats.view_count, 0);
        assert!(stats.last_viewed_at.is_none());
        assert!(stats.views.is_empty());
    }

    #[tokio::test]
    async fn test_stats_are_capped_and_newest_first() {
        let (_dir, service) = test_service();

        for _ in 0..(VIEW_STATS_LIMIT + 10) {
            service.record_view("BUSY", ViewMetadata::default()).unwrap();
        }

        let stats = service.get_view_stats("BUSY");
        assert_eq!(stats.view_count, VIEW_STATS_LIMIT + 10);
        assert_eq!(stats.views.len(), VIEW_STATS_LIMIT);
        for pair in stats.views.windows(2) {
            assert!(pair[0].timestamp >= pair[1].timestamp);
        }
    }
}
