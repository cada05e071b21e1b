use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, error};
use uuid::Uuid;

use crate::constants::MAX_NOTIFICATIONS;
use crate::errors::{Result, ValidationError};
use crate::estimates::Estimate;
use crate::notifications::notifications_model::{Notification, PushPayload};
use crate::notifications::notifications_traits::{EmailNotifier, PushNotifier};
use crate::store::DataStore;

/// Fans a first view out to the in-app feed and the configured push/email
/// channels. Channels are best-effort and fully isolated: no channel's
/// failure reaches another channel or the caller.
pub struct NotificationService {
    store: Arc<DataStore>,
    push_notifier: Option<Arc<dyn PushNotifier>>,
    email_notifier: Option<Arc<dyn EmailNotifier>>,
}

impl NotificationService {
    pub fn new(
        store: Arc<DataStore>,
        push_notifier: Option<Arc<dyn PushNotifier>>,
        email_notifier: Option<Arc<dyn EmailNotifier>>,
    ) -> Self {
        NotificationService {
            store,
            push_notifier,
            email_notifier,
        }
    }

    /// Dispatch notifications for a first view. Call only when the recorder
    /// reported `is_first_view`; repeat views must never re-notify.
    ///
    /// The in-app record is written before the outbound channels run, so it
    /// exists even if every delivery fails. The returned record is the
    /// in-app notification.
    pub async fn dispatch(&self, estimate: &Estimate, viewed_at: DateTime<Utc>) -> Notification {
        let title = estimate.display_title();
        let message = match &estimate.customer_name {
            Some(name) => format!("{} viewed \"{}\"", name, title),
            None => format!("Your estimate \"{}\" was viewed", title),
        };

        let notification = Notification {
            id: Uuid::new_v4().to_string(),
            tracking_id: estimate.tracking_id.clone(),
            estimate_title: title,
            customer_name: estimate.customer_name.clone(),
            message,
            viewed_at,
            is_read: false,
        };

        self.store.mutate(|data| {
            data.notifications.insert(0, notification.clone());
            data.notifications.truncate(MAX_NOTIFICATIONS);
        });

        // Independent best-effort channels; each logs its own failures.
        tokio::join!(
            self.send_push(&notification),
            self.send_email(&notification)
        );

        notification
    }

    async fn send_push(&self, notification: &Notification) {
        let notifier = match &self.push_notifier {
            Some(notifier) => notifier,
            None => return,
        };

        let devices = self.store.read(|data| data.devices.clone());
        if devices.is_empty() {
            debug!("no devices registered, skipping push");
            return;
        }

        let payload = PushPayload {
            title: "Estimate viewed".to_string(),
            body: notification.message.clone(),
        };

        for device in &devices {
            if let Err(e) = notifier.send(&device.token, &payload).await {
                error!("push to device {} failed: {}", device.token, e);
            }
        }
    }

    async fn send_email(&self, notification: &Notification) {
        let notifier = match &self.email_notifier {
            Some(notifier) => notifier,
            None => return,
        };

        let contractor = self.store.read(|data| data.contractor.clone());
        let contractor = match contractor {
            Some(contractor) => contractor,
            None => {
                debug!("no contractor registered, skipping email");
                return;
            }
        };

        let subject = format!("{} was viewed", notification.estimate_title);
        let body = format!(
            "{}\n\nViewed at: {}",
            notification.message,
            notification.viewed_at.to_rfc3339()
        );
        if let Err(e) = notifier.send(&contractor.email, &subject, &body).await {
            error!("email to {} failed: {}", contractor.email, e);
        }
    }

    /// The in-app feed, newest first.
    pub fn list_notifications(&self) -> Vec<Notification> {
        self.store.read(|data| data.notifications.clone())
    }

    pub fn unread_count(&self) -> usize {
        self.store
            .read(|data| data.notifications.iter().filter(|n| !n.is_read).count())
    }

    pub fn mark_read(&self, id: &str) -> Result<()> {
        self.store.mutate(|data| {
            match data.notifications.iter_mut().find(|n| n.id == id) {
                Some(notification) => {
                    notification.is_read = true;
                    Ok(())
                }
                None => Err(ValidationError::InvalidInput(format!(
                    "no notification with id '{}'",
                    id
                ))
                .into()),
            }
        })
    }

    pub fn mark_all_read(&self) {
        self.store.mutate(|data| {
            for notification in &mut data.notifications {
                notification.is_read = true;
            }
        });
    }
}
