use async_trait::async_trait;

use crate::errors::NotificationError;
use crate::notifications::notifications_model::PushPayload;

/// Abstract push channel; the transport behind it (APNs, FCM, ...) is a
/// deployment concern.
#[async_trait]
pub trait PushNotifier: Send + Sync {
    async fn send(
        &self,
        device_token: &str,
        payload: &PushPayload,
    ) -> std::result::Result<(), NotificationError>;
}

/// Abstract email channel.
#[async_trait]
pub trait EmailNotifier: Send + Sync {
    async fn send(
        &self,
        to_address: &str,
        subject: &str,
        body: &str,
    ) -> std::result::Result<(), NotificationError>;
}
