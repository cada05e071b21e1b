pub mod notifications_model;
pub mod notifications_service;
pub mod notifications_traits;

pub use notifications_model::{Notification, PushPayload};
pub use notifications_service::NotificationService;
pub use notifications_traits::{EmailNotifier, PushNotifier};
