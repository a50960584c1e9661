use async_trait::async_trait;
use tracing::info;

use shared_models::notification::{Notification, Recipient};

/// Delivery seam for user notifications. Storage and transport live behind
/// implementations of this trait.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: Notification);
}

/// Emits each notification as a structured log event.
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn notify(&self, notification: Notification) {
        let recipient = match &notification.recipient {
            Recipient::User(id) => id.as_str(),
            Recipient::Admins => "admins",
        };

        info!(
            recipient,
            kind = ?notification.kind,
            path = %notification.on_click_path,
            "Notification: {}",
            notification.message
        );
    }
}
