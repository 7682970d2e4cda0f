use std::sync::Arc;

use crate::host::HostSurface;
use crate::protocol::NotificationRequest;

/// Thin façade over the host notification surface. Host failures are logged
/// and absorbed here so the interaction path never sees them.
pub struct NotificationPresenter<H: HostSurface> {
    host: Arc<H>,
}

impl<H: HostSurface> Clone for NotificationPresenter<H> {
    fn clone(&self) -> Self {
        Self {
            host: Arc::clone(&self.host),
        }
    }
}

impl<H: HostSurface> NotificationPresenter<H> {
    pub fn new(host: Arc<H>) -> Self {
        Self { host }
    }

    pub async fn show(&self, request: &NotificationRequest) {
        if let Err(err) = self.host.show_notification(request).await {
            tracing::warn!(
                target = "relay::presenter",
                tag = %request.tag,
                error = %err,
                "notification show failed"
            );
        }
    }

    /// Close every visible notification with this exact tag. Idempotent; a
    /// redundant close after the host already dropped the tag is harmless.
    pub async fn close_by_tag(&self, tag: &str) {
        if let Err(err) = self.host.close_notifications(tag).await {
            tracing::warn!(
                target = "relay::presenter",
                tag = %tag,
                error = %err,
                "notification close failed"
            );
        }
    }
}
