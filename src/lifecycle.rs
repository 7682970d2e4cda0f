use std::sync::Arc;

use crate::host::HostSurface;

/// Install/activate handling: the agent activates immediately and takes
/// control of existing instances without waiting for their next navigation,
/// so relay and focus work right after an update.
pub struct LifecycleManager<H: HostSurface> {
    host: Arc<H>,
}

impl<H: HostSurface> LifecycleManager<H> {
    pub fn new(host: Arc<H>) -> Self {
        Self { host }
    }

    pub async fn on_install(&self) {
        tracing::info!(target = "relay::lifecycle", "installed, skipping waiting phase");
        if let Err(err) = self.host.skip_waiting().await {
            tracing::warn!(target = "relay::lifecycle", error = %err, "skip_waiting failed");
        }
    }

    pub async fn on_activate(&self) {
        tracing::info!(target = "relay::lifecycle", "activated, claiming clients");
        if let Err(err) = self.host.claim_clients().await {
            tracing::warn!(target = "relay::lifecycle", error = %err, "claim_clients failed");
        }
    }
}
