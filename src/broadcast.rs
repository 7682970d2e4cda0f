use std::sync::Arc;

use url::Url;

use crate::host::HostSurface;
use crate::protocol::{ClientMessage, QuickResponse};

/// Fan-out of a [`QuickResponse`] to every live client of the origin, with a
/// deterministic open-window fallback when none exist.
pub struct ClientBroadcaster<H: HostSurface> {
    host: Arc<H>,
}

impl<H: HostSurface> Clone for ClientBroadcaster<H> {
    fn clone(&self) -> Self {
        Self {
            host: Arc::clone(&self.host),
        }
    }
}

impl<H: HostSurface> ClientBroadcaster<H> {
    pub fn new(host: Arc<H>) -> Self {
        Self { host }
    }

    /// Relay a response to all live clients, including uncontrolled ones so
    /// freshly opened tabs are still reachable. Per-client post failures are
    /// isolated; an empty enumeration triggers the open-window fallback. No
    /// failure propagates out of this call.
    pub async fn relay(&self, response: &QuickResponse) {
        let clients = match self.host.list_clients(true).await {
            Ok(clients) => clients,
            Err(err) => {
                // Treating a failed enumeration as "no clients" would open a
                // spurious window; end the relay after logging instead.
                tracing::warn!(
                    target = "relay::broadcast",
                    error = %err,
                    "client enumeration failed, relay dropped"
                );
                return;
            }
        };

        if clients.is_empty() {
            let url = fallback_url(self.host.origin(), response);
            tracing::debug!(
                target = "relay::broadcast",
                url = %url,
                "no live clients, opening window with encoded response"
            );
            if let Err(err) = self.host.open_window(&url).await {
                tracing::warn!(
                    target = "relay::broadcast",
                    error = %err,
                    "fallback window open failed"
                );
            }
            return;
        }

        let message = ClientMessage::FollowupQuickResponse(response.clone());
        for client in &clients {
            if let Err(err) = self.host.post_message(client, &message).await {
                tracing::warn!(
                    target = "relay::broadcast",
                    client = %client.id,
                    error = %err,
                    "post to client failed"
                );
            }
        }
        tracing::debug!(
            target = "relay::broadcast",
            clients = clients.len(),
            "quick response relayed"
        );
    }
}

/// Launch URL carrying the full response when no live client exists:
/// `<origin>/?followup=<id>&effectiveness=<eff>&index=<n>`, percent-encoded.
pub fn fallback_url(origin: &Url, response: &QuickResponse) -> Url {
    let mut url = origin.clone();
    url.set_path("/");
    let query = format!(
        "followup={}&effectiveness={}&index={}",
        urlencoding::encode(response.incident_id.as_deref().unwrap_or("")),
        response.effectiveness.as_str(),
        response.follow_up_index
    );
    url.set_query(Some(&query));
    url
}
