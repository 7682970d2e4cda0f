use std::cmp::Ordering;
use std::sync::Arc;

use url::Url;

use crate::host::{ClientHandle, ClientKind, HostSurface};
use crate::protocol::NotificationData;

/// Comparator for picking among multiple same-origin windows. Host
/// enumeration order is unspecified (often most-recently-used first); tests
/// and opinionated embedders can impose their own.
pub type ClientPreference = fn(&ClientHandle, &ClientHandle) -> Ordering;

/// Default handling for a plain notification click: focus an existing
/// same-origin window, or open a new one pointed at the incident.
pub struct WindowFocusResolver<H: HostSurface> {
    host: Arc<H>,
    preference: Option<ClientPreference>,
}

impl<H: HostSurface> Clone for WindowFocusResolver<H> {
    fn clone(&self) -> Self {
        Self {
            host: Arc::clone(&self.host),
            preference: self.preference,
        }
    }
}

impl<H: HostSurface> WindowFocusResolver<H> {
    pub fn new(host: Arc<H>) -> Self {
        Self {
            host,
            preference: None,
        }
    }

    pub fn with_preference(mut self, preference: ClientPreference) -> Self {
        self.preference = Some(preference);
        self
    }

    /// Focus the first same-origin window client, or open a launch URL when
    /// none exists. First-match wins; without a preference the host's
    /// enumeration order decides. Host failures are logged, never propagated.
    pub async fn focus_or_open(&self, data: &NotificationData) {
        let clients = match self.host.list_clients(false).await {
            Ok(clients) => clients,
            Err(err) => {
                tracing::warn!(
                    target = "relay::focus",
                    error = %err,
                    "client enumeration failed"
                );
                Vec::new()
            }
        };

        let origin = self.host.origin();
        let mut windows: Vec<&ClientHandle> = clients
            .iter()
            .filter(|client| client.kind == ClientKind::Window && client.same_origin(origin))
            .collect();
        if let Some(preference) = self.preference {
            windows.sort_by(|a, b| preference(a, b));
        }

        if let Some(window) = windows.first() {
            tracing::debug!(target = "relay::focus", client = %window.id, "focusing window");
            if let Err(err) = self.host.focus_client(window).await {
                tracing::warn!(
                    target = "relay::focus",
                    client = %window.id,
                    error = %err,
                    "window focus failed"
                );
            }
            return;
        }

        let url = launch_url(origin, data);
        tracing::debug!(target = "relay::focus", url = %url, "opening window");
        if let Err(err) = self.host.open_window(&url).await {
            tracing::warn!(target = "relay::focus", error = %err, "window open failed");
        }
    }
}

/// Launch URL for a plain click: `<origin>/?followup=<id>&index=<n>` when the
/// notification carries an incident id, the bare origin root otherwise. Query
/// components are percent-encoded.
pub fn launch_url(origin: &Url, data: &NotificationData) -> Url {
    let mut url = origin.clone();
    url.set_path("/");
    url.set_query(None);
    if let Some(incident_id) = &data.incident_id {
        let query = format!(
            "followup={}&index={}",
            urlencoding::encode(incident_id),
            data.follow_up_index
        );
        url.set_query(Some(&query));
    }
    url
}
