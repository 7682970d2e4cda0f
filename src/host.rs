use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::protocol::{ClientMessage, NotificationRequest};

/// Failures surfaced by the host environment. Callers on the interaction path
/// catch and log these; they never propagate past a component boundary.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("notification surface failure: {0}")]
    Notification(String),
    #[error("client enumeration failed: {0}")]
    Enumerate(String),
    #[error("post to client {client_id} failed: {reason}")]
    Post { client_id: String, reason: String },
    #[error("window operation failed: {0}")]
    Window(String),
    #[error("lifecycle control failed: {0}")]
    Lifecycle(String),
}

pub type HostResult<T> = std::result::Result<T, HostError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientKind {
    Window,
    Worker,
}

/// A live application instance reachable for message posting or focus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientHandle {
    pub id: String,
    pub url: String,
    pub kind: ClientKind,
    /// Whether this instance is already under the agent's control. Freshly
    /// opened or not-yet-claimed tabs are live but uncontrolled.
    pub controlled: bool,
}

impl ClientHandle {
    pub fn same_origin(&self, origin: &Url) -> bool {
        Url::parse(&self.url).is_ok_and(|url| url.origin() == origin.origin())
    }
}

/// Capability object over the host environment: notification surface, client
/// enumeration and messaging, window management, and lifecycle control.
///
/// Every method is a suspension point; futures are `Send` so fire-and-forget
/// work (the confirmation auto-close) can be anchored to a spawned task.
pub trait HostSurface: Send + Sync + 'static {
    /// The origin this agent is scoped to. Launch URLs and client matching
    /// are derived from it.
    fn origin(&self) -> &Url;

    /// Show a notification. A visible notification with the same tag is
    /// replaced by the host.
    fn show_notification(
        &self,
        request: &NotificationRequest,
    ) -> impl Future<Output = HostResult<()>> + Send;

    /// Close every visible notification carrying exactly this tag. No-op when
    /// none match.
    fn close_notifications(&self, tag: &str) -> impl Future<Output = HostResult<()>> + Send;

    /// Enumerate live clients of this origin. `include_uncontrolled` must
    /// reach instances the agent has not claimed yet.
    fn list_clients(
        &self,
        include_uncontrolled: bool,
    ) -> impl Future<Output = HostResult<Vec<ClientHandle>>> + Send;

    /// Post a structured message to one client.
    fn post_message(
        &self,
        client: &ClientHandle,
        message: &ClientMessage,
    ) -> impl Future<Output = HostResult<()>> + Send;

    /// Open a new window at the given URL.
    fn open_window(&self, url: &Url) -> impl Future<Output = HostResult<()>> + Send;

    /// Bring an existing window client to the foreground.
    fn focus_client(&self, client: &ClientHandle) -> impl Future<Output = HostResult<()>> + Send;

    /// Skip the staged-rollover waiting phase so this agent version activates
    /// immediately.
    fn skip_waiting(&self) -> impl Future<Output = HostResult<()>> + Send;

    /// Take control of all existing instances without waiting for their next
    /// navigation.
    fn claim_clients(&self) -> impl Future<Output = HostResult<()>> + Send;
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::{ClientHandle, ClientKind};

    fn handle(url: &str) -> ClientHandle {
        ClientHandle {
            id: "c1".to_string(),
            url: url.to_string(),
            kind: ClientKind::Window,
            controlled: true,
        }
    }

    #[test]
    fn same_origin_matches_scheme_host_port() {
        let origin = Url::parse("https://app.example").unwrap();
        assert!(handle("https://app.example/inbox").same_origin(&origin));
        assert!(!handle("https://other.example/").same_origin(&origin));
        assert!(!handle("http://app.example/").same_origin(&origin));
        assert!(!handle("not a url").same_origin(&origin));
    }
}
