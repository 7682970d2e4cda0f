//! # followup-relay
//!
//! A background notification-response relay: receives push-originated
//! notifications, lets the user answer via inline quick-action buttons, and
//! relays the response to every live application instance of the origin. When
//! no instance is open, the response is carried losslessly in the launch URL
//! of a new window. A transient confirmation notification is shown and closed
//! again after three seconds.
//!
//! The host environment (notification surface, client enumeration, message
//! posting, window management, lifecycle control) is injected through the
//! [`HostSurface`] capability trait; [`sim::SimHost`] is an in-process
//! implementation used by the binary harness and the tests.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use followup_relay::{Agent, AgentEvent, InteractionEvent, NotificationData, SimHost};
//! use url::Url;
//!
//! #[tokio::main]
//! async fn main() {
//!     let host = Arc::new(SimHost::new(Url::parse("https://app.example").unwrap()));
//!     let agent = Agent::new(Arc::clone(&host));
//!
//!     // A push arrives and is shown.
//!     let payload = br#"{"title":"Follow-up","body":"How is it going?",
//!         "data":{"incidentId":"abc123"},
//!         "actions":[{"id":"resolved","label":"Resolved"}]}"#;
//!     agent.dispatch(AgentEvent::Push(Some(payload.to_vec()))).await.settle().await;
//!
//!     // The user clicks "Resolved"; the response is relayed and a
//!     // self-expiring confirmation is shown.
//!     let click = InteractionEvent {
//!         action_id: Some("resolved".to_string()),
//!         tag: "default".to_string(),
//!         data: NotificationData {
//!             incident_id: Some("abc123".to_string()),
//!             ..Default::default()
//!         },
//!     };
//!     agent.dispatch(AgentEvent::NotificationClick(click)).await.settle().await;
//! }
//! ```

pub mod agent;
pub mod broadcast;
pub mod config;
pub mod events;
pub mod focus;
pub mod harness;
pub mod host;
pub mod lifecycle;
pub mod payload;
pub mod presenter;
pub mod protocol;
pub mod router;
pub mod sim;

// Re-export main types
pub use agent::{Agent, AgentEvent, EventExtension};
pub use broadcast::ClientBroadcaster;
pub use focus::WindowFocusResolver;
pub use harness::{Harness, HarnessLine};
pub use host::{ClientHandle, ClientKind, HostError, HostSurface};
pub use lifecycle::LifecycleManager;
pub use payload::{parse_push, PayloadError};
pub use presenter::NotificationPresenter;
pub use protocol::{
    ClientMessage, Effectiveness, InteractionEvent, NotificationData, NotificationRequest,
    QuickResponse,
};
pub use router::{classify, ActionRouter, Route};
pub use sim::SimHost;
