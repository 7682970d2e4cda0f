use std::sync::Arc;
use std::time::Duration;

use crate::agent::EventExtension;
use crate::broadcast::ClientBroadcaster;
use crate::focus::WindowFocusResolver;
use crate::host::HostSurface;
use crate::presenter::NotificationPresenter;
use crate::protocol::{
    confirmation, Effectiveness, InteractionEvent, QuickResponse, CONFIRMATION_TTL_MS,
};

/// How a single interaction event is handled. Classification is total and
/// deterministic; unrecognized action ids degrade to the default open/focus
/// behavior rather than being dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Relay(QuickResponse),
    OpenOrFocus,
}

/// Classify one interaction event. A quick response exists iff the action id
/// is one of the three recognized values.
pub fn classify(event: &InteractionEvent) -> Route {
    match event
        .action_id
        .as_deref()
        .and_then(Effectiveness::from_action_id)
    {
        Some(effectiveness) => Route::Relay(QuickResponse {
            incident_id: event.data.incident_id.clone(),
            effectiveness,
            follow_up_index: event.data.follow_up_index,
        }),
        None => Route::OpenOrFocus,
    }
}

/// Per-event state machine driving the other components. Holds no state
/// across events; each interaction is handled independently.
pub struct ActionRouter<H: HostSurface> {
    presenter: NotificationPresenter<H>,
    broadcaster: ClientBroadcaster<H>,
    resolver: WindowFocusResolver<H>,
}

impl<H: HostSurface> ActionRouter<H> {
    pub fn new(host: Arc<H>) -> Self {
        Self {
            presenter: NotificationPresenter::new(Arc::clone(&host)),
            broadcaster: ClientBroadcaster::new(Arc::clone(&host)),
            resolver: WindowFocusResolver::new(host),
        }
    }

    pub fn with_resolver(mut self, resolver: WindowFocusResolver<H>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Handle one notification click. The originating notification is closed
    /// first, unconditionally. On the relay branch the confirmation is shown
    /// regardless of relay outcome, and its auto-close timer is anchored to
    /// the event's extension lifetime.
    pub async fn handle_click(&self, event: InteractionEvent, ext: &mut EventExtension) {
        self.presenter.close_by_tag(&event.tag).await;

        match classify(&event) {
            Route::Relay(response) => {
                tracing::info!(
                    target = "relay::router",
                    incident = response.incident_id.as_deref().unwrap_or(""),
                    effectiveness = response.effectiveness.as_str(),
                    "relaying quick response"
                );
                self.broadcaster.relay(&response).await;

                let note = confirmation(response.incident_id.as_deref());
                let tag = note.tag.clone();
                self.presenter.show(&note).await;

                let presenter = self.presenter.clone();
                ext.wait_until(async move {
                    tokio::time::sleep(Duration::from_millis(CONFIRMATION_TTL_MS)).await;
                    presenter.close_by_tag(&tag).await;
                });
            }
            Route::OpenOrFocus => {
                tracing::debug!(
                    target = "relay::router",
                    action = event.action_id.as_deref().unwrap_or(""),
                    "default click handling"
                );
                self.resolver.focus_or_open(&event.data).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use url::Url;

    use super::{classify, ActionRouter, Route};
    use crate::agent::EventExtension;
    use crate::host::ClientKind;
    use crate::protocol::{Effectiveness, InteractionEvent, NotificationData};
    use crate::sim::SimHost;

    fn click(action_id: Option<&str>, incident_id: Option<&str>) -> InteractionEvent {
        InteractionEvent {
            action_id: action_id.map(str::to_string),
            tag: "default".to_string(),
            data: NotificationData {
                incident_id: incident_id.map(str::to_string),
                follow_up_index: 2,
                extra: Default::default(),
            },
        }
    }

    fn router() -> (Arc<SimHost>, ActionRouter<SimHost>) {
        let host = Arc::new(SimHost::new(Url::parse("https://app.example").unwrap()));
        let router = ActionRouter::new(Arc::clone(&host));
        (host, router)
    }

    #[test]
    fn recognized_ids_relay() {
        for (id, expected) in [
            ("resolved", Effectiveness::Resolved),
            ("improved", Effectiveness::Improved),
            ("no_change", Effectiveness::NoChange),
        ] {
            match classify(&click(Some(id), Some("abc"))) {
                Route::Relay(response) => {
                    assert_eq!(response.effectiveness, expected);
                    assert_eq!(response.incident_id.as_deref(), Some("abc"));
                    assert_eq!(response.follow_up_index, 2);
                }
                Route::OpenOrFocus => panic!("{id} should relay"),
            }
        }
    }

    #[test]
    fn body_click_and_unknown_ids_take_default_branch() {
        assert_eq!(classify(&click(None, Some("abc"))), Route::OpenOrFocus);
        assert_eq!(classify(&click(Some(""), Some("abc"))), Route::OpenOrFocus);
        assert_eq!(
            classify(&click(Some("snooze"), Some("abc"))),
            Route::OpenOrFocus
        );
    }

    #[tokio::test]
    async fn originating_notification_closes_on_every_branch() {
        let (host, router) = router();
        host.show_tagged("default");

        let mut ext = EventExtension::new();
        router.handle_click(click(Some("snooze"), None), &mut ext).await;
        ext.settle().await;

        assert!(host
            .visible_notifications()
            .iter()
            .all(|n| n.tag != "default"));
    }

    #[tokio::test(start_paused = true)]
    async fn relay_branch_shows_confirmation_then_auto_closes() {
        let (host, router) = router();
        host.add_client("c1", "https://app.example/", ClientKind::Window, true);

        let mut ext = EventExtension::new();
        router
            .handle_click(click(Some("resolved"), Some("abc123")), &mut ext)
            .await;
        // Let the anchored timer task register its sleep at t0.
        tokio::task::yield_now().await;

        assert_eq!(host.posted_messages().len(), 1);
        let visible = host.visible_notifications();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].tag, "response-abc123");
        assert!(!visible[0].require_interaction);

        // Not yet closed short of the 3 s deadline.
        tokio::time::advance(std::time::Duration::from_millis(2_999)).await;
        tokio::task::yield_now().await;
        assert_eq!(host.visible_notifications().len(), 1);

        let started = tokio::time::Instant::now();
        ext.settle().await;
        assert!(started.elapsed() >= std::time::Duration::from_millis(1));
        assert!(host.visible_notifications().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn confirmation_appears_even_when_relay_fails() {
        let (host, router) = router();
        host.add_client("c1", "https://app.example/", ClientKind::Window, true);
        host.fail_posts_to("c1");

        let mut ext = EventExtension::new();
        router
            .handle_click(click(Some("improved"), Some("abc")), &mut ext)
            .await;

        assert!(host.posted_messages().is_empty());
        assert_eq!(host.visible_notifications().len(), 1);
        ext.settle().await;
    }

    #[tokio::test]
    async fn default_branch_never_posts() {
        let (host, router) = router();
        host.add_client("c1", "https://app.example/", ClientKind::Window, true);

        let mut ext = EventExtension::new();
        router.handle_click(click(None, Some("xyz")), &mut ext).await;
        ext.settle().await;

        assert!(host.posted_messages().is_empty());
        assert_eq!(host.focused_clients(), vec!["c1".to_string()]);
    }
}
