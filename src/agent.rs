use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinSet;

use crate::host::HostSurface;
use crate::lifecycle::LifecycleManager;
use crate::payload::parse_push;
use crate::presenter::NotificationPresenter;
use crate::protocol::InteractionEvent;
use crate::router::ActionRouter;

/// The enumerated event kinds this agent handles.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentEvent {
    Install,
    Activate,
    /// A push wake-up; `None` when the push carries no payload.
    Push(Option<Vec<u8>>),
    NotificationClick(InteractionEvent),
}

/// Keep-alive anchor for one event: fire-and-forget side effects started
/// while handling the event (the confirmation auto-close timer) are spawned
/// here, and the event is not complete until [`settle`](Self::settle) joins
/// them. Dropping the extension instead downgrades anchored work to
/// best-effort; the host may tear it down mid-flight.
#[derive(Default)]
pub struct EventExtension {
    tasks: JoinSet<()>,
}

impl EventExtension {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wait_until<F>(&mut self, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tasks.spawn(work);
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Wait for every anchored task to finish.
    pub async fn settle(mut self) {
        while let Some(result) = self.tasks.join_next().await {
            if let Err(err) = result {
                tracing::warn!(target = "relay::agent", error = %err, "anchored task failed");
            }
        }
    }
}

/// The background relay agent: typed event dispatch over one injected host
/// surface. Nothing in here returns an error; every internal failure degrades
/// to a logged diagnostic per the propagation policy.
pub struct Agent<H: HostSurface> {
    presenter: NotificationPresenter<H>,
    router: ActionRouter<H>,
    lifecycle: LifecycleManager<H>,
}

impl<H: HostSurface> Agent<H> {
    pub fn new(host: Arc<H>) -> Self {
        Self {
            presenter: NotificationPresenter::new(Arc::clone(&host)),
            router: ActionRouter::new(Arc::clone(&host)),
            lifecycle: LifecycleManager::new(host),
        }
    }

    pub fn with_router(mut self, router: ActionRouter<H>) -> Self {
        self.router = router;
        self
    }

    /// Run the handler for one event. The returned [`EventExtension`] carries
    /// any still-pending anchored work; callers settle it to honor the
    /// event's extension lifetime.
    pub async fn dispatch(&self, event: AgentEvent) -> EventExtension {
        let mut ext = EventExtension::new();
        match event {
            AgentEvent::Install => self.lifecycle.on_install().await,
            AgentEvent::Activate => self.lifecycle.on_activate().await,
            AgentEvent::Push(payload) => self.handle_push(payload.as_deref()).await,
            AgentEvent::NotificationClick(interaction) => {
                self.router.handle_click(interaction, &mut ext).await;
            }
        }
        ext
    }

    async fn handle_push(&self, payload: Option<&[u8]>) {
        let Some(raw) = payload else {
            tracing::debug!(target = "relay::agent", "push without payload, nothing to show");
            return;
        };
        match parse_push(raw) {
            Ok(request) => self.presenter.show(&request).await,
            Err(err) => {
                tracing::warn!(target = "relay::agent", error = %err, "push payload dropped");
            }
        }
    }
}
