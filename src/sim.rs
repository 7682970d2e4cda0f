use std::collections::HashSet;

use parking_lot::Mutex;
use serde_json::json;
use url::Url;

use crate::events::EventEmitter;
use crate::host::{ClientHandle, ClientKind, HostError, HostResult, HostSurface};
use crate::protocol::{ClientMessage, NotificationData, NotificationRequest};

/// In-process host surface: records every side effect, supports fault
/// injection, and optionally emits side-effect events as JSON lines. Drives
/// the `followup-relay` binary and the integration tests.
pub struct SimHost {
    origin: Url,
    emitter: Option<EventEmitter>,
    state: Mutex<SimState>,
}

#[derive(Default)]
struct SimState {
    clients: Vec<ClientHandle>,
    notifications: Vec<NotificationRequest>,
    posted: Vec<(String, ClientMessage)>,
    opened: Vec<Url>,
    focused: Vec<String>,
    skip_waiting_calls: u32,
    claim_calls: u32,
    fail_posts_to: HashSet<String>,
    next_show_failure: Option<String>,
    opened_counter: u32,
}

impl SimHost {
    pub fn new(origin: Url) -> Self {
        Self {
            origin,
            emitter: None,
            state: Mutex::new(SimState::default()),
        }
    }

    pub fn with_emitter(mut self, emitter: EventEmitter) -> Self {
        self.emitter = Some(emitter);
        self
    }

    pub fn add_client(&self, id: &str, url: &str, kind: ClientKind, controlled: bool) {
        self.state.lock().clients.push(ClientHandle {
            id: id.to_string(),
            url: url.to_string(),
            kind,
            controlled,
        });
    }

    pub fn remove_client(&self, id: &str) {
        self.state.lock().clients.retain(|client| client.id != id);
    }

    /// Test helper: place a minimal notification with the given tag on the
    /// surface, as if an earlier push had shown it.
    pub fn show_tagged(&self, tag: &str) {
        self.state.lock().notifications.push(NotificationRequest {
            title: "Follow-up".to_string(),
            body: String::new(),
            icon: String::new(),
            badge: String::new(),
            tag: tag.to_string(),
            require_interaction: true,
            actions: Vec::new(),
            data: NotificationData::default(),
        });
    }

    /// Make the next `show_notification` call fail with this reason.
    pub fn fail_next_show(&self, reason: &str) {
        self.state.lock().next_show_failure = Some(reason.to_string());
    }

    /// Make every post to this client id fail.
    pub fn fail_posts_to(&self, id: &str) {
        self.state.lock().fail_posts_to.insert(id.to_string());
    }

    pub fn visible_notifications(&self) -> Vec<NotificationRequest> {
        self.state.lock().notifications.clone()
    }

    pub fn posted_messages(&self) -> Vec<(String, ClientMessage)> {
        self.state.lock().posted.clone()
    }

    pub fn opened_windows(&self) -> Vec<Url> {
        self.state.lock().opened.clone()
    }

    pub fn focused_clients(&self) -> Vec<String> {
        self.state.lock().focused.clone()
    }

    pub fn list_all_clients(&self) -> Vec<ClientHandle> {
        self.state.lock().clients.clone()
    }

    pub fn skip_waiting_calls(&self) -> u32 {
        self.state.lock().skip_waiting_calls
    }

    pub fn claim_calls(&self) -> u32 {
        self.state.lock().claim_calls
    }

    fn emit<T: serde::Serialize>(&self, event_type: &str, payload: T) {
        if let Some(emitter) = &self.emitter {
            emitter.emit(event_type, payload);
        }
    }
}

impl HostSurface for SimHost {
    fn origin(&self) -> &Url {
        &self.origin
    }

    async fn show_notification(&self, request: &NotificationRequest) -> HostResult<()> {
        {
            let mut state = self.state.lock();
            if let Some(reason) = state.next_show_failure.take() {
                return Err(HostError::Notification(reason));
            }
            // Same-tag notifications replace each other, as on a real surface.
            state.notifications.retain(|n| n.tag != request.tag);
            state.notifications.push(request.clone());
        }
        self.emit(
            "notification_shown",
            json!({"tag": request.tag, "title": request.title}),
        );
        Ok(())
    }

    async fn close_notifications(&self, tag: &str) -> HostResult<()> {
        let closed = {
            let mut state = self.state.lock();
            let before = state.notifications.len();
            state.notifications.retain(|n| n.tag != tag);
            before - state.notifications.len()
        };
        self.emit("notification_closed", json!({"tag": tag, "closed": closed}));
        Ok(())
    }

    async fn list_clients(&self, include_uncontrolled: bool) -> HostResult<Vec<ClientHandle>> {
        let state = self.state.lock();
        Ok(state
            .clients
            .iter()
            .filter(|client| include_uncontrolled || client.controlled)
            .cloned()
            .collect())
    }

    async fn post_message(&self, client: &ClientHandle, message: &ClientMessage) -> HostResult<()> {
        {
            let mut state = self.state.lock();
            if state.fail_posts_to.contains(&client.id) {
                return Err(HostError::Post {
                    client_id: client.id.clone(),
                    reason: "injected fault".to_string(),
                });
            }
            state.posted.push((client.id.clone(), message.clone()));
        }
        self.emit(
            "message_posted",
            json!({"client": client.id, "message": message}),
        );
        Ok(())
    }

    async fn open_window(&self, url: &Url) -> HostResult<()> {
        let id = {
            let mut state = self.state.lock();
            state.opened.push(url.clone());
            state.opened_counter += 1;
            let id = format!("win-{}", state.opened_counter);
            // A newly opened window is live but not yet under control.
            state.clients.push(ClientHandle {
                id: id.clone(),
                url: url.to_string(),
                kind: ClientKind::Window,
                controlled: false,
            });
            id
        };
        self.emit("window_opened", json!({"client": id, "url": url.as_str()}));
        Ok(())
    }

    async fn focus_client(&self, client: &ClientHandle) -> HostResult<()> {
        self.state.lock().focused.push(client.id.clone());
        self.emit("window_focused", json!({"client": client.id}));
        Ok(())
    }

    async fn skip_waiting(&self) -> HostResult<()> {
        self.state.lock().skip_waiting_calls += 1;
        self.emit("waiting_skipped", json!({}));
        Ok(())
    }

    async fn claim_clients(&self) -> HostResult<()> {
        let claimed = {
            let mut state = self.state.lock();
            state.claim_calls += 1;
            for client in &mut state.clients {
                client.controlled = true;
            }
            state.clients.len()
        };
        self.emit("clients_claimed", json!({"clients": claimed}));
        Ok(())
    }
}
