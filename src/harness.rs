use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tokio::task::JoinSet;

use crate::agent::{Agent, AgentEvent};
use crate::host::ClientKind;
use crate::protocol::{InteractionEvent, NotificationData, DEFAULT_TAG};
use crate::sim::SimHost;

/// One line of the harness protocol on stdin.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HarnessLine {
    Install,
    Activate,
    Push {
        #[serde(default)]
        payload: Option<Value>,
    },
    Click {
        #[serde(default)]
        tag: Option<String>,
        #[serde(default)]
        action: Option<String>,
        #[serde(default)]
        data: NotificationData,
    },
    ClientOpen {
        id: String,
        url: String,
        #[serde(default)]
        controlled: bool,
    },
    ClientClose {
        id: String,
    },
}

/// Drives the agent from harness protocol lines over a simulated host.
/// Anchored side effects from clicks (confirmation auto-close timers) settle
/// in the background so they do not block the input loop; [`drain`](Self::drain)
/// waits them out before shutdown.
pub struct Harness {
    agent: Agent<SimHost>,
    host: Arc<SimHost>,
    pending: JoinSet<()>,
}

impl Harness {
    pub fn new(host: Arc<SimHost>) -> Self {
        Self {
            agent: Agent::new(Arc::clone(&host)),
            host,
            pending: JoinSet::new(),
        }
    }

    /// Handle one raw input line. Blank and unparseable lines are skipped
    /// with a diagnostic; the loop keeps going.
    pub async fn handle_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        let parsed: HarnessLine = match serde_json::from_str(line) {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::warn!(target = "relay::harness", error = %err, "unparseable harness line");
                return;
            }
        };
        self.apply(parsed).await;
    }

    pub async fn apply(&mut self, line: HarnessLine) {
        match line {
            HarnessLine::ClientOpen {
                id,
                url,
                controlled,
            } => self.host.add_client(&id, &url, ClientKind::Window, controlled),
            HarnessLine::ClientClose { id } => self.host.remove_client(&id),
            HarnessLine::Install => {
                self.agent.dispatch(AgentEvent::Install).await.settle().await;
            }
            HarnessLine::Activate => {
                self.agent.dispatch(AgentEvent::Activate).await.settle().await;
            }
            HarnessLine::Push { payload } => {
                let raw = payload
                    .map(|value| serde_json::to_vec(&value).unwrap_or_else(|_| Vec::new()));
                self.agent.dispatch(AgentEvent::Push(raw)).await.settle().await;
            }
            HarnessLine::Click { tag, action, data } => {
                let interaction = InteractionEvent {
                    action_id: action,
                    tag: tag.unwrap_or_else(|| DEFAULT_TAG.to_string()),
                    data,
                };
                let ext = self
                    .agent
                    .dispatch(AgentEvent::NotificationClick(interaction))
                    .await;
                self.pending.spawn(ext.settle());
            }
        }
    }

    /// Wait for every anchored side effect from handled lines to settle.
    pub async fn drain(&mut self) {
        while self.pending.join_next().await.is_some() {}
    }
}
