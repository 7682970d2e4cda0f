use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::{json, Value};
use tracing_subscriber::{fmt, EnvFilter};

pub fn init_logging(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    // Diagnostics go to stderr; stdout carries the emitted protocol events.
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Emits side-effect events as JSON lines on stdout, or records them in
/// memory when built with [`capturing`](Self::capturing).
#[derive(Clone, Debug)]
pub struct EventEmitter {
    enabled: bool,
    capture: Option<Arc<Mutex<Vec<Value>>>>,
}

impl EventEmitter {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            capture: None,
        }
    }

    /// An emitter that records events instead of writing stdout. Clones share
    /// the same log, so a clone handed to the host stays observable.
    pub fn capturing() -> Self {
        Self {
            enabled: true,
            capture: Some(Arc::new(Mutex::new(Vec::new()))),
        }
    }

    /// Events recorded by a capturing emitter, in emission order.
    pub fn captured(&self) -> Vec<Value> {
        self.capture
            .as_ref()
            .map(|log| log.lock().clone())
            .unwrap_or_default()
    }

    /// Event type names recorded by a capturing emitter.
    pub fn captured_types(&self) -> Vec<String> {
        self.captured()
            .iter()
            .filter_map(|event| event.get("type").and_then(Value::as_str))
            .map(str::to_string)
            .collect()
    }

    pub fn emit<T: Serialize>(&self, event_type: &str, payload: T) {
        if !self.enabled {
            return;
        }

        let line = json!({
            "ts": Utc::now().to_rfc3339(),
            "type": event_type,
            "payload": payload,
        });

        if let Some(log) = &self.capture {
            log.lock().push(line);
            return;
        }

        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::EventEmitter;
    use serde_json::json;

    #[test]
    fn emit_disabled_is_noop() {
        let emitter = EventEmitter::new(false);
        emitter.emit("test", json!({"key": "value"}));
        assert!(emitter.captured().is_empty());
    }

    #[test]
    fn emit_enabled_no_panic() {
        let emitter = EventEmitter::new(true);
        emitter.emit("notification_shown", json!({"tag": "default"}));
        emitter.emit("window_opened", "plain string payload");
    }

    #[test]
    fn capturing_clones_share_one_log() {
        let emitter = EventEmitter::capturing();
        let clone = emitter.clone();
        clone.emit("notification_shown", json!({"tag": "default"}));
        clone.emit("window_opened", json!({"client": "win-1"}));

        assert_eq!(
            emitter.captured_types(),
            vec!["notification_shown".to_string(), "window_opened".to_string()]
        );
        assert_eq!(emitter.captured()[0]["payload"]["tag"], json!("default"));
    }
}
