use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Icon and badge used when the push payload does not name one.
pub const DEFAULT_ICON: &str = "/icons/notification.png";

/// Tag applied to notifications whose payload does not carry one. Notifications
/// sharing a tag replace each other on the host surface.
pub const DEFAULT_TAG: &str = "default";

/// Tag prefix for confirmation notifications; the incident id is appended so at
/// most one confirmation per incident is visible at a time.
pub const RESPONSE_TAG_PREFIX: &str = "response-";

pub const CONFIRMATION_TITLE: &str = "Thanks!";
pub const CONFIRMATION_BODY: &str = "Your feedback was saved.";

/// How long a confirmation notification stays visible before the agent closes it.
pub const CONFIRMATION_TTL_MS: u64 = 3_000;

/// An inline quick-action button attached to a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    pub id: String,
    pub label: String,
}

/// The opaque `data` bag carried from the push payload into the displayed
/// notification and, on a quick-action click, into the relayed response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_id: Option<String>,
    #[serde(default, deserialize_with = "de_follow_up_index")]
    pub follow_up_index: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A notification normalized from a push payload, ready for the host surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    pub title: String,
    pub body: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default = "default_icon")]
    pub badge: String,
    #[serde(default = "default_tag")]
    pub tag: String,
    #[serde(default = "default_true")]
    pub require_interaction: bool,
    #[serde(default)]
    pub actions: Vec<NotificationAction>,
    #[serde(default)]
    pub data: NotificationData,
}

/// A user interaction with a displayed notification. `action_id` is `None`
/// when the notification body was clicked rather than an action button.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionEvent {
    #[serde(default)]
    pub action_id: Option<String>,
    pub tag: String,
    #[serde(default)]
    pub data: NotificationData,
}

/// The three recognized quick-action outcomes. Any other action id never maps
/// to a response; it degrades to the default open/focus behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effectiveness {
    Resolved,
    Improved,
    NoChange,
}

impl Effectiveness {
    pub fn from_action_id(id: &str) -> Option<Self> {
        match id {
            "resolved" => Some(Self::Resolved),
            "improved" => Some(Self::Improved),
            "no_change" => Some(Self::NoChange),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resolved => "resolved",
            Self::Improved => "improved",
            Self::NoChange => "no_change",
        }
    }
}

/// The response derived from a recognized quick-action click.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_id: Option<String>,
    pub effectiveness: Effectiveness,
    pub follow_up_index: u32,
}

/// The wire payload posted to live application instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ClientMessage {
    #[serde(rename = "FOLLOWUP_QUICK_RESPONSE")]
    FollowupQuickResponse(QuickResponse),
}

/// Tag of the confirmation notification for an incident.
pub fn response_tag(incident_id: Option<&str>) -> String {
    format!("{RESPONSE_TAG_PREFIX}{}", incident_id.unwrap_or_default())
}

/// The transient confirmation shown after a quick response is relayed. No
/// actions, does not require interaction, closed by the agent after
/// [`CONFIRMATION_TTL_MS`].
pub fn confirmation(incident_id: Option<&str>) -> NotificationRequest {
    NotificationRequest {
        title: CONFIRMATION_TITLE.to_string(),
        body: CONFIRMATION_BODY.to_string(),
        icon: DEFAULT_ICON.to_string(),
        badge: DEFAULT_ICON.to_string(),
        tag: response_tag(incident_id),
        require_interaction: false,
        actions: Vec::new(),
        data: NotificationData::default(),
    }
}

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

fn default_tag() -> String {
    DEFAULT_TAG.to_string()
}

fn default_true() -> bool {
    true
}

// Push payloads may carry followUpIndex as null, a float, or a negative
// number; the transmitted value must always be a finite non-negative integer,
// so anything unusable coerces to 0 instead of failing the whole parse.
fn de_follow_up_index<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(coerce_follow_up_index(value.as_ref()))
}

fn coerce_follow_up_index(value: Option<&Value>) -> u32 {
    value
        .and_then(Value::as_u64)
        .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
        .unwrap_or(0)
}
