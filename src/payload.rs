use thiserror::Error;

use crate::protocol::NotificationRequest;

#[derive(Debug, Error)]
pub enum PayloadError {
    /// The push channel delivered bytes that do not decode as a notification
    /// payload. The push-handling operation ends without showing anything.
    #[error("malformed push payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Decode a raw push payload into a normalized [`NotificationRequest`],
/// applying the documented defaults for icon, badge, tag, interaction
/// requirement, and actions. No validation beyond structural decoding.
pub fn parse_push(raw: &[u8]) -> Result<NotificationRequest, PayloadError> {
    Ok(serde_json::from_slice(raw)?)
}
