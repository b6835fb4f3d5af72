//! Transcript messages.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The person using the widget.
    User,
    /// The assistant (including local notices such as the fallback message).
    Bot,
}

/// Message identifier.
///
/// Ids are handed out from a counter owned by the widget, so their order is
/// the display order. The counter survives resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "msg-{}", self.0)
    }
}

/// Message payload: plain text or a structured value shown as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageBody {
    Text(String),
    Structured(serde_json::Value),
}

impl MessageBody {
    /// Text form used for display.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Structured(value) => value.to_string(),
        }
    }
}

impl From<String> for MessageBody {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for MessageBody {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl fmt::Display for MessageBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// A single transcript entry. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub body: MessageBody,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub(crate) fn new(id: MessageId, body: impl Into<MessageBody>, sender: Sender) -> Self {
        Self {
            id,
            body: body.into(),
            sender,
            timestamp: Utc::now(),
        }
    }

    /// Display text of the message.
    #[must_use]
    pub fn text(&self) -> String {
        self.body.render()
    }

    /// Short clock time shown under a bubble, e.g. `03:07 PM`.
    #[must_use]
    pub fn clock_time(&self) -> String {
        self.timestamp.format("%I:%M %p").to_string()
    }
}

/// Render a backend answer for the transcript.
///
/// Strings are shown as-is; anything else is stringified as JSON.
#[must_use]
pub fn render_answer(answer: &serde_json::Value) -> String {
    match answer {
        serde_json::Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
