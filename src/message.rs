//! Message records received from the channel endpoint.
//!
//! A [`Message`] is owned by the endpoint: the view receives it, keys it with a
//! fresh [`MessageKey`] and never mutates it afterwards.
//!
//! # Example
//!
//! ```rust
//! use messages_view::message::Message;
//!
//! let raw = r#"[{"sender":"Alice","content":"Hi","timestamp":"2024-01-01T00:00:00Z"}]"#;
//! let messages: Vec<Message> = serde_json::from_str(raw).unwrap();
//! assert_eq!(messages[0].sender, "Alice");
//! ```

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A single message as published by the channel endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Author of the message.
    #[serde(default, deserialize_with = "display_text")]
    pub sender: String,
    /// Message body.
    #[serde(default, deserialize_with = "display_text")]
    pub content: String,
    /// When the message was produced, rendered verbatim.
    #[serde(default, deserialize_with = "display_text")]
    pub timestamp: String,
    /// Free-form metadata some channels attach to a message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<Value>,
}

impl Message {
    /// Create a message without extra metadata.
    pub fn new(
        sender: impl Into<String>,
        content: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            sender: sender.into(),
            content: content.into(),
            timestamp: timestamp.into(),
            extra: None,
        }
    }
}

/// Accepts any JSON scalar and keeps its display text.
///
/// Strings pass through, numbers and booleans keep their JSON spelling and
/// `null` becomes empty text. Arrays and objects have no text form.
fn display_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Null => Ok(String::new()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Array(_) | Value::Object(_) => Err(serde::de::Error::custom(
            "expected a string or scalar value",
        )),
    }
}

/// Stable identity assigned to a message when the view receives it.
///
/// Keys are independent of list position, so two identical records still get
/// distinct keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageKey(Uuid);

impl MessageKey {
    /// Generate a fresh key.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A received message paired with its display key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyedMessage {
    pub key: MessageKey,
    #[serde(flatten)]
    pub message: Message,
}

impl KeyedMessage {
    /// Key every message in received order.
    pub fn key_all(messages: Vec<Message>) -> Vec<Self> {
        messages
            .into_iter()
            .map(|message| Self {
                key: MessageKey::generate(),
                message,
            })
            .collect()
    }
}
