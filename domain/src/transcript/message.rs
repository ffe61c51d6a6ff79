//! Chat message types as exchanged with the chat service.
//!
//! On the wire a message looks like:
//!
//! ```json
//! { "role": "assistant", "content": [{ "text": "Hello!" }] }
//! ```
//!
//! `content` is a sequence of blocks. Only text blocks exist today, but
//! other kinds are accepted and carried through untouched so newer service
//! versions never break the client.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// One-letter badge shown next to a message (`U` / `A`).
    pub fn badge(&self) -> char {
        match self {
            Role::User => 'U',
            Role::Assistant => 'A',
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single block of message content.
///
/// Blocks are matched structurally: an object with a string `text` field
/// (and either no `type` or `"type": "text"`) is a text block. Anything
/// else is kept verbatim as [`ContentBlock::Other`] and skipped on render.
///
/// # Examples
///
/// ```
/// use chatsync_domain::ContentBlock;
///
/// let block: ContentBlock = serde_json::from_str(r#"{"text": "hi"}"#).unwrap();
/// assert_eq!(block.as_text(), Some("hi"));
///
/// let image: ContentBlock =
///     serde_json::from_str(r#"{"type": "image", "url": "x.png"}"#).unwrap();
/// assert!(image.as_text().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum ContentBlock {
    Text(String),
    Other(Value),
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text(text.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text(text) => Some(text),
            ContentBlock::Other(_) => None,
        }
    }

    /// Kind name for diagnostics: `"text"`, the block's own `type`, or `"unknown"`.
    pub fn kind(&self) -> &str {
        match self {
            ContentBlock::Text(_) => "text",
            ContentBlock::Other(value) => value
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or("unknown"),
        }
    }
}

impl From<Value> for ContentBlock {
    fn from(value: Value) -> Self {
        let is_text_kind = match value.get("type") {
            None => true,
            Some(kind) => kind.as_str() == Some("text"),
        };
        match value.get("text").and_then(Value::as_str) {
            Some(text) if is_text_kind => ContentBlock::Text(text.to_string()),
            _ => ContentBlock::Other(value),
        }
    }
}

impl From<ContentBlock> for Value {
    fn from(block: ContentBlock) -> Self {
        match block {
            ContentBlock::Text(text) => serde_json::json!({ "text": text }),
            ContentBlock::Other(value) => value,
        }
    }
}

/// A message in a conversation (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: Vec<ContentBlock>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: vec![ContentBlock::text(text)],
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: vec![ContentBlock::text(text)],
        }
    }

    /// Text blocks joined by newlines, in order; other block kinds are skipped.
    pub fn render_text(&self) -> String {
        self.content
            .iter()
            .filter_map(ContentBlock::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Number of blocks that are not text.
    pub fn skipped_blocks(&self) -> usize {
        self.content
            .iter()
            .filter(|b| b.as_text().is_none())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_wire_message() {
        let message: Message = serde_json::from_value(json!({
            "role": "assistant",
            "content": [{ "text": "Hello" }, { "text": "there" }]
        }))
        .unwrap();

        assert_eq!(message.role, Role::Assistant);
        assert_eq!(message.render_text(), "Hello\nthere");
        assert_eq!(message.skipped_blocks(), 0);
    }

    #[test]
    fn unknown_block_kinds_are_skipped_on_render() {
        let message: Message = serde_json::from_value(json!({
            "role": "assistant",
            "content": [
                { "text": "before" },
                { "type": "image", "source": { "url": "a.png" } },
                { "type": "text", "text": "after" },
                { "citations": [] }
            ]
        }))
        .unwrap();

        assert_eq!(message.render_text(), "before\nafter");
        assert_eq!(message.skipped_blocks(), 2);
        assert_eq!(message.content[1].kind(), "image");
        assert_eq!(message.content[3].kind(), "unknown");
    }

    #[test]
    fn typed_block_with_text_field_is_not_text() {
        let block = ContentBlock::from(json!({ "type": "tool_result", "text": "raw" }));
        assert!(block.as_text().is_none());
    }

    #[test]
    fn unknown_blocks_serialize_verbatim() {
        let raw = json!({ "type": "image", "source": { "url": "a.png" } });
        let message = Message {
            role: Role::User,
            content: vec![ContentBlock::text("look"), ContentBlock::from(raw.clone())],
        };

        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(
            value,
            json!({ "role": "user", "content": [{ "text": "look" }, raw] })
        );
    }

    #[test]
    fn unknown_role_is_rejected() {
        let result: Result<Message, _> =
            serde_json::from_value(json!({ "role": "system", "content": [] }));
        assert!(result.is_err());
    }

    #[test]
    fn role_badges() {
        assert_eq!(Role::User.badge(), 'U');
        assert_eq!(Role::Assistant.badge(), 'A');
    }
}
