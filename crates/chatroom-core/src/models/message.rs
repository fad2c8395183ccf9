use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    /// Older data stored the assistant as "ai"
    #[serde(alias = "ai")]
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Text,
    Image,
}

/// Caller-supplied content for a new message. The store assigns id,
/// sequence number and timestamp on append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDraft {
    pub text: Option<String>,
    pub image: Option<String>,
    pub sender: Sender,
    pub kind: MessageKind,
}

impl MessageDraft {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            image: None,
            sender: Sender::User,
            kind: MessageKind::Text,
        }
    }

    pub fn assistant_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            image: None,
            sender: Sender::Assistant,
            kind: MessageKind::Text,
        }
    }

    /// Image message, optionally captioned.
    pub fn user_image(image: impl Into<String>, caption: Option<String>) -> Self {
        Self {
            text: caption,
            image: Some(image.into()),
            sender: Sender::User,
            kind: MessageKind::Image,
        }
    }
}

/// A single turn in a chatroom. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    /// Store-wide append order; breaks timestamp ties
    pub seq: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub sender: Sender,
    #[serde(rename = "type", default)]
    pub kind: MessageKind,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub(crate) fn from_draft(draft: MessageDraft, seq: u64, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            seq,
            text: draft.text,
            image: draft.image,
            sender: draft.sender,
            kind: draft.kind,
            timestamp,
        }
    }

    pub fn is_from_user(&self) -> bool {
        self.sender == Sender::User
    }

    /// One-line preview of the message for list rendering.
    pub fn preview(&self, max_chars: usize) -> String {
        match (&self.text, &self.image) {
            (Some(text), _) => text.chars().take(max_chars).collect::<String>().replace('\n', " "),
            (None, Some(_)) => "[image]".to_string(),
            (None, None) => String::new(),
        }
    }
}

/// One page of a chatroom's message log.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePage {
    pub messages: Vec<Message>,
    pub has_more: bool,
    pub total: usize,
}
