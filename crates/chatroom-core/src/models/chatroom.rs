use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::DEFAULT_CHATROOM_TITLE;

/// A named, ordered conversation container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chatroom {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    /// Time of the most recent append (None until the first message)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Text of the most recently appended message, for list previews
    #[serde(default)]
    pub last_message: Option<String>,
}

impl Chatroom {
    /// Create a chatroom with a fresh id. Blank titles fall back to the default.
    pub fn new(title: Option<&str>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: normalize_title(title),
            created_at: Utc::now(),
            updated_at: None,
            last_message: None,
        }
    }

    /// Most recent activity: last append, or creation if the room is empty.
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.updated_at.unwrap_or(self.created_at)
    }
}

fn normalize_title(title: Option<&str>) -> String {
    match title {
        Some(t) if !t.trim().is_empty() => t.to_string(),
        _ => DEFAULT_CHATROOM_TITLE.to_string(),
    }
}
