//! Application-wide constants
//!
//! Centralized location for default values, persistence keys and the
//! canned assistant replies shared across modules.

use std::time::Duration;

// Chatroom defaults
pub const DEFAULT_CHATROOM_TITLE: &str = "New Chat";

// Pagination defaults
pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_PAGE_SIZE: usize = 20;

// Identity defaults
pub const DEFAULT_COUNTRY_CODE: &str = "+91";

/// Lower bound (inclusive) of the simulated assistant "thinking" delay.
pub const RESPONSE_DELAY_MIN: Duration = Duration::from_millis(1000);

/// Upper bound (exclusive) of the simulated assistant "thinking" delay.
pub const RESPONSE_DELAY_MAX: Duration = Duration::from_millis(3000);

/// Settle time for search input before a query is applied.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Replies the local assistant picks from.
pub const CANNED_REPLIES: &[&str] = &[
    "That's an interesting question! Let me help you with that.",
    "I understand what you're asking. Here's what I think...",
    "Great question! Based on my knowledge, I can tell you that...",
    "I'd be happy to help you with that. Let me explain...",
    "That's a fascinating topic! Here's my perspective...",
];

// Keys used against the persistent key-value bridge
pub mod keys {
    /// Logged-in identity (`{ phoneNumber, countryCode }`)
    pub const AUTH: &str = "auth";
    /// UI theme (`"light"` / `"dark"`)
    pub const THEME: &str = "theme";
    /// Ordered chatroom list, most recent first
    pub const CHATROOMS: &str = "chatrooms";
    /// Message logs keyed by chatroom id
    pub const MESSAGES: &str = "messages";
}
