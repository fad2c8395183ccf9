//! Search utilities for the chatroom list.
//!
//! Matching is a case-insensitive substring test on the full query, using
//! Unicode lowercasing so non-ASCII titles match the way users type them.

use crate::models::Chatroom;

/// Normalize a query for matching. Empty queries return `None` (match all).
/// Whitespace is kept and matched literally.
pub fn normalize_query(query: &str) -> Option<String> {
    if query.is_empty() {
        None
    } else {
        Some(query.to_lowercase())
    }
}

/// Check if `text` contains an already-lowercased `term`
pub fn text_contains_term(text: &str, term: &str) -> bool {
    term.is_empty() || text.to_lowercase().contains(term)
}

/// Chatrooms whose title contains `query`, preserving list order.
pub fn filter_chatrooms<'a, I>(chatrooms: I, query: &str) -> Vec<Chatroom>
where
    I: IntoIterator<Item = &'a Chatroom>,
{
    let Some(term) = normalize_query(query) else {
        return chatrooms.into_iter().cloned().collect();
    };

    chatrooms
        .into_iter()
        .filter(|room| text_contains_term(&room.title, &term))
        .cloned()
        .collect()
}
