use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tokio::sync::broadcast;

use super::error::{Result, StoreError};
use super::kv::{self, KeyValueStore, MemoryStore};
use super::responder::{self, PendingReply};
use crate::constants::keys;
use crate::events::StoreEvent;
use crate::models::{Chatroom, Message, MessageDraft, MessagePage};
use crate::search;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Conversation store - single owner of chatrooms, their message logs and
/// pending assistant replies.
///
/// Cloning yields another handle to the same store. Every mutation runs under
/// one lock, so no caller observes a half-applied change. Reads return owned
/// snapshots.
#[derive(Clone)]
pub struct ChatStore {
    inner: Arc<Inner>,
}

struct Inner {
    state: Mutex<ChatState>,
    bridge: Arc<dyn KeyValueStore>,
    events: broadcast::Sender<StoreEvent>,
}

#[derive(Default)]
struct ChatState {
    /// Most recent first
    chatrooms: Vec<Chatroom>,
    /// Exactly one entry per chatroom, created and dropped with it
    messages: HashMap<String, Vec<Message>>,
    current: Option<String>,
    pending: HashMap<String, Vec<PendingReply>>,
    next_seq: u64,
    next_ticket: u64,
    persistence_error: Option<String>,
}

impl ChatState {
    fn is_responding(&self, chatroom_id: &str) -> bool {
        self.pending
            .get(chatroom_id)
            .is_some_and(|replies| !replies.is_empty())
    }
}

impl ChatStore {
    /// Build a store from whatever the bridge holds. Missing or unreadable
    /// data starts the store empty.
    pub fn load(bridge: Arc<dyn KeyValueStore>) -> Self {
        let chatrooms: Vec<Chatroom> =
            kv::read_json(bridge.as_ref(), keys::CHATROOMS).unwrap_or_default();
        let mut stored_logs: HashMap<String, Vec<Message>> =
            kv::read_json(bridge.as_ref(), keys::MESSAGES).unwrap_or_default();

        // Rebuild the log map from the chatroom list: orphaned logs are dropped,
        // chatrooms without a log get an empty one.
        let mut messages = HashMap::with_capacity(chatrooms.len());
        for room in &chatrooms {
            let mut log = stored_logs.remove(&room.id).unwrap_or_default();
            log.sort_by_key(|m| m.seq);
            messages.insert(room.id.clone(), log);
        }
        if !stored_logs.is_empty() {
            tracing::warn!(count = stored_logs.len(), "dropping message logs without a chatroom");
        }

        let next_seq = messages
            .values()
            .flat_map(|log| log.iter().map(|m| m.seq))
            .max()
            .map_or(0, |seq| seq + 1);

        tracing::info!(chatrooms = chatrooms.len(), "chat store loaded");

        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(ChatState {
                    chatrooms,
                    messages,
                    next_seq,
                    ..ChatState::default()
                }),
                bridge,
                events,
            }),
        }
    }

    /// A store backed by nothing durable.
    pub fn in_memory() -> Self {
        Self::load(Arc::new(MemoryStore::new()))
    }

    /// Subscribe to change notifications. Events are delivered in the order
    /// the mutations were applied.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.inner.events.subscribe()
    }

    // ===== Chatroom lifecycle =====

    /// Create a chatroom at the head of the list and return its id.
    pub fn create_chatroom(&self, title: Option<&str>) -> String {
        let room = Chatroom::new(title);
        let id = room.id.clone();

        let mut state = self.inner.state.lock();
        state.chatrooms.insert(0, room);
        state.messages.insert(id.clone(), Vec::new());
        self.persist(&mut state);
        self.emit(StoreEvent::ChatroomsChanged);

        tracing::info!(chatroom_id = %id, "chatroom created");
        id
    }

    /// Remove a chatroom, its log, and any reply still pending for it.
    /// Unknown ids are ignored.
    pub fn delete_chatroom(&self, chatroom_id: &str) {
        let mut state = self.inner.state.lock();

        let Some(pos) = state.chatrooms.iter().position(|r| r.id == chatroom_id) else {
            tracing::debug!(chatroom_id, "delete ignored for unknown chatroom");
            return;
        };
        state.chatrooms.remove(pos);
        state.messages.remove(chatroom_id);

        let cancelled = state.pending.remove(chatroom_id).unwrap_or_default();
        for reply in &cancelled {
            reply.handle.abort();
        }

        let cleared_current = state.current.as_deref() == Some(chatroom_id);
        if cleared_current {
            state.current = None;
        }

        self.persist(&mut state);

        if !cancelled.is_empty() {
            self.emit(StoreEvent::RespondingChanged {
                chatroom_id: chatroom_id.to_string(),
                responding: false,
            });
        }
        if cleared_current {
            self.emit(StoreEvent::CurrentChatroomChanged(None));
        }
        self.emit(StoreEvent::ChatroomsChanged);

        tracing::info!(chatroom_id, cancelled_replies = cancelled.len(), "chatroom deleted");
    }

    /// Select the chatroom shown in single-conversation views. Unknown ids
    /// clear the selection.
    pub fn set_current_chatroom(&self, chatroom_id: &str) {
        let mut state = self.inner.state.lock();
        let found = state.chatrooms.iter().any(|r| r.id == chatroom_id);
        state.current = found.then(|| chatroom_id.to_string());
        self.emit(StoreEvent::CurrentChatroomChanged(state.current.clone()));
    }

    pub fn current_chatroom(&self) -> Option<Chatroom> {
        let state = self.inner.state.lock();
        let id = state.current.as_deref()?;
        state.chatrooms.iter().find(|r| r.id == id).cloned()
    }

    pub fn chatrooms(&self) -> Vec<Chatroom> {
        self.inner.state.lock().chatrooms.clone()
    }

    pub fn chatroom(&self, chatroom_id: &str) -> Option<Chatroom> {
        self.inner
            .state
            .lock()
            .chatrooms
            .iter()
            .find(|r| r.id == chatroom_id)
            .cloned()
    }

    /// Case-insensitive title search. An empty query returns every chatroom.
    pub fn search_chatrooms(&self, query: &str) -> Vec<Chatroom> {
        let state = self.inner.state.lock();
        search::filter_chatrooms(&state.chatrooms, query)
    }

    // ===== Message log =====

    /// Append a message to a chatroom's log and refresh its preview.
    pub fn add_message(&self, chatroom_id: &str, draft: MessageDraft) -> Result<Message> {
        let mut state = self.inner.state.lock();
        let message = Self::append_locked(&mut state, chatroom_id, draft)?;
        self.persist(&mut state);
        self.emit(StoreEvent::MessageAppended {
            chatroom_id: chatroom_id.to_string(),
            message: message.clone(),
        });
        self.emit(StoreEvent::ChatroomsChanged);
        Ok(message)
    }

    fn append_locked(state: &mut ChatState, chatroom_id: &str, draft: MessageDraft) -> Result<Message> {
        let seq = state.next_seq;
        let log = state
            .messages
            .get_mut(chatroom_id)
            .ok_or_else(|| StoreError::ChatroomNotFound(chatroom_id.to_string()))?;

        // Never let a wall-clock step backwards reorder timestamps within a log
        let now = Utc::now();
        let timestamp = log.last().map_or(now, |last| last.timestamp.max(now));

        let message = Message::from_draft(draft, seq, timestamp);
        log.push(message.clone());
        state.next_seq += 1;

        if let Some(room) = state.chatrooms.iter_mut().find(|r| r.id == chatroom_id) {
            room.last_message = message.text.clone();
            room.updated_at = Some(timestamp);
        }

        tracing::debug!(
            chatroom_id,
            seq,
            sender = ?message.sender,
            preview = %message.preview(40),
            "message appended"
        );
        Ok(message)
    }

    /// One window of a chatroom's log, oldest first. `page` is 1-indexed
    /// (0 is treated as 1) and `limit` is at least 1 (0 is treated as 1), so
    /// following `has_more` always terminates. Unknown chatrooms yield an
    /// empty page.
    pub fn get_messages(&self, chatroom_id: &str, page: usize, limit: usize) -> MessagePage {
        let state = self.inner.state.lock();
        let Some(log) = state.messages.get(chatroom_id) else {
            return MessagePage::default();
        };

        let total = log.len();
        let limit = limit.max(1);
        let start = page.max(1).saturating_sub(1).saturating_mul(limit);
        let end = start.saturating_add(limit);

        let messages = if start >= total {
            Vec::new()
        } else {
            log[start..end.min(total)].to_vec()
        };

        MessagePage {
            messages,
            has_more: end < total,
            total,
        }
    }

    // ===== Simulated assistant replies =====

    /// Mark the chatroom as responding and schedule a canned assistant reply
    /// after a short random delay. Returns immediately.
    ///
    /// Fails with [`StoreError::NoRuntime`] outside a Tokio runtime, leaving
    /// the chatroom idle.
    pub fn add_ai_response(&self, chatroom_id: &str, user_message: &str) -> Result<()> {
        let mut state = self.inner.state.lock();
        if !state.messages.contains_key(chatroom_id) {
            return Err(StoreError::ChatroomNotFound(chatroom_id.to_string()));
        }
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| StoreError::NoRuntime)?;

        let plan = responder::plan_reply(&mut rand::thread_rng());
        let ticket = state.next_ticket;
        state.next_ticket += 1;
        let was_idle = !state.is_responding(chatroom_id);

        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let room_id = chatroom_id.to_string();
        let task = runtime.spawn(async move {
            tokio::time::sleep(plan.delay).await;
            // The store may have been dropped while we slept
            if let Some(inner) = weak.upgrade() {
                ChatStore { inner }.finish_reply(&room_id, ticket, plan.text);
            }
        });

        state
            .pending
            .entry(chatroom_id.to_string())
            .or_default()
            .push(PendingReply {
                ticket,
                handle: task.abort_handle(),
            });

        if was_idle {
            self.emit(StoreEvent::RespondingChanged {
                chatroom_id: chatroom_id.to_string(),
                responding: true,
            });
        }

        tracing::debug!(
            chatroom_id,
            ticket,
            prompt_chars = user_message.chars().count(),
            delay_ms = plan.delay.as_millis() as u64,
            "assistant reply scheduled"
        );
        Ok(())
    }

    fn finish_reply(&self, chatroom_id: &str, ticket: u64, text: &str) {
        let mut state = self.inner.state.lock();

        // Deleting the chatroom drops its pending entry, so a missing entry
        // means this reply was cancelled.
        let Some(replies) = state.pending.get_mut(chatroom_id) else {
            tracing::debug!(chatroom_id, ticket, "reply fired after cancellation");
            return;
        };
        replies.retain(|r| r.ticket != ticket);
        let now_idle = replies.is_empty();
        if now_idle {
            state.pending.remove(chatroom_id);
        }

        match Self::append_locked(&mut state, chatroom_id, MessageDraft::assistant_text(text)) {
            Ok(message) => {
                self.persist(&mut state);
                self.emit(StoreEvent::MessageAppended {
                    chatroom_id: chatroom_id.to_string(),
                    message,
                });
                self.emit(StoreEvent::ChatroomsChanged);
            }
            Err(e) => {
                tracing::warn!(chatroom_id, error = %e, "dropping assistant reply");
            }
        }

        if now_idle {
            self.emit(StoreEvent::RespondingChanged {
                chatroom_id: chatroom_id.to_string(),
                responding: false,
            });
        }
    }

    pub fn is_responding(&self, chatroom_id: &str) -> bool {
        self.inner.state.lock().is_responding(chatroom_id)
    }

    /// True while any chatroom has a reply pending.
    pub fn is_any_responding(&self) -> bool {
        let state = self.inner.state.lock();
        state.pending.values().any(|replies| !replies.is_empty())
    }

    // ===== Persistence =====

    /// Last persistence failure, cleared by the next successful write.
    pub fn persistence_error(&self) -> Option<String> {
        self.inner.state.lock().persistence_error.clone()
    }

    fn persist(&self, state: &mut ChatState) {
        let bridge = self.inner.bridge.as_ref();
        let result = kv::write_json(bridge, keys::CHATROOMS, &state.chatrooms)
            .and_then(|_| kv::write_json(bridge, keys::MESSAGES, &state.messages));

        match result {
            Ok(()) => state.persistence_error = None,
            Err(e) => {
                tracing::warn!(error = %e, "failed to persist chat state; continuing in memory");
                state.persistence_error = Some(e.to_string());
            }
        }
    }

    fn emit(&self, event: StoreEvent) {
        // No subscribers is not an error
        let _ = self.inner.events.send(event);
    }
}
