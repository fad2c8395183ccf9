use crate::models::Message;

/// Change notifications published by [`crate::store::ChatStore`].
///
/// Subscribers receive these over a broadcast channel and re-read whatever
/// snapshot they render from the store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// The chatroom list changed (create, delete, or a preview update)
    ChatroomsChanged,
    /// The current selection changed; `None` when cleared
    CurrentChatroomChanged(Option<String>),
    MessageAppended {
        chatroom_id: String,
        message: Message,
    },
    /// A chatroom entered or left the Responding state
    RespondingChanged {
        chatroom_id: String,
        responding: bool,
    },
}
