pub mod chatroom;
pub mod identity;
pub mod message;
pub mod theme;

pub use chatroom::Chatroom;
pub use identity::Identity;
pub use message::{Message, MessageDraft, MessageKind, MessagePage, Sender};
pub use theme::Theme;
