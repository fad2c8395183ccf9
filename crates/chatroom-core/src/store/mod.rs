pub mod auth_store;
pub mod chat_store;
pub mod error;
pub mod kv;
pub mod responder;
pub mod theme_store;

pub use auth_store::AuthStore;
pub use chat_store::ChatStore;
pub use error::StoreError;
pub use kv::{JsonFileStore, KeyValueStore, MemoryStore};
pub use theme_store::ThemeStore;
