//! Client-resident conversation store: chatrooms, their message logs, a
//! simulated assistant, and the small preference state that survives restarts.

pub mod config;
pub mod constants;
pub mod debounce;
pub mod events;
pub mod models;
pub mod runtime;
pub mod search;
pub mod store;
pub mod tracing_setup;

pub use config::CoreConfig;
pub use events::StoreEvent;
pub use runtime::CoreRuntime;
pub use store::{AuthStore, ChatStore, StoreError, ThemeStore};
