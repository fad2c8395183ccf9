use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::watch;

use crate::config::CoreConfig;
use crate::debounce::{debounce, DebounceInput};
use crate::models::{Message, MessageDraft};
use crate::store::{AuthStore, ChatStore, JsonFileStore, KeyValueStore, StoreError, ThemeStore};

/// Owns every store and the bridge they persist through.
pub struct CoreRuntime {
    config: CoreConfig,
    chat: ChatStore,
    theme: ThemeStore,
    auth: AuthStore,
}

impl CoreRuntime {
    /// Open the stores persisted under `config.data_dir`.
    pub fn new(config: CoreConfig) -> Result<Self> {
        let bridge = JsonFileStore::new(&config.data_dir).with_context(|| {
            format!("Failed to open data directory: {}", config.data_dir.display())
        })?;
        tracing::info!(dir = %bridge.dir().display(), "using file-backed storage");
        Ok(Self::with_bridge(config, Arc::new(bridge)))
    }

    pub fn with_bridge(config: CoreConfig, bridge: Arc<dyn KeyValueStore>) -> Self {
        tracing::debug!(data_dir = %config.data_dir.display(), "starting core runtime");
        Self {
            chat: ChatStore::load(bridge.clone()),
            theme: ThemeStore::load(bridge.clone()),
            auth: AuthStore::load(bridge),
            config,
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn chat(&self) -> &ChatStore {
        &self.chat
    }

    pub fn theme(&self) -> &ThemeStore {
        &self.theme
    }

    pub fn theme_mut(&mut self) -> &mut ThemeStore {
        &mut self.theme
    }

    pub fn auth(&self) -> &AuthStore {
        &self.auth
    }

    pub fn auth_mut(&mut self) -> &mut AuthStore {
        &mut self.auth
    }

    /// Post a user message and schedule the assistant's reply to it.
    pub fn send_user_message(
        &self,
        chatroom_id: &str,
        text: &str,
    ) -> std::result::Result<Message, StoreError> {
        let message = self.chat.add_message(chatroom_id, MessageDraft::user_text(text))?;
        self.chat.add_ai_response(chatroom_id, text)?;
        Ok(message)
    }

    /// Debounced search input wired to the configured settle delay.
    pub fn search_input(&self) -> Result<(DebounceInput<String>, watch::Receiver<String>)> {
        debounce(String::new(), self.config.search_debounce)
            .context("Search input needs a Tokio runtime")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::RESPONSE_DELAY_MAX;
    use crate::models::{Identity, Sender, Theme};
    use std::time::Duration;
    use tempfile::tempdir;

    #[tokio::test(start_paused = true)]
    async fn test_state_survives_restart() {
        let dir = tempdir().unwrap();

        let chatroom_id = {
            let mut runtime = CoreRuntime::new(CoreConfig::new(dir.path())).unwrap();
            runtime.theme_mut().set_theme(Theme::Dark);
            runtime.auth_mut().login("9876543210", "+91").unwrap();

            let id = runtime.chat().create_chatroom(Some("Restart me"));
            runtime.send_user_message(&id, "hello").unwrap();
            tokio::time::sleep(RESPONSE_DELAY_MAX).await;
            id
        };

        let runtime = CoreRuntime::new(CoreConfig::new(dir.path())).unwrap();
        assert_eq!(runtime.theme().theme(), Theme::Dark);
        assert_eq!(
            runtime.auth().identity(),
            Some(&Identity::new("9876543210", "+91"))
        );

        let page = runtime.chat().get_messages(&chatroom_id, 1, 20);
        assert_eq!(page.total, 2);
        assert_eq!(page.messages[0].sender, Sender::User);
        assert_eq!(page.messages[1].sender, Sender::Assistant);
        assert!(runtime.chat().persistence_error().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_to_unknown_chatroom_schedules_nothing() {
        let dir = tempdir().unwrap();
        let runtime = CoreRuntime::new(CoreConfig::new(dir.path())).unwrap();
        assert!(matches!(
            runtime.send_user_message("missing", "hi"),
            Err(StoreError::ChatroomNotFound(_))
        ));
        assert!(!runtime.chat().is_any_responding());
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounced_search_over_store() {
        let dir = tempdir().unwrap();
        let config = CoreConfig::new(dir.path()).with_search_debounce(Duration::from_millis(200));
        let runtime = CoreRuntime::new(config).unwrap();
        runtime.chat().create_chatroom(Some("Groceries"));
        runtime.chat().create_chatroom(Some("Rust help"));

        let (input, mut query) = runtime.search_input().unwrap();
        input.set("ru".to_string());
        input.set("rust".to_string());

        query.changed().await.unwrap();
        let results = runtime.chat().search_chatrooms(&query.borrow_and_update());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Rust help");
    }
}
