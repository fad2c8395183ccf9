use std::sync::Arc;

use super::kv::{self, KeyValueStore};
use crate::constants::keys;
use crate::models::Theme;

/// UI theme preference, written through to the bridge on every change.
pub struct ThemeStore {
    bridge: Arc<dyn KeyValueStore>,
    theme: Theme,
}

impl ThemeStore {
    /// Read the saved theme, falling back to light on absence or error.
    pub fn load(bridge: Arc<dyn KeyValueStore>) -> Self {
        let theme = kv::read_json(bridge.as_ref(), keys::THEME).unwrap_or_default();
        Self { bridge, theme }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.save();
    }

    /// Switch between light and dark, returning the new theme.
    pub fn toggle_theme(&mut self) -> Theme {
        self.set_theme(self.theme.toggled());
        self.theme
    }

    fn save(&self) {
        if let Err(e) = kv::write_json(self.bridge.as_ref(), keys::THEME, &self.theme) {
            tracing::warn!(error = %e, "failed to persist theme");
        }
    }
}
