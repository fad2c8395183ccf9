use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::SEARCH_DEBOUNCE;

#[derive(Debug, Clone)]
pub struct CoreConfig {
    pub data_dir: PathBuf,
    /// How long search input must stay unchanged before it is applied.
    pub search_debounce: Duration,
}

impl CoreConfig {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            search_debounce: SEARCH_DEBOUNCE,
        }
    }

    pub fn with_search_debounce(mut self, delay: Duration) -> Self {
        self.search_debounce = delay;
        self
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::new("chatroom_data")
    }
}
