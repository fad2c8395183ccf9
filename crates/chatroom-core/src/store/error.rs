use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Chatroom not found: {0}")]
    ChatroomNotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("No async runtime available to schedule the reply")]
    NoRuntime,

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
