use mailcraft_state::StateError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmbedError {
    #[error("Failed to save editor state: {0}")]
    Save(#[from] StateError),

    #[error("Failed to encode reply: {0}")]
    Reply(#[from] serde_json::Error),

    #[error("Parent page closed the channel")]
    Disconnected,
}
