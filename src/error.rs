//! Conversation engine error types.
//!
//! Every variant is fatal for the event that raised it: the event is rejected
//! and no state is written.

use thiserror::Error;

pub type ConversationResult<T> = Result<T, ConversationError>;

#[derive(Debug, Error)]
pub enum ConversationError {
    #[error("Missing \"event_id\" on event")]
    MissingEventId,

    #[error("Missing \"type\" on event")]
    MissingEventType,

    #[error("Missing realtime server event processor for \"{0}\"")]
    UnsupportedEvent(String),

    #[error("{event_type}: Missing item id")]
    MissingItemId { event_type: &'static str },

    #[error("{event_type}: Item \"{item_id}\" not found")]
    ItemNotFound {
        event_type: &'static str,
        item_id: String,
    },

    #[error("{event_type}: Response \"{response_id}\" not found")]
    ResponseNotFound {
        event_type: &'static str,
        response_id: String,
    },

    #[error("{event_type}: Item \"{item_id}\" is not a function call")]
    NotAFunctionCall {
        event_type: &'static str,
        item_id: String,
    },

    #[error("Invalid audio payload: {0}")]
    InvalidAudio(#[from] AudioError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Failures decoding a base64 PCM16 chunk.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error(transparent)]
    Base64(#[from] base64::DecodeError),

    /// PCM16 samples are two bytes wide; a trailing half sample is rejected.
    #[error("odd byte length {0} for 16-bit samples")]
    OddByteLength(usize),
}
