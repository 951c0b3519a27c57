//! Realtime conversation state reconstruction.
//!
//! Consumes the server half of a realtime voice/text session and maintains a
//! consistent client-side model of the conversation.
//!
//! ## Modules
//!
//! - [`conversation`]: Event reducer and read-only accessors
//! - [`store`]: Item, response and pending-fragment storage
//! - [`item`]: Stored item representation and deltas
//! - [`audio`]: PCM16 decoding and 24kHz sample indexing
//! - [`error`]: Error types
//!
//! Wire types live in the `realtime-protocol` crate, re-exported as
//! [`protocol`].

pub mod audio;
pub mod conversation;
pub mod error;
pub mod item;
pub mod store;

pub use realtime_protocol as protocol;

pub use audio::DEFAULT_FREQUENCY;
pub use conversation::{ProcessedEvent, RealtimeConversation};
pub use error::{AudioError, ConversationError, ConversationResult};
pub use item::{Formatted, FormattedItem, FormattedTool, ItemDelta, ItemKind};
pub use store::{ConversationStore, PendingSpeech};
