//! Realtime dialogue protocol types.
//!
//! A realtime connection delivers asynchronous, partial server events: an item
//! is created, its content streams in as deltas, and a completion event closes
//! it. The submodules model each payload family:
//!
//! - [`session`]: session configuration and state
//! - [`conversation`]: items (messages, function calls, outputs) and content parts
//! - [`response`]: response objects, status and usage
//! - [`server_events`]: the `type`-tagged server event union
//!
//! ```rust,ignore
//! use realtime_protocol::realtime::RealtimeServerEvent;
//!
//! let event: RealtimeServerEvent = serde_json::from_str(&json_str)?;
//! if let RealtimeServerEvent::ResponseTextDelta { content, delta, .. } = &event {
//!     println!("{}: {delta}", content.item_id);
//! }
//! ```
//!
//! | Event Type | Meaning |
//! |------------|---------|
//! | `conversation.item.created` | An item was added to the conversation |
//! | `conversation.item.truncated` | Assistant audio was cut at a playback offset |
//! | `conversation.item.deleted` | An item was removed |
//! | `conversation.item.input_audio_transcription.completed` | User audio was transcribed |
//! | `input_audio_buffer.speech_started` | Server VAD detected speech |
//! | `input_audio_buffer.speech_stopped` | Server VAD detected the end of speech |
//! | `response.created` | The model started a response |
//! | `response.output_item.added` | A response produced a new item |
//! | `response.output_item.done` | A response item reached a terminal status |
//! | `response.content_part.added` | A content part was added to an item |
//! | `response.text.delta` | Incremental output text |
//! | `response.audio_transcript.delta` | Incremental output audio transcript |
//! | `response.audio.delta` | Incremental base64 PCM16 audio |
//! | `response.function_call_arguments.delta` | Incremental tool-call arguments |
//!
//! See [`RealtimeServerEvent`] for the full list.

pub mod conversation;
pub mod response;
pub mod server_events;
pub mod session;

pub use conversation::{ContentPart, ConversationItem, ItemStatus, Role};
pub use response::{
    Response, ResponseError, ResponseStatus, ResponseStatusDetails, ResponseUsage,
};
pub use server_events::{ApiError, ContentRef, Conversation, RateLimit, RealtimeServerEvent};
pub use session::{
    AudioFormat, InputAudioTranscription, MaxOutputTokens, Modality, Session, SessionConfig,
    ToolChoice, ToolChoiceMode, ToolDefinition, TurnDetection, Unbounded,
};
