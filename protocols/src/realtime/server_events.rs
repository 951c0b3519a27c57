//! Events sent by the realtime server.
//!
//! Every event is a JSON object discriminated by `type` and stamped with a
//! server-generated `event_id`. Events that stream into a single content part
//! (text, transcript and audio deltas, content part lifecycle) share the same
//! addressing fields, modelled here as a flattened [`ContentRef`].

use serde::{Deserialize, Serialize};

use super::conversation::{ContentPart, ConversationItem};
use super::response::Response;
use super::session::Session;

// ============================================================================
// Supporting Types
// ============================================================================

/// Error payload of an `error` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    /// e.g. `invalid_request_error`
    #[serde(rename = "type")]
    pub error_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    /// Client event that triggered the error, when there was one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub object: String,
}

/// One entry of a `rate_limits.updated` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateLimit {
    /// `requests` or `tokens`
    pub name: String,
    pub limit: u32,
    pub remaining: u32,
    pub reset_seconds: f32,
}

/// Address of a content part inside a response's output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRef {
    pub response_id: String,
    pub item_id: String,
    #[serde(default)]
    pub output_index: u32,
    #[serde(default)]
    pub content_index: u32,
}

impl ContentRef {
    pub fn new(
        response_id: impl Into<String>,
        item_id: impl Into<String>,
        output_index: u32,
        content_index: u32,
    ) -> Self {
        Self {
            response_id: response_id.into(),
            item_id: item_id.into(),
            output_index,
            content_index,
        }
    }
}

// ============================================================================
// Server Event Enum
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RealtimeServerEvent {
    #[serde(rename = "error")]
    Error { event_id: String, error: ApiError },

    // --- Session ---
    #[serde(rename = "session.created")]
    SessionCreated {
        event_id: String,
        session: Box<Session>,
    },
    #[serde(rename = "session.updated")]
    SessionUpdated {
        event_id: String,
        session: Box<Session>,
    },

    // --- Conversation ---
    #[serde(rename = "conversation.created")]
    ConversationCreated {
        event_id: String,
        conversation: Conversation,
    },
    /// An item was added, either by the client or as model output.
    #[serde(rename = "conversation.item.created")]
    ConversationItemCreated {
        event_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        previous_item_id: Option<String>,
        item: ConversationItem,
    },
    /// Whisper finished transcribing a user audio part. May arrive before the
    /// item it refers to.
    #[serde(rename = "conversation.item.input_audio_transcription.completed")]
    ConversationItemInputAudioTranscriptionCompleted {
        event_id: String,
        item_id: String,
        content_index: u32,
        transcript: String,
    },
    #[serde(rename = "conversation.item.input_audio_transcription.failed")]
    ConversationItemInputAudioTranscriptionFailed {
        event_id: String,
        item_id: String,
        content_index: u32,
        error: ApiError,
    },
    /// Assistant audio was cut at `audio_end_ms`, usually on user interruption.
    #[serde(rename = "conversation.item.truncated")]
    ConversationItemTruncated {
        event_id: String,
        item_id: String,
        content_index: u32,
        audio_end_ms: u32,
    },
    #[serde(rename = "conversation.item.deleted")]
    ConversationItemDeleted { event_id: String, item_id: String },

    // --- Input audio buffer ---
    #[serde(rename = "input_audio_buffer.committed")]
    InputAudioBufferCommitted {
        event_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        previous_item_id: Option<String>,
        item_id: String,
    },
    #[serde(rename = "input_audio_buffer.cleared")]
    InputAudioBufferCleared { event_id: String },
    /// Server VAD detected speech. `item_id` names the user item that will be
    /// created once the speech ends.
    #[serde(rename = "input_audio_buffer.speech_started")]
    InputAudioBufferSpeechStarted {
        event_id: String,
        audio_start_ms: u32,
        item_id: String,
    },
    #[serde(rename = "input_audio_buffer.speech_stopped")]
    InputAudioBufferSpeechStopped {
        event_id: String,
        audio_end_ms: u32,
        item_id: String,
    },

    // --- Response lifecycle ---
    #[serde(rename = "response.created")]
    ResponseCreated {
        event_id: String,
        response: Box<Response>,
    },
    /// Terminal state of a response, including usage.
    #[serde(rename = "response.done")]
    ResponseDone {
        event_id: String,
        response: Box<Response>,
    },
    #[serde(rename = "response.output_item.added")]
    ResponseOutputItemAdded {
        event_id: String,
        response_id: String,
        #[serde(default)]
        output_index: u32,
        item: ConversationItem,
    },
    #[serde(rename = "response.output_item.done")]
    ResponseOutputItemDone {
        event_id: String,
        response_id: String,
        #[serde(default)]
        output_index: u32,
        item: ConversationItem,
    },

    // --- Content streaming ---
    #[serde(rename = "response.content_part.added")]
    ResponseContentPartAdded {
        event_id: String,
        #[serde(flatten)]
        content: ContentRef,
        part: ContentPart,
    },
    #[serde(rename = "response.content_part.done")]
    ResponseContentPartDone {
        event_id: String,
        #[serde(flatten)]
        content: ContentRef,
        part: ContentPart,
    },
    #[serde(rename = "response.text.delta")]
    ResponseTextDelta {
        event_id: String,
        #[serde(flatten)]
        content: ContentRef,
        delta: String,
    },
    #[serde(rename = "response.text.done")]
    ResponseTextDone {
        event_id: String,
        #[serde(flatten)]
        content: ContentRef,
        text: String,
    },
    #[serde(rename = "response.audio_transcript.delta")]
    ResponseAudioTranscriptDelta {
        event_id: String,
        #[serde(flatten)]
        content: ContentRef,
        delta: String,
    },
    #[serde(rename = "response.audio_transcript.done")]
    ResponseAudioTranscriptDone {
        event_id: String,
        #[serde(flatten)]
        content: ContentRef,
        transcript: String,
    },
    /// `delta` is base64-encoded PCM16.
    #[serde(rename = "response.audio.delta")]
    ResponseAudioDelta {
        event_id: String,
        #[serde(flatten)]
        content: ContentRef,
        delta: String,
    },
    #[serde(rename = "response.audio.done")]
    ResponseAudioDone {
        event_id: String,
        #[serde(flatten)]
        content: ContentRef,
    },

    // --- Function calls ---
    /// A fragment of the JSON arguments string.
    #[serde(rename = "response.function_call_arguments.delta")]
    ResponseFunctionCallArgumentsDelta {
        event_id: String,
        response_id: String,
        item_id: String,
        #[serde(default)]
        output_index: u32,
        call_id: String,
        delta: String,
    },
    #[serde(rename = "response.function_call_arguments.done")]
    ResponseFunctionCallArgumentsDone {
        event_id: String,
        response_id: String,
        item_id: String,
        #[serde(default)]
        output_index: u32,
        call_id: String,
        arguments: String,
    },

    #[serde(rename = "rate_limits.updated")]
    RateLimitsUpdated {
        event_id: String,
        rate_limits: Vec<RateLimit>,
    },

    /// Any `type` this crate does not know about.
    #[serde(other)]
    Unknown,
}

impl RealtimeServerEvent {
    /// Wire value of the `type` discriminator; `"unknown"` for [`Self::Unknown`].
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Error { .. } => "error",
            Self::SessionCreated { .. } => "session.created",
            Self::SessionUpdated { .. } => "session.updated",
            Self::ConversationCreated { .. } => "conversation.created",
            Self::ConversationItemCreated { .. } => "conversation.item.created",
            Self::ConversationItemInputAudioTranscriptionCompleted { .. } => {
                "conversation.item.input_audio_transcription.completed"
            }
            Self::ConversationItemInputAudioTranscriptionFailed { .. } => {
                "conversation.item.input_audio_transcription.failed"
            }
            Self::ConversationItemTruncated { .. } => "conversation.item.truncated",
            Self::ConversationItemDeleted { .. } => "conversation.item.deleted",
            Self::InputAudioBufferCommitted { .. } => "input_audio_buffer.committed",
            Self::InputAudioBufferCleared { .. } => "input_audio_buffer.cleared",
            Self::InputAudioBufferSpeechStarted { .. } => "input_audio_buffer.speech_started",
            Self::InputAudioBufferSpeechStopped { .. } => "input_audio_buffer.speech_stopped",
            Self::ResponseCreated { .. } => "response.created",
            Self::ResponseDone { .. } => "response.done",
            Self::ResponseOutputItemAdded { .. } => "response.output_item.added",
            Self::ResponseOutputItemDone { .. } => "response.output_item.done",
            Self::ResponseContentPartAdded { .. } => "response.content_part.added",
            Self::ResponseContentPartDone { .. } => "response.content_part.done",
            Self::ResponseTextDelta { .. } => "response.text.delta",
            Self::ResponseTextDone { .. } => "response.text.done",
            Self::ResponseAudioTranscriptDelta { .. } => "response.audio_transcript.delta",
            Self::ResponseAudioTranscriptDone { .. } => "response.audio_transcript.done",
            Self::ResponseAudioDelta { .. } => "response.audio.delta",
            Self::ResponseAudioDone { .. } => "response.audio.done",
            Self::ResponseFunctionCallArgumentsDelta { .. } => {
                "response.function_call_arguments.delta"
            }
            Self::ResponseFunctionCallArgumentsDone { .. } => {
                "response.function_call_arguments.done"
            }
            Self::RateLimitsUpdated { .. } => "rate_limits.updated",
            Self::Unknown => "unknown",
        }
    }

    pub fn event_id(&self) -> Option<&str> {
        match self {
            Self::Error { event_id, .. }
            | Self::SessionCreated { event_id, .. }
            | Self::SessionUpdated { event_id, .. }
            | Self::ConversationCreated { event_id, .. }
            | Self::ConversationItemCreated { event_id, .. }
            | Self::ConversationItemInputAudioTranscriptionCompleted { event_id, .. }
            | Self::ConversationItemInputAudioTranscriptionFailed { event_id, .. }
            | Self::ConversationItemTruncated { event_id, .. }
            | Self::ConversationItemDeleted { event_id, .. }
            | Self::InputAudioBufferCommitted { event_id, .. }
            | Self::InputAudioBufferCleared { event_id }
            | Self::InputAudioBufferSpeechStarted { event_id, .. }
            | Self::InputAudioBufferSpeechStopped { event_id, .. }
            | Self::ResponseCreated { event_id, .. }
            | Self::ResponseDone { event_id, .. }
            | Self::ResponseOutputItemAdded { event_id, .. }
            | Self::ResponseOutputItemDone { event_id, .. }
            | Self::ResponseContentPartAdded { event_id, .. }
            | Self::ResponseContentPartDone { event_id, .. }
            | Self::ResponseTextDelta { event_id, .. }
            | Self::ResponseTextDone { event_id, .. }
            | Self::ResponseAudioTranscriptDelta { event_id, .. }
            | Self::ResponseAudioTranscriptDone { event_id, .. }
            | Self::ResponseAudioDelta { event_id, .. }
            | Self::ResponseAudioDone { event_id, .. }
            | Self::ResponseFunctionCallArgumentsDelta { event_id, .. }
            | Self::ResponseFunctionCallArgumentsDone { event_id, .. }
            | Self::RateLimitsUpdated { event_id, .. } => Some(event_id.as_str()),
            Self::Unknown => None,
        }
    }

    /// The conversation item this event is about, if any.
    ///
    /// For item-carrying events this is the payload's own ID.
    pub fn item_id(&self) -> Option<&str> {
        match self {
            Self::ConversationItemCreated { item, .. }
            | Self::ResponseOutputItemAdded { item, .. }
            | Self::ResponseOutputItemDone { item, .. } => item.id(),
            Self::ConversationItemInputAudioTranscriptionCompleted { item_id, .. }
            | Self::ConversationItemInputAudioTranscriptionFailed { item_id, .. }
            | Self::ConversationItemTruncated { item_id, .. }
            | Self::ConversationItemDeleted { item_id, .. }
            | Self::InputAudioBufferCommitted { item_id, .. }
            | Self::InputAudioBufferSpeechStarted { item_id, .. }
            | Self::InputAudioBufferSpeechStopped { item_id, .. }
            | Self::ResponseFunctionCallArgumentsDelta { item_id, .. }
            | Self::ResponseFunctionCallArgumentsDone { item_id, .. } => Some(item_id.as_str()),
            other => other.content_ref().map(|c| c.item_id.as_str()),
        }
    }

    /// Content addressing for content-scoped events.
    pub fn content_ref(&self) -> Option<&ContentRef> {
        match self {
            Self::ResponseContentPartAdded { content, .. }
            | Self::ResponseContentPartDone { content, .. }
            | Self::ResponseTextDelta { content, .. }
            | Self::ResponseTextDone { content, .. }
            | Self::ResponseAudioTranscriptDelta { content, .. }
            | Self::ResponseAudioTranscriptDone { content, .. }
            | Self::ResponseAudioDelta { content, .. }
            | Self::ResponseAudioDone { content, .. } => Some(content),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    pub fn as_error(&self) -> Option<&ApiError> {
        match self {
            Self::Error { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn is_session_event(&self) -> bool {
        matches!(self, Self::SessionCreated { .. } | Self::SessionUpdated { .. })
    }

    /// True for every `response.*` event.
    pub fn is_response_event(&self) -> bool {
        self.event_type().starts_with("response.")
    }

    /// True for the four streaming `*.delta` events.
    pub fn is_delta_event(&self) -> bool {
        matches!(
            self,
            Self::ResponseTextDelta { .. }
                | Self::ResponseAudioTranscriptDelta { .. }
                | Self::ResponseAudioDelta { .. }
                | Self::ResponseFunctionCallArgumentsDelta { .. }
        )
    }
}
