//! Fluent construction of [`RealtimeServerEvent`]s.
//!
//! Streaming events repeat the same addressing (`response_id`, `item_id`,
//! `output_index`, `content_index`). The builders narrow that scope one level
//! at a time so each terminal method only takes the payload:
//!
//! ```ignore
//! RealtimeServerEvent::builder("evt_1").conversation_item_deleted("item_1");
//!
//! RealtimeServerEvent::builder("evt_2")
//!     .for_response("resp_1")
//!     .for_item("item_1", 0)
//!     .for_content(0)
//!     .audio_transcript_delta("Hel");
//! ```

use crate::realtime::{
    ApiError, ContentPart, ContentRef, ConversationItem, RealtimeServerEvent, Response, Session,
};

// ============================================================================
// Event scope
// ============================================================================

/// Events that need nothing but an `event_id`.
#[must_use = "Builder does nothing until a terminal method is called"]
#[derive(Clone, Debug)]
pub struct ServerEventBuilder {
    event_id: String,
}

impl ServerEventBuilder {
    pub fn new(event_id: impl Into<String>) -> Self {
        Self {
            event_id: event_id.into(),
        }
    }

    pub fn for_response(self, response_id: impl Into<String>) -> ResponseEventBuilder {
        ResponseEventBuilder {
            event_id: self.event_id,
            response_id: response_id.into(),
        }
    }

    pub fn error(self, error: ApiError) -> RealtimeServerEvent {
        RealtimeServerEvent::Error {
            event_id: self.event_id,
            error,
        }
    }

    pub fn session_created(self, session: Session) -> RealtimeServerEvent {
        RealtimeServerEvent::SessionCreated {
            event_id: self.event_id,
            session: Box::new(session),
        }
    }

    pub fn session_updated(self, session: Session) -> RealtimeServerEvent {
        RealtimeServerEvent::SessionUpdated {
            event_id: self.event_id,
            session: Box::new(session),
        }
    }

    pub fn conversation_item_created(
        self,
        previous_item_id: Option<String>,
        item: ConversationItem,
    ) -> RealtimeServerEvent {
        RealtimeServerEvent::ConversationItemCreated {
            event_id: self.event_id,
            previous_item_id,
            item,
        }
    }

    pub fn conversation_item_deleted(self, item_id: impl Into<String>) -> RealtimeServerEvent {
        RealtimeServerEvent::ConversationItemDeleted {
            event_id: self.event_id,
            item_id: item_id.into(),
        }
    }

    pub fn conversation_item_truncated(
        self,
        item_id: impl Into<String>,
        content_index: u32,
        audio_end_ms: u32,
    ) -> RealtimeServerEvent {
        RealtimeServerEvent::ConversationItemTruncated {
            event_id: self.event_id,
            item_id: item_id.into(),
            content_index,
            audio_end_ms,
        }
    }

    pub fn input_audio_transcription_completed(
        self,
        item_id: impl Into<String>,
        content_index: u32,
        transcript: impl Into<String>,
    ) -> RealtimeServerEvent {
        RealtimeServerEvent::ConversationItemInputAudioTranscriptionCompleted {
            event_id: self.event_id,
            item_id: item_id.into(),
            content_index,
            transcript: transcript.into(),
        }
    }

    pub fn input_audio_buffer_committed(
        self,
        item_id: impl Into<String>,
        previous_item_id: Option<String>,
    ) -> RealtimeServerEvent {
        RealtimeServerEvent::InputAudioBufferCommitted {
            event_id: self.event_id,
            previous_item_id,
            item_id: item_id.into(),
        }
    }

    pub fn input_audio_buffer_speech_started(
        self,
        audio_start_ms: u32,
        item_id: impl Into<String>,
    ) -> RealtimeServerEvent {
        RealtimeServerEvent::InputAudioBufferSpeechStarted {
            event_id: self.event_id,
            audio_start_ms,
            item_id: item_id.into(),
        }
    }

    pub fn input_audio_buffer_speech_stopped(
        self,
        audio_end_ms: u32,
        item_id: impl Into<String>,
    ) -> RealtimeServerEvent {
        RealtimeServerEvent::InputAudioBufferSpeechStopped {
            event_id: self.event_id,
            audio_end_ms,
            item_id: item_id.into(),
        }
    }

    pub fn response_created(self, response: Response) -> RealtimeServerEvent {
        RealtimeServerEvent::ResponseCreated {
            event_id: self.event_id,
            response: Box::new(response),
        }
    }

    pub fn response_done(self, response: Response) -> RealtimeServerEvent {
        RealtimeServerEvent::ResponseDone {
            event_id: self.event_id,
            response: Box::new(response),
        }
    }
}

// ============================================================================
// Response scope
// ============================================================================

#[must_use = "Builder does nothing until a terminal method is called"]
#[derive(Clone, Debug)]
pub struct ResponseEventBuilder {
    event_id: String,
    response_id: String,
}

impl ResponseEventBuilder {
    pub fn for_item(self, item_id: impl Into<String>, output_index: u32) -> ItemEventBuilder {
        ItemEventBuilder {
            event_id: self.event_id,
            response_id: self.response_id,
            item_id: item_id.into(),
            output_index,
        }
    }

    /// The item payload carries its own ID.
    pub fn output_item_added(self, output_index: u32, item: ConversationItem) -> RealtimeServerEvent {
        RealtimeServerEvent::ResponseOutputItemAdded {
            event_id: self.event_id,
            response_id: self.response_id,
            output_index,
            item,
        }
    }

    pub fn output_item_done(self, output_index: u32, item: ConversationItem) -> RealtimeServerEvent {
        RealtimeServerEvent::ResponseOutputItemDone {
            event_id: self.event_id,
            response_id: self.response_id,
            output_index,
            item,
        }
    }
}

// ============================================================================
// Output item scope
// ============================================================================

#[must_use = "Builder does nothing until a terminal method is called"]
#[derive(Clone, Debug)]
pub struct ItemEventBuilder {
    event_id: String,
    response_id: String,
    item_id: String,
    output_index: u32,
}

impl ItemEventBuilder {
    pub fn for_content(self, content_index: u32) -> ContentEventBuilder {
        ContentEventBuilder {
            event_id: self.event_id,
            content: ContentRef {
                response_id: self.response_id,
                item_id: self.item_id,
                output_index: self.output_index,
                content_index,
            },
        }
    }

    pub fn function_call_arguments_delta(
        self,
        call_id: impl Into<String>,
        delta: impl Into<String>,
    ) -> RealtimeServerEvent {
        RealtimeServerEvent::ResponseFunctionCallArgumentsDelta {
            event_id: self.event_id,
            response_id: self.response_id,
            item_id: self.item_id,
            output_index: self.output_index,
            call_id: call_id.into(),
            delta: delta.into(),
        }
    }

    pub fn function_call_arguments_done(
        self,
        call_id: impl Into<String>,
        arguments: impl Into<String>,
    ) -> RealtimeServerEvent {
        RealtimeServerEvent::ResponseFunctionCallArgumentsDone {
            event_id: self.event_id,
            response_id: self.response_id,
            item_id: self.item_id,
            output_index: self.output_index,
            call_id: call_id.into(),
            arguments: arguments.into(),
        }
    }
}

// ============================================================================
// Content part scope
// ============================================================================

#[must_use = "Builder does nothing until a terminal method is called"]
#[derive(Clone, Debug)]
pub struct ContentEventBuilder {
    event_id: String,
    content: ContentRef,
}

impl ContentEventBuilder {
    pub fn content_part_added(self, part: ContentPart) -> RealtimeServerEvent {
        RealtimeServerEvent::ResponseContentPartAdded {
            event_id: self.event_id,
            content: self.content,
            part,
        }
    }

    pub fn content_part_done(self, part: ContentPart) -> RealtimeServerEvent {
        RealtimeServerEvent::ResponseContentPartDone {
            event_id: self.event_id,
            content: self.content,
            part,
        }
    }

    pub fn text_delta(self, delta: impl Into<String>) -> RealtimeServerEvent {
        RealtimeServerEvent::ResponseTextDelta {
            event_id: self.event_id,
            content: self.content,
            delta: delta.into(),
        }
    }

    pub fn text_done(self, text: impl Into<String>) -> RealtimeServerEvent {
        RealtimeServerEvent::ResponseTextDone {
            event_id: self.event_id,
            content: self.content,
            text: text.into(),
        }
    }

    pub fn audio_transcript_delta(self, delta: impl Into<String>) -> RealtimeServerEvent {
        RealtimeServerEvent::ResponseAudioTranscriptDelta {
            event_id: self.event_id,
            content: self.content,
            delta: delta.into(),
        }
    }

    pub fn audio_transcript_done(self, transcript: impl Into<String>) -> RealtimeServerEvent {
        RealtimeServerEvent::ResponseAudioTranscriptDone {
            event_id: self.event_id,
            content: self.content,
            transcript: transcript.into(),
        }
    }

    /// `delta` must already be base64-encoded PCM16.
    pub fn audio_delta(self, delta: impl Into<String>) -> RealtimeServerEvent {
        RealtimeServerEvent::ResponseAudioDelta {
            event_id: self.event_id,
            content: self.content,
            delta: delta.into(),
        }
    }

    pub fn audio_done(self) -> RealtimeServerEvent {
        RealtimeServerEvent::ResponseAudioDone {
            event_id: self.event_id,
            content: self.content,
        }
    }
}

impl RealtimeServerEvent {
    pub fn builder(event_id: impl Into<String>) -> ServerEventBuilder {
        ServerEventBuilder::new(event_id)
    }
}
