//! Conversation state reconstruction.
//!
//! [`RealtimeConversation`] folds the server's realtime event stream into an
//! ordered list of items and responses. Each event is handled by exactly one
//! transition; the result carries a view of the touched item and, for
//! streaming events, the delta that was just applied.
//!
//! Speech windows and input transcripts may arrive before the item they belong
//! to. Those fragments are held until the matching `conversation.item.created`
//! claims them.

mod transitions;

#[cfg(test)]
mod proptests;

use std::borrow::Cow;

use realtime_protocol::realtime::{RealtimeServerEvent, Response, Session};
use serde::Serialize;
use serde_json::Value;
use tracing::trace;

use crate::{
    error::{ConversationError, ConversationResult},
    item::{FormattedItem, ItemDelta},
    store::ConversationStore,
};

/// Outcome of processing one server event.
///
/// `item` borrows the live item from the conversation, except after a
/// deletion where it owns the removed item.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProcessedEvent<'a> {
    pub item: Option<Cow<'a, FormattedItem>>,
    pub delta: Option<ItemDelta>,
}

impl<'a> ProcessedEvent<'a> {
    /// An event that touched no item
    pub fn empty() -> Self {
        Self::default()
    }

    fn borrowed(item: Option<&'a FormattedItem>) -> Self {
        Self {
            item: item.map(Cow::Borrowed),
            delta: None,
        }
    }

    fn from_item(item: &'a FormattedItem) -> Self {
        Self::borrowed(Some(item))
    }

    fn owned(item: FormattedItem) -> Self {
        Self {
            item: Some(Cow::Owned(item)),
            delta: None,
        }
    }

    fn with_delta(mut self, delta: ItemDelta) -> Self {
        self.delta = Some(delta);
        self
    }

    pub fn item(&self) -> Option<&FormattedItem> {
        self.item.as_deref()
    }

    /// Detach from the conversation so the result can outlive the next event.
    pub fn into_owned(self) -> ProcessedEvent<'static> {
        ProcessedEvent {
            item: self.item.map(|item| Cow::Owned(item.into_owned())),
            delta: self.delta,
        }
    }
}

/// Client-side model of a realtime conversation.
#[derive(Debug, Default)]
pub struct RealtimeConversation {
    store: ConversationStore,
}

impl RealtimeConversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one server event.
    ///
    /// `input_audio` is the client's recorded input buffer, used to cut the
    /// speech window when `input_audio_buffer.speech_stopped` arrives.
    pub fn process(
        &mut self,
        event: RealtimeServerEvent,
        input_audio: Option<&[i16]>,
    ) -> ConversationResult<ProcessedEvent<'_>> {
        if matches!(event, RealtimeServerEvent::Unknown) {
            return Err(ConversationError::UnsupportedEvent(
                event.event_type().to_string(),
            ));
        }
        if event.event_id().is_none_or(str::is_empty) {
            return Err(ConversationError::MissingEventId);
        }
        trace!(
            event_type = event.event_type(),
            event_id = event.event_id(),
            "Processing realtime server event"
        );

        use RealtimeServerEvent as E;
        match event {
            E::SessionCreated { session, .. } | E::SessionUpdated { session, .. } => {
                Ok(self.session_changed(*session))
            }
            E::ConversationItemCreated { item, .. } => self.item_created(item),
            E::ConversationItemTruncated {
                item_id,
                audio_end_ms,
                ..
            } => self.item_truncated(&item_id, audio_end_ms),
            E::ConversationItemDeleted { item_id, .. } => self.item_deleted(&item_id),
            E::ConversationItemInputAudioTranscriptionCompleted {
                item_id,
                content_index,
                transcript,
                ..
            } => self.input_transcription_completed(item_id, content_index, transcript),
            E::InputAudioBufferSpeechStarted {
                item_id,
                audio_start_ms,
                ..
            } => Ok(self.speech_started(item_id, audio_start_ms)),
            E::InputAudioBufferSpeechStopped {
                item_id,
                audio_end_ms,
                ..
            } => Ok(self.speech_stopped(&item_id, audio_end_ms, input_audio)),
            E::ResponseCreated { response, .. } => Ok(self.response_created(*response)),
            E::ResponseDone { response, .. } => self.response_done(*response),
            E::ResponseOutputItemAdded {
                response_id, item, ..
            } => self.output_item_added(&response_id, item),
            E::ResponseOutputItemDone { item, .. } => self.output_item_done(item),
            E::ResponseContentPartAdded { content, part, .. } => {
                self.content_part_added(&content.item_id, part)
            }
            E::ResponseAudioTranscriptDelta { content, delta, .. } => {
                self.audio_transcript_delta(&content.item_id, content.content_index, delta)
            }
            E::ResponseAudioDelta { content, delta, .. } => {
                self.audio_delta(&content.item_id, &delta)
            }
            E::ResponseTextDelta { content, delta, .. } => {
                self.text_delta(&content.item_id, content.content_index, delta)
            }
            E::ResponseFunctionCallArgumentsDelta { item_id, delta, .. } => {
                self.function_call_arguments_delta(&item_id, delta)
            }
            other => Err(ConversationError::UnsupportedEvent(
                other.event_type().to_string(),
            )),
        }
    }

    /// Parse and apply one raw JSON server event.
    ///
    /// The envelope is checked before decoding: a missing `event_id` is
    /// reported ahead of a missing `type`, and an unrecognized `type` is
    /// reported by name.
    pub fn process_json(
        &mut self,
        raw: &str,
        input_audio: Option<&[i16]>,
    ) -> ConversationResult<ProcessedEvent<'_>> {
        let value: Value = serde_json::from_str(raw)?;
        if non_empty_str(&value, "event_id").is_none() {
            return Err(ConversationError::MissingEventId);
        }
        let Some(event_type) = non_empty_str(&value, "type").map(str::to_string) else {
            return Err(ConversationError::MissingEventType);
        };
        let event: RealtimeServerEvent = serde_json::from_value(value)?;
        if matches!(event, RealtimeServerEvent::Unknown) {
            return Err(ConversationError::UnsupportedEvent(event_type));
        }
        self.process(event, input_audio)
    }

    /// Hold decoded input audio for the next user message to be created.
    pub fn queue_input_audio(&mut self, samples: Vec<i16>) {
        self.store.queue_input_audio(samples);
    }

    /// Reset to the empty state.
    pub fn clear(&mut self) {
        self.store.clear();
    }

    pub fn item(&self, item_id: &str) -> Option<&FormattedItem> {
        self.store.item(item_id)
    }

    /// All items in creation order
    pub fn items(&self) -> Vec<&FormattedItem> {
        self.store.items().collect()
    }

    pub fn response(&self, response_id: &str) -> Option<&Response> {
        self.store.response(response_id)
    }

    /// All responses in creation order
    pub fn responses(&self) -> Vec<&Response> {
        self.store.responses().collect()
    }

    /// Latest session reported by `session.created` or `session.updated`
    pub fn session(&self) -> Option<&Session> {
        self.store.session()
    }

    /// Read-only access to the underlying store, including pending fragments
    pub fn store(&self) -> &ConversationStore {
        &self.store
    }
}

fn non_empty_str<'v>(value: &'v Value, key: &str) -> Option<&'v str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}
