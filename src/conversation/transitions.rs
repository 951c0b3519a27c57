//! One method per handled server event.
//!
//! Every transition validates before it mutates, so a failed event leaves the
//! conversation as it was.

use realtime_protocol::realtime::{ContentPart, ConversationItem, Response, Role, Session};
use tracing::{debug, warn};

use super::{ProcessedEvent, RealtimeConversation};
use crate::{
    audio::{decode_pcm16, merge_samples, sample_index, slice_window},
    error::{ConversationError, ConversationResult},
    item::{initial_status, FormattedItem, FormattedTool, ItemDelta, ItemKind},
};

const ITEM_CREATED: &str = "conversation.item.created";
const ITEM_TRUNCATED: &str = "conversation.item.truncated";
const ITEM_DELETED: &str = "conversation.item.deleted";
const TRANSCRIPTION_COMPLETED: &str = "conversation.item.input_audio_transcription.completed";
const RESPONSE_DONE: &str = "response.done";
const OUTPUT_ITEM_ADDED: &str = "response.output_item.added";
const OUTPUT_ITEM_DONE: &str = "response.output_item.done";
const CONTENT_PART_ADDED: &str = "response.content_part.added";
const AUDIO_TRANSCRIPT_DELTA: &str = "response.audio_transcript.delta";
const AUDIO_DELTA: &str = "response.audio.delta";
const TEXT_DELTA: &str = "response.text.delta";
const FUNCTION_CALL_ARGUMENTS_DELTA: &str = "response.function_call_arguments.delta";

/// Stand-in for an empty input transcript, so "transcribed to nothing" can be
/// told apart from "not transcribed yet".
const EMPTY_TRANSCRIPT: &str = " ";

fn item_not_found(event_type: &'static str, item_id: &str) -> ConversationError {
    ConversationError::ItemNotFound {
        event_type,
        item_id: item_id.to_string(),
    }
}

impl RealtimeConversation {
    pub(super) fn session_changed(&mut self, session: Session) -> ProcessedEvent<'_> {
        debug!(session_id = %session.id, "Realtime session updated");
        self.store.set_session(session);
        ProcessedEvent::empty()
    }

    pub(super) fn item_created(
        &mut self,
        payload: ConversationItem,
    ) -> ConversationResult<ProcessedEvent<'_>> {
        let mut item = FormattedItem::from_payload(payload).ok_or(
            ConversationError::MissingItemId {
                event_type: ITEM_CREATED,
            },
        )?;

        if self.store.contains_item(&item.id) {
            debug!(item_id = %item.id, "Ignoring duplicate conversation item");
            return Ok(ProcessedEvent::borrowed(self.store.item(&item.id)));
        }

        if let Some(audio) = self.store.take_speech(&item.id).and_then(|s| s.audio) {
            item.formatted.audio = audio;
        }
        item.formatted.text = item
            .content()
            .iter()
            .filter_map(ContentPart::as_text)
            .collect();
        if let Some(transcript) = self.store.take_transcript(&item.id) {
            item.formatted.transcript = transcript;
        }

        item.status = initial_status(&item.kind);
        match &item.kind {
            ItemKind::Message {
                role: Role::User, ..
            } => {
                if let Some(audio) = self.store.take_input_audio() {
                    item.formatted.audio = audio;
                }
            }
            ItemKind::Message { .. } => {}
            ItemKind::FunctionCall { call_id, name, .. } => {
                item.formatted.tool = Some(FormattedTool {
                    tool_type: "function".to_string(),
                    name: name.clone(),
                    call_id: call_id.clone().unwrap_or_default(),
                    arguments: String::new(),
                });
            }
            ItemKind::FunctionCallOutput { output, .. } => {
                item.formatted.output = Some(output.clone());
            }
        }

        let item_id = item.id.clone();
        debug!(item_id = %item_id, status = ?item.status, "Conversation item created");
        self.store.insert_item(item);
        Ok(ProcessedEvent::borrowed(self.store.item(&item_id)))
    }

    pub(super) fn item_truncated(
        &mut self,
        item_id: &str,
        audio_end_ms: u32,
    ) -> ConversationResult<ProcessedEvent<'_>> {
        let item = self
            .store
            .item_mut(item_id)
            .ok_or_else(|| item_not_found(ITEM_TRUNCATED, item_id))?;
        item.formatted.transcript.clear();
        item.formatted.audio.truncate(sample_index(audio_end_ms));
        Ok(ProcessedEvent::from_item(item))
    }

    pub(super) fn item_deleted(&mut self, item_id: &str) -> ConversationResult<ProcessedEvent<'_>> {
        let item = self
            .store
            .remove_item(item_id)
            .ok_or_else(|| item_not_found(ITEM_DELETED, item_id))?;
        debug!(item_id, "Conversation item deleted");
        Ok(ProcessedEvent::owned(item))
    }

    pub(super) fn input_transcription_completed(
        &mut self,
        item_id: String,
        content_index: u32,
        transcript: String,
    ) -> ConversationResult<ProcessedEvent<'_>> {
        let formatted_transcript = if transcript.is_empty() {
            EMPTY_TRANSCRIPT.to_string()
        } else {
            transcript.clone()
        };

        if self.store.was_deleted(&item_id) {
            debug!(item_id = %item_id, "Dropping transcript for deleted item");
            return Ok(ProcessedEvent::empty());
        }
        if !self.store.contains_item(&item_id) {
            debug!(item_id = %item_id, "Holding transcript for item not yet created");
            self.store.queue_transcript(item_id, formatted_transcript);
            return Ok(ProcessedEvent::empty());
        }

        let item = self
            .store
            .item_mut(&item_id)
            .ok_or_else(|| item_not_found(TRANSCRIPTION_COMPLETED, &item_id))?;
        match item
            .content_mut()
            .and_then(|content| content.get_mut(content_index as usize))
        {
            Some(part) => {
                if !part.set_transcript(transcript.clone()) {
                    warn!(item_id = %item_id, content_index, "Content part has no transcript");
                }
            }
            None => warn!(item_id = %item_id, content_index, "Content part not found"),
        }
        item.formatted.transcript = formatted_transcript;
        Ok(ProcessedEvent::from_item(item).with_delta(ItemDelta::Transcript(transcript)))
    }

    pub(super) fn speech_started(
        &mut self,
        item_id: String,
        audio_start_ms: u32,
    ) -> ProcessedEvent<'_> {
        if self.store.was_deleted(&item_id) {
            debug!(item_id = %item_id, "Ignoring speech for deleted item");
            return ProcessedEvent::empty();
        }
        debug!(item_id = %item_id, audio_start_ms, "Speech started");
        self.store.start_speech(item_id, audio_start_ms);
        ProcessedEvent::empty()
    }

    pub(super) fn speech_stopped(
        &mut self,
        item_id: &str,
        audio_end_ms: u32,
        input_audio: Option<&[i16]>,
    ) -> ProcessedEvent<'_> {
        if self.store.was_deleted(item_id) {
            debug!(item_id, "Ignoring speech for deleted item");
            return ProcessedEvent::empty();
        }
        let speech = self.store.speech_entry(item_id, audio_end_ms);
        speech.audio_end_ms = Some(audio_end_ms);
        if let Some(buffer) = input_audio {
            speech.audio = Some(slice_window(buffer, speech.audio_start_ms, audio_end_ms));
        }
        debug!(
            item_id,
            audio_start_ms = speech.audio_start_ms,
            audio_end_ms,
            "Speech stopped"
        );
        ProcessedEvent::empty()
    }

    pub(super) fn response_created(&mut self, response: Response) -> ProcessedEvent<'_> {
        let response_id = response.id.clone();
        if self.store.insert_response(response) {
            debug!(response_id = %response_id, "Response created");
        } else {
            debug!(response_id = %response_id, "Ignoring duplicate response");
        }
        ProcessedEvent::empty()
    }

    pub(super) fn response_done(
        &mut self,
        response: Response,
    ) -> ConversationResult<ProcessedEvent<'_>> {
        let stored = self.store.response_mut(&response.id).ok_or_else(|| {
            ConversationError::ResponseNotFound {
                event_type: RESPONSE_DONE,
                response_id: response.id.clone(),
            }
        })?;
        stored.status = response.status;
        stored.status_details = response.status_details;
        stored.usage = response.usage;
        debug!(response_id = %response.id, status = ?stored.status, "Response done");
        Ok(ProcessedEvent::empty())
    }

    pub(super) fn output_item_added(
        &mut self,
        response_id: &str,
        item: ConversationItem,
    ) -> ConversationResult<ProcessedEvent<'_>> {
        let response = self.store.response_mut(response_id).ok_or_else(|| {
            ConversationError::ResponseNotFound {
                event_type: OUTPUT_ITEM_ADDED,
                response_id: response_id.to_string(),
            }
        })?;
        response.output.push(item);
        Ok(ProcessedEvent::empty())
    }

    pub(super) fn output_item_done(
        &mut self,
        payload: ConversationItem,
    ) -> ConversationResult<ProcessedEvent<'_>> {
        let item_id = payload
            .id()
            .filter(|id| !id.is_empty())
            .ok_or(ConversationError::MissingItemId {
                event_type: OUTPUT_ITEM_DONE,
            })?;
        let item = self
            .store
            .item_mut(item_id)
            .ok_or_else(|| item_not_found(OUTPUT_ITEM_DONE, item_id))?;
        if let Some(status) = payload.status() {
            item.status = status;
        }
        Ok(ProcessedEvent::from_item(item))
    }

    pub(super) fn content_part_added(
        &mut self,
        item_id: &str,
        part: ContentPart,
    ) -> ConversationResult<ProcessedEvent<'_>> {
        let item = self
            .store
            .item_mut(item_id)
            .ok_or_else(|| item_not_found(CONTENT_PART_ADDED, item_id))?;
        match item.content_mut() {
            Some(content) => content.push(part),
            None => warn!(item_id, "Dropping content part for non-message item"),
        }
        Ok(ProcessedEvent::from_item(item))
    }

    pub(super) fn audio_transcript_delta(
        &mut self,
        item_id: &str,
        content_index: u32,
        delta: String,
    ) -> ConversationResult<ProcessedEvent<'_>> {
        let item = self
            .store
            .item_mut(item_id)
            .ok_or_else(|| item_not_found(AUDIO_TRANSCRIPT_DELTA, item_id))?;
        let appended = item
            .content_mut()
            .and_then(|content| content.get_mut(content_index as usize))
            .is_some_and(|part| part.push_transcript(&delta));
        if !appended {
            warn!(item_id, content_index, "No audio content part for transcript delta");
        }
        item.formatted.transcript.push_str(&delta);
        Ok(ProcessedEvent::from_item(item).with_delta(ItemDelta::Transcript(delta)))
    }

    pub(super) fn audio_delta(
        &mut self,
        item_id: &str,
        delta: &str,
    ) -> ConversationResult<ProcessedEvent<'_>> {
        if !self.store.contains_item(item_id) {
            return Err(item_not_found(AUDIO_DELTA, item_id));
        }
        let samples = decode_pcm16(delta)?;
        let item = self
            .store
            .item_mut(item_id)
            .ok_or_else(|| item_not_found(AUDIO_DELTA, item_id))?;
        merge_samples(&mut item.formatted.audio, &samples);
        Ok(ProcessedEvent::from_item(item).with_delta(ItemDelta::Audio(samples)))
    }

    pub(super) fn text_delta(
        &mut self,
        item_id: &str,
        content_index: u32,
        delta: String,
    ) -> ConversationResult<ProcessedEvent<'_>> {
        let item = self
            .store
            .item_mut(item_id)
            .ok_or_else(|| item_not_found(TEXT_DELTA, item_id))?;
        let appended = item
            .content_mut()
            .and_then(|content| content.get_mut(content_index as usize))
            .is_some_and(|part| part.push_text(&delta));
        if !appended {
            warn!(item_id, content_index, "No text content part for text delta");
        }
        item.formatted.text.push_str(&delta);
        Ok(ProcessedEvent::from_item(item).with_delta(ItemDelta::Text(delta)))
    }

    pub(super) fn function_call_arguments_delta(
        &mut self,
        item_id: &str,
        delta: String,
    ) -> ConversationResult<ProcessedEvent<'_>> {
        let item = self
            .store
            .item_mut(item_id)
            .ok_or_else(|| item_not_found(FUNCTION_CALL_ARGUMENTS_DELTA, item_id))?;
        let ItemKind::FunctionCall { arguments, .. } = &mut item.kind else {
            return Err(ConversationError::NotAFunctionCall {
                event_type: FUNCTION_CALL_ARGUMENTS_DELTA,
                item_id: item_id.to_string(),
            });
        };
        arguments.push_str(&delta);
        item.formatted
            .tool
            .get_or_insert_with(|| FormattedTool {
                tool_type: "function".to_string(),
                ..Default::default()
            })
            .arguments
            .push_str(&delta);
        Ok(ProcessedEvent::from_item(item).with_delta(ItemDelta::Arguments(delta)))
    }
}
