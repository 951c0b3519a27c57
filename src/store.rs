//! Backing storage for conversation state.
//!
//! Items and responses are each held as an ID-keyed map plus an insertion-order
//! list. The two always hold exactly the same set of IDs. Pending fragments
//! (speech windows and transcripts that arrive before their item) are kept in
//! separate maps and removed when claimed. Deleting an item drops its
//! fragments and tombstones the ID so late fragments for it are not queued.
//!
//! Mutation is crate-private: callers only ever see a `&ConversationStore`.

use std::collections::{HashMap, HashSet};

use realtime_protocol::realtime::{Response, Session};

use crate::item::FormattedItem;

/// A detected speech window that has not yet been attached to an item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingSpeech {
    pub audio_start_ms: u32,
    pub audio_end_ms: Option<u32>,
    /// Samples cut from the input buffer once the window closed
    pub audio: Option<Vec<i16>>,
}

/// Read-only outside the crate:
///
/// ```compile_fail
/// let mut store = realtime_conversation::ConversationStore::new();
/// store.queue_transcript("item_1", "hello");
/// ```
#[derive(Debug, Default)]
pub struct ConversationStore {
    items: HashMap<String, FormattedItem>,
    item_order: Vec<String>,
    responses: HashMap<String, Response>,
    response_order: Vec<String>,
    pending_speech: HashMap<String, PendingSpeech>,
    pending_transcripts: HashMap<String, String>,
    queued_input_audio: Option<Vec<i16>>,
    deleted: HashSet<String>,
    session: Option<Session>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------------
    // Items
    // ------------------------------------------------------------------------

    pub fn contains_item(&self, item_id: &str) -> bool {
        self.items.contains_key(item_id)
    }

    pub fn item(&self, item_id: &str) -> Option<&FormattedItem> {
        self.items.get(item_id)
    }

    pub(crate) fn item_mut(&mut self, item_id: &str) -> Option<&mut FormattedItem> {
        self.items.get_mut(item_id)
    }

    /// Insert a new item at the end of the order.
    ///
    /// Returns `false` and leaves the store untouched if the ID is taken.
    pub(crate) fn insert_item(&mut self, item: FormattedItem) -> bool {
        if self.items.contains_key(&item.id) {
            return false;
        }
        self.deleted.remove(&item.id);
        self.item_order.push(item.id.clone());
        self.items.insert(item.id.clone(), item);
        true
    }

    /// Remove an item along with any fragments still pending for it.
    pub(crate) fn remove_item(&mut self, item_id: &str) -> Option<FormattedItem> {
        let item = self.items.remove(item_id)?;
        self.item_order.retain(|id| id != item_id);
        self.pending_speech.remove(item_id);
        self.pending_transcripts.remove(item_id);
        self.deleted.insert(item_id.to_string());
        Some(item)
    }

    /// Whether the ID belonged to an item that has since been deleted.
    pub fn was_deleted(&self, item_id: &str) -> bool {
        self.deleted.contains(item_id)
    }

    /// Items in creation order
    pub fn items(&self) -> impl Iterator<Item = &FormattedItem> {
        self.item_order.iter().filter_map(|id| self.items.get(id))
    }

    pub fn item_count(&self) -> usize {
        self.item_order.len()
    }

    /// Item IDs in creation order
    pub fn item_ids(&self) -> &[String] {
        &self.item_order
    }

    // ------------------------------------------------------------------------
    // Responses
    // ------------------------------------------------------------------------

    pub fn response(&self, response_id: &str) -> Option<&Response> {
        self.responses.get(response_id)
    }

    pub(crate) fn response_mut(&mut self, response_id: &str) -> Option<&mut Response> {
        self.responses.get_mut(response_id)
    }

    /// Register a response. Returns `false` if the ID is already known.
    pub(crate) fn insert_response(&mut self, response: Response) -> bool {
        if self.responses.contains_key(&response.id) {
            return false;
        }
        self.response_order.push(response.id.clone());
        self.responses.insert(response.id.clone(), response);
        true
    }

    /// Responses in creation order
    pub fn responses(&self) -> impl Iterator<Item = &Response> {
        self.response_order
            .iter()
            .filter_map(|id| self.responses.get(id))
    }

    pub fn response_count(&self) -> usize {
        self.response_order.len()
    }

    // ------------------------------------------------------------------------
    // Pending fragments
    // ------------------------------------------------------------------------

    pub fn pending_speech(&self, item_id: &str) -> Option<&PendingSpeech> {
        self.pending_speech.get(item_id)
    }

    /// Open a speech window, replacing any earlier one for the same item.
    pub(crate) fn start_speech(&mut self, item_id: impl Into<String>, audio_start_ms: u32) {
        self.pending_speech.insert(
            item_id.into(),
            PendingSpeech {
                audio_start_ms,
                ..Default::default()
            },
        );
    }

    /// Get the speech window for an item, opening one at `audio_start_ms` if
    /// none exists.
    pub(crate) fn speech_entry(
        &mut self,
        item_id: &str,
        audio_start_ms: u32,
    ) -> &mut PendingSpeech {
        self.pending_speech
            .entry(item_id.to_string())
            .or_insert_with(|| PendingSpeech {
                audio_start_ms,
                ..Default::default()
            })
    }

    pub(crate) fn take_speech(&mut self, item_id: &str) -> Option<PendingSpeech> {
        self.pending_speech.remove(item_id)
    }

    pub(crate) fn queue_transcript(
        &mut self,
        item_id: impl Into<String>,
        transcript: impl Into<String>,
    ) {
        self.pending_transcripts
            .insert(item_id.into(), transcript.into());
    }

    pub fn pending_transcript(&self, item_id: &str) -> Option<&str> {
        self.pending_transcripts.get(item_id).map(String::as_str)
    }

    pub(crate) fn take_transcript(&mut self, item_id: &str) -> Option<String> {
        self.pending_transcripts.remove(item_id)
    }

    pub(crate) fn queue_input_audio(&mut self, samples: Vec<i16>) {
        self.queued_input_audio = Some(samples);
    }

    pub fn queued_input_audio(&self) -> Option<&[i16]> {
        self.queued_input_audio.as_deref()
    }

    pub(crate) fn take_input_audio(&mut self) -> Option<Vec<i16>> {
        self.queued_input_audio.take()
    }

    // ------------------------------------------------------------------------
    // Session
    // ------------------------------------------------------------------------

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub(crate) fn set_session(&mut self, session: Session) {
        self.session = Some(session);
    }

    /// Drop every item, response, pending fragment and the session.
    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}
