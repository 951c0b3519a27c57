//! Property-based tests for the conversation reducer
//!
//! Arbitrary event sequences over a small ID space, checking the store's
//! structural invariants after every step.

use std::collections::HashSet;

use proptest::prelude::*;
use realtime_protocol::realtime::{ContentPart, ConversationItem, RealtimeServerEvent, Response};

use super::*;
use crate::{
    audio::{encode_pcm16, sample_index},
    item::ItemKind,
    store::PendingSpeech,
};

// ============================================================================
// Arbitrary Generators
// ============================================================================

const IDS: [&str; 4] = ["item_a", "item_b", "item_c", "item_d"];

#[derive(Debug, Clone)]
enum Op {
    CreateUser(usize),
    CreateAssistant(usize),
    CreateFunctionCall(usize),
    Delete(usize),
    Truncate(usize, u32),
    AudioDelta(usize, Vec<i16>),
    InputTranscript(usize, String),
    SpeechStarted(usize, u32),
    SpeechStopped(usize, u32),
    ArgumentsDelta(usize, String),
    ResponseCreated(usize),
}

fn arb_id() -> impl Strategy<Value = usize> {
    0..IDS.len()
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        arb_id().prop_map(Op::CreateUser),
        arb_id().prop_map(Op::CreateAssistant),
        arb_id().prop_map(Op::CreateFunctionCall),
        arb_id().prop_map(Op::Delete),
        (arb_id(), 0u32..200).prop_map(|(i, ms)| Op::Truncate(i, ms)),
        (arb_id(), prop::collection::vec(any::<i16>(), 0..64))
            .prop_map(|(i, samples)| Op::AudioDelta(i, samples)),
        (arb_id(), "[a-z ]{0,12}").prop_map(|(i, t)| Op::InputTranscript(i, t)),
        (arb_id(), 0u32..1000).prop_map(|(i, ms)| Op::SpeechStarted(i, ms)),
        (arb_id(), 0u32..1000).prop_map(|(i, ms)| Op::SpeechStopped(i, ms)),
        (arb_id(), "[a-z{}:\"0-9]{0,8}").prop_map(|(i, d)| Op::ArgumentsDelta(i, d)),
        arb_id().prop_map(Op::ResponseCreated),
    ]
}

fn to_event(op: Op) -> RealtimeServerEvent {
    let builder = RealtimeServerEvent::builder("evt_prop");
    match op {
        Op::CreateUser(i) => builder.conversation_item_created(
            None,
            ConversationItem::user_message(vec![ContentPart::input_audio("")]).with_id(IDS[i]),
        ),
        Op::CreateAssistant(i) => builder.conversation_item_created(
            None,
            ConversationItem::assistant_message(vec![ContentPart::audio()]).with_id(IDS[i]),
        ),
        Op::CreateFunctionCall(i) => builder.conversation_item_created(
            None,
            ConversationItem::function_call("call", "tool", "").with_id(IDS[i]),
        ),
        Op::Delete(i) => builder.conversation_item_deleted(IDS[i]),
        Op::Truncate(i, ms) => builder.conversation_item_truncated(IDS[i], 0, ms),
        Op::AudioDelta(i, samples) => builder
            .for_response("resp")
            .for_item(IDS[i], 0)
            .for_content(0)
            .audio_delta(encode_pcm16(&samples)),
        Op::InputTranscript(i, t) => builder.input_audio_transcription_completed(IDS[i], 0, t),
        Op::SpeechStarted(i, ms) => builder.input_audio_buffer_speech_started(ms, IDS[i]),
        Op::SpeechStopped(i, ms) => builder.input_audio_buffer_speech_stopped(ms, IDS[i]),
        Op::ArgumentsDelta(i, d) => builder
            .for_response("resp")
            .for_item(IDS[i], 0)
            .function_call_arguments_delta("call", d),
        Op::ResponseCreated(i) => builder.response_created(Response::new(format!("resp_{i}"))),
    }
}

// ============================================================================
// Invariant Checks
// ============================================================================

fn check_store_invariants(conversation: &RealtimeConversation) -> Result<(), TestCaseError> {
    let store = conversation.store();

    let ids = store.item_ids();
    let unique: HashSet<&String> = ids.iter().collect();
    prop_assert_eq!(unique.len(), ids.len(), "duplicate item in order");
    for id in ids {
        prop_assert!(store.contains_item(id), "ordered id {} missing from map", id);
    }
    prop_assert_eq!(store.items().count(), ids.len());
    for id in IDS {
        let in_order = ids.iter().any(|i| i == id);
        prop_assert_eq!(store.contains_item(id), in_order);
    }

    let responses: Vec<&str> = conversation
        .responses()
        .iter()
        .map(|r| r.id.as_str())
        .collect();
    let unique: HashSet<&str> = responses.iter().copied().collect();
    prop_assert_eq!(unique.len(), responses.len(), "duplicate response");
    prop_assert_eq!(responses.len(), store.response_count());

    for item in conversation.items() {
        if let Some(tool) = &item.formatted.tool {
            if let ItemKind::FunctionCall { arguments, .. } = &item.kind {
                prop_assert_eq!(&tool.arguments, arguments);
            }
        }
    }
    Ok(())
}

/// Apply `op` to the expected live item order. Returns whether the engine
/// must accept the event, or `None` when either outcome is valid.
fn apply_to_model(live: &mut Vec<&'static str>, op: &Op) -> Option<bool> {
    match *op {
        Op::CreateUser(i) | Op::CreateAssistant(i) | Op::CreateFunctionCall(i) => {
            if !live.contains(&IDS[i]) {
                live.push(IDS[i]);
            }
            Some(true)
        }
        Op::Delete(i) => {
            let known = live.contains(&IDS[i]);
            live.retain(|id| *id != IDS[i]);
            Some(known)
        }
        Op::Truncate(i, _) => Some(live.contains(&IDS[i])),
        Op::InputTranscript(..)
        | Op::SpeechStarted(..)
        | Op::SpeechStopped(..)
        | Op::ResponseCreated(..) => Some(true),
        Op::AudioDelta(i, _) => Some(live.contains(&IDS[i])),
        // Also depends on the item kind, which the model does not track.
        Op::ArgumentsDelta(..) => None,
    }
}

/// Everything an event could write to.
#[derive(Debug, PartialEq)]
struct Snapshot {
    items: Vec<FormattedItem>,
    responses: Vec<Response>,
    speech: Vec<Option<PendingSpeech>>,
    transcripts: Vec<Option<String>>,
    queued_input_audio: Option<Vec<i16>>,
}

fn snapshot(conversation: &RealtimeConversation) -> Snapshot {
    let store = conversation.store();
    Snapshot {
        items: conversation.items().into_iter().cloned().collect(),
        responses: conversation.responses().into_iter().cloned().collect(),
        speech: IDS.iter().map(|id| store.pending_speech(id).cloned()).collect(),
        transcripts: IDS
            .iter()
            .map(|id| store.pending_transcript(id).map(str::to_string))
            .collect(),
        queued_input_audio: store.queued_input_audio().map(<[i16]>::to_vec),
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_store_invariants_hold(ops in prop::collection::vec(arb_op(), 0..40)) {
        let mut conversation = RealtimeConversation::new();
        let mut live: Vec<&'static str> = Vec::new();
        for op in ops {
            let must_succeed = apply_to_model(&mut live, &op);
            let succeeded = conversation.process(to_event(op.clone()), None).is_ok();
            if let Some(expected) = must_succeed {
                prop_assert_eq!(succeeded, expected, "unexpected outcome for {:?}", op);
            }
            check_store_invariants(&conversation)?;

            let ids: Vec<&str> = conversation
                .items()
                .into_iter()
                .map(|i| i.id.as_str())
                .collect();
            prop_assert_eq!(&ids, &live);
        }
    }

    #[test]
    fn prop_failed_events_do_not_mutate(ops in prop::collection::vec(arb_op(), 0..40)) {
        let mut conversation = RealtimeConversation::new();
        conversation.queue_input_audio(vec![1, 2, 3]);
        for op in ops {
            let before = snapshot(&conversation);
            let failed = conversation.process(to_event(op), None).is_err();
            if failed {
                prop_assert_eq!(before, snapshot(&conversation));
            }
        }
    }

    #[test]
    fn prop_duplicate_create_is_inert(
        ops in prop::collection::vec(arb_op(), 0..20),
        idx in arb_id(),
    ) {
        let mut conversation = RealtimeConversation::new();
        for op in ops {
            let _ = conversation.process(to_event(op), None);
        }
        let create = || to_event(Op::CreateAssistant(idx));
        let _ = conversation.process(create(), None);
        let before: Vec<_> = conversation.items().into_iter().cloned().collect();

        let result = conversation.process(create(), None);
        prop_assert!(result.is_ok());
        let after: Vec<_> = conversation.items().into_iter().cloned().collect();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn prop_audio_length_is_additive_and_truncation_floors(
        chunks in prop::collection::vec(prop::collection::vec(any::<i16>(), 0..128), 0..8),
        truncate_ms in 0u32..50,
    ) {
        let mut conversation = RealtimeConversation::new();
        prop_assert!(conversation.process(to_event(Op::CreateAssistant(0)), None).is_ok());

        let mut expected: Vec<i16> = Vec::new();
        for chunk in chunks {
            let delta = conversation
                .process(to_event(Op::AudioDelta(0, chunk.clone())), None)
                .map(|result| result.delta);
            prop_assert_eq!(delta.ok().flatten(), Some(ItemDelta::Audio(chunk.clone())));
            expected.extend_from_slice(&chunk);
        }
        let audio = conversation.item(IDS[0]).map(|i| &i.formatted.audio);
        prop_assert_eq!(audio, Some(&expected));

        prop_assert!(conversation.process(to_event(Op::Truncate(0, truncate_ms)), None).is_ok());
        let item = conversation.item(IDS[0]);
        let expected_len = expected.len().min(sample_index(truncate_ms));
        prop_assert_eq!(item.map(|i| i.formatted.audio.len()), Some(expected_len));
        prop_assert_eq!(item.map(|i| i.formatted.transcript.as_str()), Some(""));
    }
}
