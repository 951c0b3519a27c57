//! Stored conversation items and their renderable view.

use realtime_protocol::realtime::{ContentPart, ConversationItem, ItemStatus, Role};
use serde::Serialize;

/// Accumulated tool-call state for a `function_call` item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormattedTool {
    #[serde(rename = "type")]
    pub tool_type: String,
    pub name: String,
    pub call_id: String,
    /// Concatenated `function_call_arguments.delta` fragments
    pub arguments: String,
}

/// Denormalized view of an item, kept current as deltas arrive so consumers
/// never rescan `content`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Formatted {
    /// PCM16 samples at 24kHz
    pub audio: Vec<i16>,
    pub text: String,
    pub transcript: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<FormattedTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

/// Kind-specific payload of a stored item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemKind {
    Message {
        role: Role,
        content: Vec<ContentPart>,
    },
    FunctionCall {
        call_id: Option<String>,
        name: String,
        arguments: String,
    },
    FunctionCallOutput {
        call_id: String,
        output: String,
    },
}

/// A conversation item as held by the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedItem {
    pub id: String,
    #[serde(flatten)]
    pub kind: ItemKind,
    pub status: ItemStatus,
    pub formatted: Formatted,
}

impl FormattedItem {
    /// Build an owned item from a wire payload, with an empty formatted view.
    ///
    /// Returns `None` for payloads without an ID or of an unknown type.
    pub fn from_payload(item: ConversationItem) -> Option<Self> {
        let (id, status, kind) = match item {
            ConversationItem::Message {
                id,
                status,
                role,
                content,
                ..
            } => (id, status, ItemKind::Message { role, content }),
            ConversationItem::FunctionCall {
                id,
                status,
                call_id,
                name,
                arguments,
                ..
            } => (
                id,
                status,
                ItemKind::FunctionCall {
                    call_id,
                    name,
                    arguments,
                },
            ),
            ConversationItem::FunctionCallOutput {
                id,
                status,
                call_id,
                output,
                ..
            } => (id, status, ItemKind::FunctionCallOutput { call_id, output }),
            ConversationItem::Unknown => return None,
        };
        let id = id.filter(|id| !id.is_empty())?;
        let status = status.unwrap_or_else(|| initial_status(&kind));
        Some(Self {
            id,
            kind,
            status,
            formatted: Formatted::default(),
        })
    }

    /// Role of the author, for messages
    pub fn role(&self) -> Option<Role> {
        match &self.kind {
            ItemKind::Message { role, .. } => Some(*role),
            _ => None,
        }
    }

    /// Content parts; empty for non-message items
    pub fn content(&self) -> &[ContentPart] {
        match &self.kind {
            ItemKind::Message { content, .. } => content,
            _ => &[],
        }
    }

    pub fn content_mut(&mut self) -> Option<&mut Vec<ContentPart>> {
        match &mut self.kind {
            ItemKind::Message { content, .. } => Some(content),
            _ => None,
        }
    }

    pub fn is_function_call(&self) -> bool {
        matches!(self.kind, ItemKind::FunctionCall { .. })
    }
}

/// Status an item takes on creation.
///
/// User messages and function outputs are born complete; everything the model
/// streams starts in progress.
pub fn initial_status(kind: &ItemKind) -> ItemStatus {
    match kind {
        ItemKind::Message {
            role: Role::User, ..
        }
        | ItemKind::FunctionCallOutput { .. } => ItemStatus::Completed,
        ItemKind::Message { .. } | ItemKind::FunctionCall { .. } => ItemStatus::InProgress,
    }
}

/// Incremental change produced by a delta event.
///
/// Serializes as `{"transcript": ...}`, `{"text": ...}`, `{"arguments": ...}`
/// or `{"audio": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemDelta {
    Transcript(String),
    Text(String),
    Arguments(String),
    /// Only the newly appended samples, never the full buffer
    Audio(Vec<i16>),
}
