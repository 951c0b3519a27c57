//! Conversation items and their content parts.
//!
//! [`ConversationItem`] is the payload of `conversation.item.created` and of
//! both `response.output_item.*` events. IDs and statuses are optional on the
//! wire: clients may omit them, and the server fills them in.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Completed,
    InProgress,
    Incomplete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConversationItem {
    Message {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        /// `realtime.item`
        #[serde(skip_serializing_if = "Option::is_none")]
        object: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<ItemStatus>,
        role: Role,
        #[serde(default)]
        content: Vec<ContentPart>,
    },
    FunctionCall {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        object: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<ItemStatus>,
        /// Pairs the call with its `function_call_output`.
        #[serde(skip_serializing_if = "Option::is_none")]
        call_id: Option<String>,
        #[serde(default)]
        name: String,
        /// JSON text; streamed in fragments while the call is in progress.
        #[serde(default)]
        arguments: String,
    },
    FunctionCallOutput {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        object: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<ItemStatus>,
        call_id: String,
        output: String,
    },
    #[serde(other)]
    Unknown,
}

impl ConversationItem {
    fn message(role: Role, content: Vec<ContentPart>) -> Self {
        Self::Message {
            id: None,
            object: None,
            status: None,
            role,
            content,
        }
    }

    pub fn user_message(content: Vec<ContentPart>) -> Self {
        Self::message(Role::User, content)
    }

    pub fn user_text(text: impl Into<String>) -> Self {
        Self::user_message(vec![ContentPart::input_text(text)])
    }

    pub fn assistant_message(content: Vec<ContentPart>) -> Self {
        Self::message(Role::Assistant, content)
    }

    pub fn system_text(text: impl Into<String>) -> Self {
        Self::message(Role::System, vec![ContentPart::input_text(text)])
    }

    pub fn function_call(
        call_id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self::FunctionCall {
            id: None,
            object: None,
            status: None,
            call_id: Some(call_id.into()),
            name: name.into(),
            arguments: arguments.into(),
        }
    }

    pub fn function_output(call_id: impl Into<String>, output: impl Into<String>) -> Self {
        Self::FunctionCallOutput {
            id: None,
            object: None,
            status: None,
            call_id: call_id.into(),
            output: output.into(),
        }
    }

    pub fn with_id(mut self, item_id: impl Into<String>) -> Self {
        if let Some(id) = self.id_slot() {
            *id = Some(item_id.into());
        }
        self
    }

    pub fn with_status(mut self, item_status: ItemStatus) -> Self {
        if let Self::Message { status, .. }
        | Self::FunctionCall { status, .. }
        | Self::FunctionCallOutput { status, .. } = &mut self
        {
            *status = Some(item_status);
        }
        self
    }

    fn id_slot(&mut self) -> Option<&mut Option<String>> {
        match self {
            Self::Message { id, .. }
            | Self::FunctionCall { id, .. }
            | Self::FunctionCallOutput { id, .. } => Some(id),
            Self::Unknown => None,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Message { id, .. }
            | Self::FunctionCall { id, .. }
            | Self::FunctionCallOutput { id, .. } => id.as_deref(),
            Self::Unknown => None,
        }
    }

    pub fn status(&self) -> Option<ItemStatus> {
        match self {
            Self::Message { status, .. }
            | Self::FunctionCall { status, .. }
            | Self::FunctionCallOutput { status, .. } => *status,
            Self::Unknown => None,
        }
    }

    pub fn role(&self) -> Option<Role> {
        match self {
            Self::Message { role, .. } => Some(*role),
            _ => None,
        }
    }

    pub fn is_function_call(&self) -> bool {
        matches!(self, Self::FunctionCall { .. })
    }
}

/// One part of a message's content.
///
/// User and system messages carry `input_*` parts, assistant messages carry
/// `text` / `audio` (also accepted as `output_text` / `output_audio`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    InputText {
        text: String,
    },
    InputAudio {
        /// Base64 PCM16
        #[serde(default, skip_serializing_if = "Option::is_none")]
        audio: Option<String>,
        /// `null` until transcription completes
        #[serde(default)]
        transcript: Option<String>,
    },
    #[serde(alias = "output_text")]
    Text {
        #[serde(default)]
        text: String,
    },
    #[serde(alias = "output_audio")]
    Audio {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        audio: Option<String>,
        #[serde(default)]
        transcript: Option<String>,
    },
    #[serde(other)]
    Unknown,
}

impl ContentPart {
    pub fn input_text(text: impl Into<String>) -> Self {
        Self::InputText { text: text.into() }
    }

    pub fn input_audio(audio: impl Into<String>) -> Self {
        Self::InputAudio {
            audio: Some(audio.into()),
            transcript: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Empty assistant audio part, as the server announces it.
    pub fn audio() -> Self {
        Self::Audio {
            audio: None,
            transcript: Some(String::new()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::InputText { text } | Self::Text { text } => Some(text),
            _ => None,
        }
    }

    pub fn transcript(&self) -> Option<&str> {
        self.transcript_field().and_then(|t| t.as_deref())
    }

    fn transcript_field(&self) -> Option<&Option<String>> {
        match self {
            Self::InputAudio { transcript, .. } | Self::Audio { transcript, .. } => {
                Some(transcript)
            }
            _ => None,
        }
    }

    fn transcript_field_mut(&mut self) -> Option<&mut Option<String>> {
        match self {
            Self::InputAudio { transcript, .. } | Self::Audio { transcript, .. } => {
                Some(transcript)
            }
            _ => None,
        }
    }

    /// Returns `false` for parts without a transcript.
    pub fn set_transcript(&mut self, value: impl Into<String>) -> bool {
        match self.transcript_field_mut() {
            Some(slot) => {
                *slot = Some(value.into());
                true
            }
            None => false,
        }
    }

    /// Returns `false` for parts without a transcript.
    pub fn push_transcript(&mut self, delta: &str) -> bool {
        match self.transcript_field_mut() {
            Some(slot) => {
                slot.get_or_insert_with(String::new).push_str(delta);
                true
            }
            None => false,
        }
    }

    /// Returns `false` for parts without text.
    pub fn push_text(&mut self, delta: &str) -> bool {
        match self {
            Self::InputText { text } | Self::Text { text } => {
                text.push_str(delta);
                true
            }
            _ => false,
        }
    }
}
