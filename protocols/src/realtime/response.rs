//! The `response` object of `response.created` / `response.done`.

use serde::{Deserialize, Serialize};

use super::conversation::ConversationItem;
use super::session::{AudioFormat, MaxOutputTokens, Modality, ToolChoice, ToolDefinition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    InProgress,
    Completed,
    Cancelled,
    /// Cut short by interruption, token cap or content filter.
    Incomplete,
    Failed,
}

impl ResponseStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// Why a response ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseStatusDetails {
    Completed,
    Cancelled {
        /// `turn_detected` or `client_cancelled`
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    Incomplete {
        /// `interruption`, `max_output_tokens` or `content_filter`
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    Failed {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<ResponseError>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseError {
    #[serde(rename = "type")]
    pub error_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// Token accounting, present once the response is done.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseUsage {
    #[serde(default)]
    pub total_tokens: u32,
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
}

fn realtime_response() -> String {
    "realtime.response".to_string()
}

/// A model turn. `output` holds the item payloads as announced by
/// `response.output_item.added`, in output order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub id: String,
    #[serde(default = "realtime_response")]
    pub object: String,
    pub status: ResponseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_details: Option<ResponseStatusDetails>,
    #[serde(default)]
    pub output: Vec<ConversationItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<ResponseUsage>,

    // Per-response overrides, echoed back by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modalities: Option<Vec<Modality>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_audio_format: Option<AudioFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<MaxOutputTokens>,
}

impl Response {
    /// An empty, in-progress response.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            object: realtime_response(),
            status: ResponseStatus::InProgress,
            status_details: None,
            output: Vec::new(),
            usage: None,
            instructions: None,
            modalities: None,
            voice: None,
            output_audio_format: None,
            tools: None,
            tool_choice: None,
            temperature: None,
            max_output_tokens: None,
        }
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == ResponseStatus::InProgress
    }

    pub fn is_completed(&self) -> bool {
        self.status == ResponseStatus::Completed
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, ResponseStatus::Failed | ResponseStatus::Cancelled)
    }

    pub fn function_calls(&self) -> impl Iterator<Item = &ConversationItem> {
        self.output.iter().filter(|item| item.is_function_call())
    }
}
