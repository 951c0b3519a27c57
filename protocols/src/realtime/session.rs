//! Session payloads carried by `session.created` / `session.updated`.
//!
//! The conversation engine keeps the latest session as an opaque snapshot, so
//! these types only need to survive a deserialize/serialize cycle faithfully.

use serde::{Deserialize, Serialize};
use serde_json::Value;

fn realtime_session() -> String {
    "realtime.session".to_string()
}

fn function_tool() -> String {
    "function".to_string()
}

/// Server-side view of the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    #[serde(default = "realtime_session")]
    pub object: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Unix seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<u64>,
    #[serde(flatten)]
    pub config: SessionConfig,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            object: realtime_session(),
            model: None,
            expires_at: None,
            config: SessionConfig::default(),
        }
    }

    /// Whether the server emits `input_audio_buffer.speech_*` events.
    pub fn has_turn_detection(&self) -> bool {
        self.config.turn_detection.is_some()
    }
}

/// Tunable part of a session. Absent fields are left as the server has them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modalities: Option<Vec<Modality>>,
    /// Voice names are an open set (`alloy`, `verse`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_audio_format: Option<AudioFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_audio_format: Option<AudioFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_audio_transcription: Option<InputAudioTranscription>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turn_detection: Option<TurnDetection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_response_output_tokens: Option<MaxOutputTokens>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    Text,
    Audio,
}

/// `pcm16` is little-endian mono at 24kHz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioFormat {
    #[default]
    Pcm16,
    G711Ulaw,
    G711Alaw,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputAudioTranscription {
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnDetection {
    /// Volume-based voice activity detection.
    ServerVad {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        threshold: Option<f32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prefix_padding_ms: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        silence_duration_ms: Option<u32>,
    },
    /// Model-based end-of-turn detection.
    SemanticVad {
        /// `low`, `medium`, `high` or `auto`
        #[serde(default, skip_serializing_if = "Option::is_none")]
        eagerness: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    #[serde(rename = "type", default = "function_tool")]
    pub tool_type: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// JSON schema of the arguments object
    #[serde(default)]
    pub parameters: Value,
}

impl ToolDefinition {
    pub fn function(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            tool_type: function_tool(),
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// Either a mode string or `{"type": "function", "name": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolChoice {
    Mode(ToolChoiceMode),
    Function {
        #[serde(rename = "type", default = "function_tool")]
        choice_type: String,
        name: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolChoiceMode {
    #[default]
    Auto,
    None,
    Required,
}

impl ToolChoice {
    pub fn function(name: impl Into<String>) -> Self {
        Self::Function {
            choice_type: function_tool(),
            name: name.into(),
        }
    }
}

/// Output token cap: a positive count or the literal `"inf"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MaxOutputTokens {
    Limit(u32),
    Unbounded(Unbounded),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unbounded {
    #[serde(rename = "inf")]
    Inf,
}

impl MaxOutputTokens {
    pub const INF: Self = Self::Unbounded(Unbounded::Inf);

    pub fn limit(self) -> Option<u32> {
        match self {
            Self::Limit(n) => Some(n),
            Self::Unbounded(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_from_server_payload() {
        let json = r#"{
            "id": "sess_1",
            "object": "realtime.session",
            "model": "gpt-4o-realtime-preview",
            "modalities": ["text", "audio"],
            "voice": "verse",
            "input_audio_format": "pcm16",
            "input_audio_transcription": {"model": "whisper-1"},
            "turn_detection": {"type": "server_vad", "silence_duration_ms": 200},
            "tools": [],
            "tool_choice": "auto",
            "max_response_output_tokens": "inf"
        }"#;
        let session: Session = serde_json::from_str(json).unwrap();
        assert_eq!(session.config.voice.as_deref(), Some("verse"));
        assert_eq!(session.config.tool_choice, Some(ToolChoice::Mode(ToolChoiceMode::Auto)));
        assert_eq!(session.config.max_response_output_tokens, Some(MaxOutputTokens::INF));
        assert!(session.has_turn_detection());

        let back = serde_json::to_value(&session).unwrap();
        assert_eq!(back["turn_detection"]["type"], "server_vad");
        assert_eq!(back["max_response_output_tokens"], "inf");
        assert!(back.get("config").is_none());
    }

    #[test]
    fn test_disabled_features_are_null() {
        let session: Session = serde_json::from_str(
            r#"{"id": "sess_2", "turn_detection": null, "input_audio_transcription": null}"#,
        )
        .unwrap();
        assert_eq!(session, Session::new("sess_2"));
        assert!(!session.has_turn_detection());
    }

    #[test]
    fn test_semantic_vad() {
        let detection: TurnDetection =
            serde_json::from_str(r#"{"type": "semantic_vad", "eagerness": "low"}"#).unwrap();
        assert_eq!(
            detection,
            TurnDetection::SemanticVad {
                eagerness: Some("low".to_string())
            }
        );
    }

    #[test]
    fn test_tool_choice_function_shape() {
        let json = serde_json::to_value(ToolChoice::function("lookup")).unwrap();
        assert_eq!(json, serde_json::json!({"type": "function", "name": "lookup"}));
        let parsed: ToolChoice = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, ToolChoice::function("lookup"));
    }

    #[test]
    fn test_max_output_tokens() {
        let n: MaxOutputTokens = serde_json::from_str("512").unwrap();
        assert_eq!(n.limit(), Some(512));
        assert_eq!(MaxOutputTokens::INF.limit(), None);
        assert!(serde_json::from_str::<MaxOutputTokens>("\"lots\"").is_err());
        assert!(serde_json::from_str::<MaxOutputTokens>("-1").is_err());
    }
}
