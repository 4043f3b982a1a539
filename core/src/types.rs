use serde::{Deserialize, Serialize};
use std::fmt;

/// Who produced a turn in the conversation.
///
/// Serialized with the role names the Gemini API expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Model,
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Speaker::User => write!(f, "user"),
            Speaker::Model => write!(f, "model"),
        }
    }
}

/// A piece of text inside a turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextPart {
    pub text: String,
}

/// One message of a conversation, in the shape the generateContent API takes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Speaker,
    pub parts: Vec<TextPart>,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Speaker::User, text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::new(Speaker::Model, text)
    }

    fn new(role: Speaker, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![TextPart { text: text.into() }],
        }
    }

    /// Concatenated text of all parts
    pub fn text(&self) -> String {
        self.parts.iter().map(|p| p.text.as_str()).collect()
    }
}

/// System instruction block of a generateContent request
#[derive(Serialize, Clone, Debug)]
pub struct SystemInstruction {
    pub parts: Vec<TextPart>,
}

impl SystemInstruction {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![TextPart { text: text.into() }],
        }
    }
}

/// Request to Gemini API to generate content
#[derive(Serialize, Debug)]
pub struct GenerateContentRequest {
    pub contents: Vec<Turn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<SystemInstruction>,
}

/// Response from Gemini API
#[derive(Deserialize, Debug)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(rename = "usageMetadata", default)]
    pub usage_metadata: Option<UsageMetadata>,
}

/// Candidate in the response
#[derive(Deserialize, Debug)]
pub struct Candidate {
    pub content: Option<ContentResponsePart>,
    #[serde(rename = "finishReason", default)]
    pub finish_reason: Option<String>,
}

/// Content part in the response
#[derive(Deserialize, Debug)]
pub struct ContentResponsePart {
    #[serde(default)]
    pub parts: Vec<PartResponse>,
    pub role: Option<String>,
}

/// Part response from the API
#[derive(Deserialize, Debug)]
pub struct PartResponse {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct UsageMetadata {
    #[serde(rename = "promptTokenCount", default)]
    pub prompt_token_count: u32,
    #[serde(rename = "candidatesTokenCount", default)]
    pub candidates_token_count: u32,
    #[serde(rename = "totalTokenCount", default)]
    pub total_token_count: u32,
}

/// Error body returned by Google APIs on non-2xx responses
#[derive(Deserialize, Debug)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Deserialize, Debug)]
pub struct ApiErrorDetail {
    pub code: u16,
    pub message: String,
    #[serde(default)]
    pub status: String,
}

/// Request to the embedContent endpoint
#[derive(Serialize, Debug)]
pub struct EmbedContentRequest {
    pub model: String,
    pub content: EmbedContent,
    #[serde(rename = "taskType")]
    pub task_type: &'static str,
}

#[derive(Serialize, Debug)]
pub struct EmbedContent {
    pub parts: Vec<TextPart>,
}

/// Response from the embedContent endpoint
#[derive(Deserialize, Debug)]
pub struct EmbedContentResponse {
    pub embedding: ContentEmbedding,
}

#[derive(Deserialize, Debug)]
pub struct ContentEmbedding {
    #[serde(default)]
    pub values: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_turn_serializes_with_api_roles() {
        let value = serde_json::to_value(Turn::model("A stack is LIFO.")).unwrap();
        assert_eq!(
            value,
            json!({ "role": "model", "parts": [{ "text": "A stack is LIFO." }] })
        );
    }

    #[test]
    fn test_request_omits_empty_options() {
        let request = GenerateContentRequest {
            contents: vec![Turn::user("What is a stack?")],
            system_instruction: None,
        };
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["contents"][0]["role"], "user");
        assert!(value.get("system_instruction").is_none());
    }

    #[test]
    fn test_turn_text_joins_parts() {
        let turn = Turn {
            role: Speaker::User,
            parts: vec![
                TextPart { text: "What is ".to_string() },
                TextPart { text: "a queue?".to_string() },
            ],
        };
        assert_eq!(turn.text(), "What is a queue?");
        assert_eq!(turn.role.to_string(), "user");
    }
}
