//! Request and response types for the Zhipu GLM chat-completions API.
//!
//! All structs derive `Serialize` and `Deserialize` for JSON conversion in
//! the format expected by the `chat/completions` endpoint.

use serde::{Deserialize, Serialize};

/// Request body for the GLM `chat/completions` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model identifier (e.g. "glm-4.5-air").
    pub model: String,
    /// Messages composing the conversation (user and assistant turns).
    pub messages: Vec<ChatMessage>,
}

/// A single message in a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Sender role: "user" or "assistant".
    pub role: String,
    /// Textual content of the message.
    pub content: String,
}

/// Response returned by the GLM `chat/completions` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Unique response identifier assigned by the API.
    pub id: String,
    /// Model that produced the response.
    pub model: String,
    /// Generated completion choices (normally exactly one).
    pub choices: Vec<Choice>,
    /// Token usage statistics. Absent on some error-shaped responses.
    #[serde(default)]
    pub usage: Option<Usage>,
}

/// One completion choice within a response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    /// Position of this choice in the response.
    pub index: u32,
    /// The generated assistant message.
    pub message: ChatMessage,
    /// Why generation stopped (e.g. "stop", "length"). `None` if in progress.
    pub finish_reason: Option<String>,
}

/// Token consumption statistics for one API call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl ChatResponse {
    /// Text content of the first choice, if the response carries any.
    pub fn first_text(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_roundtrip() {
        let req = ChatRequest {
            model: "glm-4.5-air".into(),
            messages: vec![ChatMessage {
                role: "user".into(),
                content: "Hello".into(),
            }],
        };
        let json = serde_json::to_string(&req).unwrap();
        let parsed: ChatRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.model, "glm-4.5-air");
        assert_eq!(parsed.messages.len(), 1);
        assert_eq!(parsed.messages[0].role, "user");
        assert_eq!(parsed.messages[0].content, "Hello");
    }

    #[test]
    fn chat_response_deserialize_from_api_format() {
        let api_json = r#"{
            "id": "chatcmpl-123",
            "model": "glm-4.5-air",
            "choices": [
                {
                    "index": 0,
                    "message": {"role": "assistant", "content": "Response here"},
                    "finish_reason": "stop"
                }
            ],
            "usage": {"prompt_tokens": 5, "completion_tokens": 15, "total_tokens": 20}
        }"#;
        let resp: ChatResponse = serde_json::from_str(api_json).unwrap();
        assert_eq!(resp.id, "chatcmpl-123");
        assert_eq!(resp.first_text(), Some("Response here"));
        assert_eq!(resp.usage.unwrap().total_tokens, 20);
    }

    #[test]
    fn chat_response_without_choices() {
        let json = r#"{
            "id": "chatcmpl-456",
            "model": "glm-4.5-air",
            "choices": []
        }"#;
        let resp: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.first_text(), None);
        assert!(resp.usage.is_none());
    }

    #[test]
    fn chat_response_null_finish_reason() {
        let json = r#"{
            "id": "chatcmpl-789",
            "model": "glm-4.5-air",
            "choices": [
                {
                    "index": 0,
                    "message": {"role": "assistant", "content": "partial"},
                    "finish_reason": null
                }
            ]
        }"#;
        let resp: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.choices[0].finish_reason, None);
    }
}
