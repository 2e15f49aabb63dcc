use serde::{ Serialize, Deserialize };
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into(), timestamp: None }
    }

    /// Reads one widget message leniently. Anything that is not `"user"` is
    /// treated as the assistant; missing or non-string content reads as `""`.
    pub fn from_value(value: &Value) -> Self {
        let role = match value.get("role").and_then(Value::as_str) {
            Some("user") => Role::User,
            _ => Role::Assistant,
        };
        let content = value.get("content").and_then(Value::as_str).unwrap_or_default().to_string();
        let timestamp = value.get("timestamp").and_then(Value::as_i64);
        Self { role, content, timestamp }
    }
}

/// Extracts the `messages` array of a chat request body. `None` when the field
/// is missing or is not an array.
pub fn parse_messages(body: &Value) -> Option<Vec<ChatMessage>> {
    body.get("messages")
        .and_then(Value::as_array)
        .map(|messages| messages.iter().map(ChatMessage::from_value).collect())
}

/// The utterance a turn answers: the last message's content, or `""`.
pub fn last_utterance(messages: &[ChatMessage]) -> &str {
    messages.last().map(|m| m.content.as_str()).unwrap_or_default()
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
