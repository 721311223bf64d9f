#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::Message;

const PREVIEW_MAX_CHARS: usize = 50;

/// A conversation as returned by the history endpoint. Sessions are created
/// by the server, the client only ever appends to them by chatting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    pub session_id: String,
    #[serde(default, deserialize_with = "skip_unreadable_messages")]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub first_user_message: Option<String>,
}

/// Drops stored messages this client can't represent, such as other sender
/// roles or a missing text, instead of failing the whole history.
fn skip_unreadable_messages<'de, D>(deserializer: D) -> Result<Vec<Message>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let values = <Vec<serde_json::Value> as serde::Deserialize>::deserialize(deserializer)?;

    return Ok(values
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<Message>(value) {
            Ok(message) => return Some(message),
            Err(err) => {
                tracing::warn!(error = %err, "Skipping unreadable history message");
                return None;
            }
        })
        .collect());
}

impl ChatSession {
    pub fn new(session_id: &str) -> ChatSession {
        return ChatSession {
            session_id: session_id.to_string(),
            messages: vec![],
            first_user_message: None,
        };
    }

    /// Short title for session lists, the opening user message cut to 50
    /// characters.
    pub fn preview(&self) -> String {
        let first = match &self.first_user_message {
            Some(text) if !text.is_empty() => text,
            _ => return "Chat Session".to_string(),
        };

        if first.chars().count() <= PREVIEW_MAX_CHARS {
            return first.to_string();
        }

        let truncated = first.chars().take(PREVIEW_MAX_CHARS).collect::<String>();
        return format!("{truncated}...");
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartSessionResponse {
    pub session_id: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: String,
}
