#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::Sender;

/// A single chat line. Only the sender and text are kept client side, any
/// other fields the backend stores alongside a message are dropped on
/// deserialization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
}

impl Message {
    pub fn new(sender: Sender, text: &str) -> Message {
        return Message {
            sender,
            text: text.to_string(),
        };
    }

    pub fn user(text: &str) -> Message {
        return Message::new(Sender::User, text);
    }

    pub fn assistant(text: &str) -> Message {
        return Message::new(Sender::Assistant, text);
    }

    pub fn replace_text(&mut self, text: &str) {
        self.text = text.to_string();
    }
}
