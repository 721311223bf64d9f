use super::ChatSession;
use super::Message;

/// State changes published by the chat service for the terminal to render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Alert(String),
    /// Cumulative text of the reply currently streaming in.
    AssistantText(String),
    AssistantFailed(String),
    HistoryLoaded(Vec<ChatSession>),
    MessageAppended(Message),
    SessionResolved(String),
    StreamFinished(),
    TranscriptReplaced(Vec<Message>),
    Unauthorized(),
}
