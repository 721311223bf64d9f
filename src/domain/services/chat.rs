#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;

use anyhow::Result;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tokio_util::io::StreamReader;

use crate::domain::models::parse_data_line;
use crate::domain::models::usable_token;
use crate::domain::models::ApiBox;
use crate::domain::models::ApiError;
use crate::domain::models::ByteStream;
use crate::domain::models::ChatRequest;
use crate::domain::models::ChatSession;
use crate::domain::models::CredentialsBox;
use crate::domain::models::Event;
use crate::domain::models::Message;
use crate::domain::models::StreamingState;
use crate::domain::models::STREAM_ERROR_TEXT;

pub const SESSION_ERROR_TEXT: &str = "Could not start a new chat session. Please try again.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// Empty input, or a reply is still streaming. Nothing was changed.
    Ignored,
    /// No usable token. Nothing was changed.
    Unauthorized,
    /// A session could not be created. Nothing was appended.
    SessionFailed,
    Completed,
    /// The reply failed and now holds the fixed error text.
    Failed,
}

/// Owns the visible transcript and the session list for one chat view.
///
/// The transcript is provisional: messages are appended optimistically while
/// chatting, and only the history list reflects what the backend stored.
/// History reloads never rewrite the visible transcript.
pub struct ChatService {
    api: ApiBox,
    credentials: CredentialsBox,
    tx: mpsc::UnboundedSender<Event>,
    history: Vec<ChatSession>,
    messages: Vec<Message>,
    selected_session_id: Option<String>,
    session_id: Option<String>,
    streaming: StreamingState,
}

impl ChatService {
    pub fn new(
        api: ApiBox,
        credentials: CredentialsBox,
        tx: mpsc::UnboundedSender<Event>,
    ) -> ChatService {
        return ChatService {
            api,
            credentials,
            tx,
            history: vec![],
            messages: vec![],
            selected_session_id: None,
            session_id: None,
            streaming: StreamingState::default(),
        };
    }

    pub fn messages(&self) -> &[Message] {
        return &self.messages;
    }

    pub fn history(&self) -> &[ChatSession] {
        return &self.history;
    }

    pub fn session_id(&self) -> Option<&str> {
        return self.session_id.as_deref();
    }

    pub fn selected_session_id(&self) -> Option<&str> {
        return self.selected_session_id.as_deref();
    }

    pub fn is_streaming(&self) -> bool {
        return self.streaming.is_active();
    }

    fn token(&self) -> Result<Option<String>> {
        let token = usable_token(&self.credentials);
        if token.is_none() {
            self.tx.send(Event::Unauthorized())?;
        }

        return Ok(token);
    }

    fn handle_unauthorized(&self) -> Result<()> {
        if let Err(err) = self.credentials.clear() {
            tracing::error!(error = ?err, "Failed to clear rejected token");
        }
        self.tx.send(Event::Unauthorized())?;

        return Ok(());
    }

    /// Replaces the session list with the backend's copy. Failures leave an
    /// empty list behind and are only logged.
    pub async fn load_history(&mut self) -> Result<&[ChatSession]> {
        self.history = match self.token()? {
            Some(token) => match self.api.history(&token).await {
                Ok(sessions) => sessions,
                Err(ApiError::Unauthorized) => {
                    self.handle_unauthorized()?;
                    vec![]
                }
                Err(err) => {
                    tracing::error!(error = ?err, "Failed to load chat history");
                    vec![]
                }
            },
            None => vec![],
        };

        tracing::debug!(sessions = self.history.len(), "Loaded chat history");
        self.tx.send(Event::HistoryLoaded(self.history.clone()))?;

        return Ok(&self.history);
    }

    async fn create_session(&mut self, token: &str) -> Result<Option<String>> {
        let session_id = match self.api.start_session(token).await {
            Ok(session_id) => session_id,
            Err(err) => {
                tracing::error!(error = ?err, "Failed to start chat session");
                if let ApiError::Unauthorized = err {
                    self.handle_unauthorized()?;
                }
                self.tx.send(Event::Alert(SESSION_ERROR_TEXT.to_string()))?;
                return Ok(None);
            }
        };

        self.session_id = Some(session_id.to_string());
        self.selected_session_id = Some(session_id.to_string());
        self.tx.send(Event::SessionResolved(session_id.to_string()))?;
        self.load_history().await?;

        return Ok(Some(session_id));
    }

    /// Starts a fresh server session and clears the visible transcript.
    pub async fn start_new_session(&mut self) -> Result<bool> {
        let token = match self.token()? {
            Some(token) => token,
            None => return Ok(false),
        };

        if self.create_session(&token).await?.is_none() {
            return Ok(false);
        }

        self.messages = vec![];
        self.tx.send(Event::TranscriptReplaced(vec![]))?;

        return Ok(true);
    }

    /// Switches the visible transcript to a loaded session, or to an empty
    /// one when `session_id` is `None`.
    ///
    /// An id missing from the loaded history also yields an empty transcript
    /// while the id stays current, so the next send continues that session.
    pub fn select_session(&mut self, session_id: Option<&str>) -> Result<()> {
        self.session_id = session_id.map(|id| return id.to_string());
        self.selected_session_id = self.session_id.clone();

        self.messages = match session_id {
            Some(id) => self
                .history
                .iter()
                .find(|session| return session.session_id == id)
                .map(|session| {
                    return session
                        .messages
                        .iter()
                        .map(|message| return Message::new(message.sender, &message.text))
                        .collect::<Vec<Message>>();
                })
                .unwrap_or_default(),
            None => vec![],
        };

        self.tx.send(Event::TranscriptReplaced(self.messages.clone()))?;

        return Ok(());
    }

    /// Sends a message and streams the reply into the transcript. Network
    /// failures never surface as errors here, they become transcript or
    /// alert state. `Err` is only returned when the event channel is gone.
    pub async fn send(&mut self, text: &str) -> Result<SendOutcome> {
        let text = text.trim();
        if text.is_empty() || self.streaming.is_active() {
            tracing::debug!(
                streaming = self.streaming.is_active(),
                "Ignoring message send"
            );
            return Ok(SendOutcome::Ignored);
        }

        let token = match self.token()? {
            Some(token) => token,
            None => return Ok(SendOutcome::Unauthorized),
        };

        let session_id = match self.session_id.clone() {
            Some(session_id) => session_id,
            None => match self.create_session(&token).await? {
                Some(session_id) => session_id,
                None => return Ok(SendOutcome::SessionFailed),
            },
        };

        self.begin_exchange(text, &session_id)?;

        let req = ChatRequest {
            message: text.to_string(),
            session_id,
        };

        let outcome = match self.api.chat(&token, req).await {
            Ok(stream) => self.consume_stream(stream).await?,
            Err(err) => {
                tracing::error!(error = ?err, "Failed to send chat message");
                if let ApiError::Unauthorized = err {
                    self.handle_unauthorized()?;
                }
                self.fail_exchange()?;
                SendOutcome::Failed
            }
        };

        self.load_history().await?;

        return Ok(outcome);
    }

    async fn consume_stream(&mut self, stream: ByteStream) -> Result<SendOutcome> {
        let mut lines_reader = StreamReader::new(stream).lines();

        loop {
            match lines_reader.next_line().await {
                Ok(Some(line)) => self.apply_line(&line)?,
                Ok(None) => {
                    self.finish_exchange()?;
                    return Ok(SendOutcome::Completed);
                }
                Err(err) => {
                    tracing::error!(error = ?err, "Chat stream failed");
                    self.fail_exchange()?;
                    return Ok(SendOutcome::Failed);
                }
            }
        }
    }

    fn begin_exchange(&mut self, text: &str, session_id: &str) -> Result<()> {
        let user_message = Message::user(text);
        let assistant_message = Message::assistant("");

        self.messages.push(user_message.clone());
        self.messages.push(assistant_message.clone());
        self.streaming.begin(session_id, self.messages.len() - 1);

        self.tx.send(Event::MessageAppended(user_message))?;
        self.tx.send(Event::MessageAppended(assistant_message))?;

        return Ok(());
    }

    fn apply_line(&mut self, line: &str) -> Result<()> {
        let payload = match parse_data_line(line) {
            Some(payload) => payload,
            None => {
                tracing::debug!(line, "Skipping stream line");
                return Ok(());
            }
        };

        let text = self.streaming.push(payload).to_string();
        if let Some(message) = self
            .streaming
            .target()
            .and_then(|idx| return self.messages.get_mut(idx))
        {
            message.replace_text(&text);
        }

        self.tx.send(Event::AssistantText(text))?;

        return Ok(());
    }

    fn finish_exchange(&mut self) -> Result<()> {
        tracing::debug!(
            session_id = self.streaming.session_id(),
            chars = self.streaming.buffer().len(),
            "Chat stream finished"
        );
        self.streaming.finish();
        self.tx.send(Event::StreamFinished())?;

        return Ok(());
    }

    fn fail_exchange(&mut self) -> Result<()> {
        if let Some(message) = self
            .streaming
            .finish()
            .and_then(|idx| return self.messages.get_mut(idx))
        {
            message.replace_text(STREAM_ERROR_TEXT);
        }

        self.tx
            .send(Event::AssistantFailed(STREAM_ERROR_TEXT.to_string()))?;

        return Ok(());
    }
}
