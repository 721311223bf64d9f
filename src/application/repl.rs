#[cfg(test)]
#[path = "repl_test.rs"]
mod tests;

use std::io::Write;

use anyhow::Result;
use owo_colors::OwoColorize;
use owo_colors::Stream;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use tokio::sync::mpsc;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::ChatSession;
use crate::domain::models::Event;
use crate::domain::models::Sender;
use crate::domain::models::SlashCommand;
use crate::domain::services::ChatService;

pub fn help_text() -> String {
    let text = r#"
COMMANDS:
- /new (/n) - Start a fresh conversation.
- /sessions (/ls) - List your past conversations.
- /select (/s) [NUMBER,SESSION_ID] - Switch to a past conversation. Pass either the number shown by /sessions or its session ID.
- /clear (/c) - Leave the current conversation. Your next message starts a new one.
- /quit /exit (/q) - Exit Solace.
- /help (/h) - Provides this help menu.

Anything else you type is sent to Solace. While a reply is still arriving, new messages are ignored.
        "#;

    return text.trim().to_string();
}

pub fn format_sessions(sessions: &[ChatSession], selected: Option<&str>) -> String {
    if sessions.is_empty() {
        return "There are no conversations yet. Say hello to start one!".to_string();
    }

    return sessions
        .iter()
        .enumerate()
        .map(|(idx, session)| {
            let n = idx + 1;
            let marker = if selected == Some(session.session_id.as_str()) {
                "*"
            } else {
                "-"
            };
            return format!(
                "{marker} ({n}) {} (ID: {})",
                session.preview(),
                session.session_id
            );
        })
        .collect::<Vec<String>>()
        .join("\n");
}

/// Maps a `/select` argument to a session id. Numbers index into the listed
/// sessions, anything else is taken as an id as-is.
pub fn resolve_session_ref(sessions: &[ChatSession], arg: &str) -> String {
    if let Ok(idx) = arg.parse::<usize>() {
        if idx >= 1 && idx <= sessions.len() {
            return sessions[idx - 1].session_id.to_string();
        }
    }

    return arg.to_string();
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Output {
    Text(String),
    Notice(String),
    Error(String),
}

/// Turns chat events into terminal output. Streamed replies arrive as the
/// whole text so far, only the unseen tail is printed.
#[derive(Default)]
pub struct Transcript {
    mid_line: bool,
    streamed: usize,
}

impl Transcript {
    fn line_break(&mut self) -> &'static str {
        if self.mid_line {
            self.mid_line = false;
            self.streamed = 0;
            return "\n";
        }

        return "";
    }

    pub fn render(&mut self, event: &Event) -> Option<Output> {
        match event {
            Event::Alert(text) => {
                let prefix = self.line_break();
                return Some(Output::Error(format!("{prefix}{text}\n")));
            }
            Event::AssistantText(text) => {
                let delta = text.get(self.streamed..).unwrap_or_default();
                self.streamed = text.len();
                if delta.is_empty() {
                    return None;
                }
                return Some(Output::Text(delta.to_string()));
            }
            Event::AssistantFailed(text) => {
                // Nothing streamed yet, the error can follow the name label.
                let prefix = if self.streamed == 0 {
                    self.mid_line = false;
                    ""
                } else {
                    self.line_break()
                };
                return Some(Output::Error(format!("{prefix}{text}\n")));
            }
            Event::HistoryLoaded(_) => {
                return None;
            }
            Event::MessageAppended(message) => {
                if message.sender == Sender::User {
                    return None;
                }
                self.mid_line = true;
                self.streamed = 0;
                return Some(Output::Text(format!("{}: {}", message.sender, message.text)));
            }
            Event::SessionResolved(session_id) => {
                let prefix = self.line_break();
                return Some(Output::Notice(format!(
                    "{prefix}Conversation {session_id} started.\n"
                )));
            }
            Event::StreamFinished() => {
                let line_break = self.line_break();
                if line_break.is_empty() {
                    return None;
                }
                return Some(Output::Text(line_break.to_string()));
            }
            Event::TranscriptReplaced(messages) => {
                let prefix = self.line_break();
                if messages.is_empty() {
                    return Some(Output::Notice(format!(
                        "{prefix}Starting with a clean slate.\n"
                    )));
                }

                let transcript = messages
                    .iter()
                    .map(|message| return format!("{}: {}\n", message.sender, message.text))
                    .collect::<Vec<String>>()
                    .join("");
                return Some(Output::Text(format!("{prefix}{transcript}")));
            }
            Event::Unauthorized() => {
                let prefix = self.line_break();
                return Some(Output::Error(format!(
                    "{prefix}You're not signed in, or your session expired. Run `solace login` to sign in again.\n"
                )));
            }
        }
    }
}

fn print_output(output: Output) -> Result<()> {
    let mut stdout = std::io::stdout();
    match output {
        Output::Text(text) => {
            write!(stdout, "{text}")?;
        }
        Output::Notice(text) => {
            write!(
                stdout,
                "{}",
                text.if_supports_color(Stream::Stdout, |e| return e.dimmed())
            )?;
        }
        Output::Error(text) => {
            write!(
                stdout,
                "{}",
                text.if_supports_color(Stream::Stdout, |e| return e.red())
            )?;
        }
    }
    stdout.flush()?;

    return Ok(());
}

async fn render_events(mut rx: mpsc::UnboundedReceiver<Event>) -> Result<()> {
    let mut transcript = Transcript::default();
    while let Some(event) = rx.recv().await {
        if let Some(output) = transcript.render(&event) {
            print_output(output)?;
        }
    }

    return Ok(());
}

/// Returns `true` when the input loop should stop.
async fn handle_slash_command(chat: &mut ChatService, command: SlashCommand) -> Result<bool> {
    if command.is_quit() {
        return Ok(true);
    }

    if command.is_help() {
        print_output(Output::Notice(format!("{}\n", help_text())))?;
    } else if command.is_new_session() {
        chat.start_new_session().await?;
    } else if command.is_session_list() {
        chat.load_history().await?;
        let list = format_sessions(chat.history(), chat.selected_session_id());
        print_output(Output::Text(format!("{list}\n")))?;
    } else if command.is_session_select() {
        match command.args.first() {
            Some(arg) => {
                let session_id = resolve_session_ref(chat.history(), arg);
                chat.select_session(Some(&session_id))?;
            }
            None => {
                print_output(Output::Error(
                    "You must pass a number or session ID to /select. Run /sessions to list them.\n"
                        .to_string(),
                ))?;
            }
        }
    } else if command.is_clear() {
        chat.select_session(None)?;
    }

    return Ok(false);
}

/// A line typed while a reply is still streaming.
pub enum Interjection {
    Command(SlashCommand),
    Blank,
    /// Chat text, which the send latch would ignore.
    Dropped,
}

pub fn interjection(line: &str) -> Interjection {
    if let Some(command) = SlashCommand::parse(line) {
        return Interjection::Command(command);
    }

    if line.trim().is_empty() {
        return Interjection::Blank;
    }

    return Interjection::Dropped;
}

/// Sends one message while still draining stdin. Chat text typed before the
/// reply finishes is dropped, `/help` is answered immediately and other
/// commands run once the reply is done. Returns `true` when the input loop
/// should stop.
async fn send_message<R>(
    chat: &mut ChatService,
    lines: &mut tokio::io::Lines<R>,
    text: &str,
) -> Result<bool>
where
    R: tokio::io::AsyncBufRead + Unpin,
{
    let mut deferred = vec![];
    let mut closed = false;

    {
        let send = chat.send(text);
        tokio::pin!(send);

        loop {
            tokio::select! {
                res = &mut send => {
                    let outcome = res?;
                    tracing::debug!(outcome = ?outcome, "Message send finished");
                    break;
                }
                line = lines.next_line(), if !closed => {
                    let line = match line? {
                        Some(line) => line,
                        None => {
                            closed = true;
                            continue;
                        }
                    };

                    match interjection(&line) {
                        Interjection::Command(command) if command.is_help() => {
                            print_output(Output::Notice(format!("\n{}\n", help_text())))?;
                        }
                        Interjection::Command(command) => {
                            deferred.push(command);
                        }
                        Interjection::Blank => {}
                        Interjection::Dropped => {
                            tracing::warn!(chars = line.len(), "Ignoring input while a reply is streaming");
                            print_output(Output::Notice(
                                "\n(still replying, that message was not sent)\n".to_string(),
                            ))?;
                        }
                    }
                }
            }
        }
    }

    for command in deferred {
        if handle_slash_command(chat, command).await? {
            return Ok(true);
        }
    }

    return Ok(closed);
}

pub async fn start(mut chat: ChatService, rx: mpsc::UnboundedReceiver<Event>) -> Result<()> {
    let renderer = tokio::spawn(render_events(rx));

    print_output(Output::Text(format!(
        "{}: Hey there! What's on your mind today? Type /help to see what I can do.\n",
        Sender::Assistant
    )))?;

    chat.load_history().await?;
    let session_id = Config::get(ConfigKey::SessionID);
    if !session_id.is_empty() {
        let session_id = resolve_session_ref(chat.history(), &session_id);
        chat.select_session(Some(&session_id))?;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        if let Some(command) = SlashCommand::parse(&line) {
            if handle_slash_command(&mut chat, command).await? {
                break;
            }
            continue;
        }

        if send_message(&mut chat, &mut lines, &line).await? {
            break;
        }
    }

    drop(chat);
    renderer.await??;

    return Ok(());
}
