use std::io;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use thiserror::Error;

use super::ChatRequest;
use super::ChatSession;

/// Raw body of a streamed chat reply.
pub type ByteStream = BoxStream<'static, io::Result<Bytes>>;

pub type ApiBox = Box<dyn ChatApi + Send + Sync>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not authorized, please log in again")]
    Unauthorized,

    #[error("Request to {path} failed with status {status}")]
    Status { path: String, status: u16 },

    #[error("{0}")]
    Rejected(String),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[async_trait]
pub trait ChatApi {
    /// Creates a new server side conversation and returns its identifier.
    async fn start_session(&self, token: &str) -> Result<String, ApiError>;

    /// Lists every session for the authenticated user, each with its stored
    /// messages, in the order the backend returns them.
    async fn history(&self, token: &str) -> Result<Vec<ChatSession>, ApiError>;

    /// Sends a user message. The reply body is returned unread so callers can
    /// consume it as it arrives.
    async fn chat(&self, token: &str, request: ChatRequest) -> Result<ByteStream, ApiError>;
}
