#[cfg(test)]
#[path = "solace_test.rs"]
mod tests;

use async_trait::async_trait;
use futures::stream::StreamExt;
use futures::stream::TryStreamExt;
use reqwest::StatusCode;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::ApiError;
use crate::domain::models::ByteStream;
use crate::domain::models::ChatApi;
use crate::domain::models::ChatRequest;
use crate::domain::models::ChatSession;
use crate::domain::models::StartSessionResponse;

fn convert_err(err: reqwest::Error) -> std::io::Error {
    let err_msg = err.to_string();
    return std::io::Error::new(std::io::ErrorKind::Interrupted, err_msg);
}

fn check_status(res: reqwest::Response, path: &str) -> Result<reqwest::Response, ApiError> {
    let status = res.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        tracing::error!(status = status.as_u16(), path, "Request was not authorized");
        return Err(ApiError::Unauthorized);
    }

    if !status.is_success() {
        tracing::error!(status = status.as_u16(), path, "Request to Solace API failed");
        return Err(ApiError::Status {
            path: path.to_string(),
            status: status.as_u16(),
        });
    }

    return Ok(res);
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct LoginResponse {
    token: Option<String>,
    error: Option<String>,
}

pub struct SolaceApi {
    url: String,
    client: reqwest::Client,
}

impl Default for SolaceApi {
    fn default() -> SolaceApi {
        return SolaceApi::new(&Config::get(ConfigKey::ApiURL));
    }
}

impl SolaceApi {
    pub fn new(url: &str) -> SolaceApi {
        return SolaceApi {
            url: url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        };
    }

    fn endpoint(&self, path: &str) -> String {
        return format!("{url}{path}", url = self.url);
    }

    /// Exchanges a username and password for a bearer token. Login is the
    /// only unauthenticated call, and the backend answers failed attempts
    /// with an `error` field rather than a status code alone.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, ApiError> {
        let req = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        let res = self
            .client
            .post(self.endpoint("/login"))
            .json(&req)
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        let login_res = match serde_json::from_str::<LoginResponse>(&body) {
            Ok(login_res) => login_res,
            Err(err) => {
                if !status.is_success() {
                    return Err(ApiError::Status {
                        path: "/login".to_string(),
                        status: status.as_u16(),
                    });
                }
                return Err(ApiError::Decode(err));
            }
        };

        if let Some(token) = login_res.token {
            return Ok(token);
        }

        tracing::error!(status = status.as_u16(), "Login was rejected");
        return Err(ApiError::Rejected(
            login_res.error.unwrap_or_else(|| return "Login failed".to_string()),
        ));
    }
}

#[async_trait]
impl ChatApi for SolaceApi {
    #[allow(clippy::implicit_return)]
    async fn start_session(&self, token: &str) -> Result<String, ApiError> {
        let res = self
            .client
            .post(self.endpoint("/start_session"))
            .bearer_auth(token)
            .send()
            .await?;

        let body = check_status(res, "/start_session")?.text().await?;
        let session: StartSessionResponse = serde_json::from_str(&body)?;
        tracing::debug!(session_id = %session.session_id, "Started chat session");

        return Ok(session.session_id);
    }

    #[allow(clippy::implicit_return)]
    async fn history(&self, token: &str) -> Result<Vec<ChatSession>, ApiError> {
        let res = self
            .client
            .get(self.endpoint("/history"))
            .bearer_auth(token)
            .send()
            .await?;

        let body = check_status(res, "/history")?.text().await?;
        let sessions: Vec<ChatSession> = serde_json::from_str(&body)?;

        return Ok(sessions);
    }

    #[allow(clippy::implicit_return)]
    async fn chat(&self, token: &str, request: ChatRequest) -> Result<ByteStream, ApiError> {
        let res = self
            .client
            .post(self.endpoint("/chat"))
            .bearer_auth(token)
            .json(&request)
            .send()
            .await?;

        let res = check_status(res, "/chat")?;
        let stream = res.bytes_stream().map_err(convert_err).boxed();

        return Ok(stream);
    }
}
