#[cfg(test)]
#[path = "credentials_test.rs"]
mod tests;

use std::sync::Arc;

use anyhow::Result;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_derive::Deserialize;

pub type CredentialsBox = Arc<dyn CredentialProvider + Send + Sync>;

/// Storage for the bearer token handed out by `/login`.
pub trait CredentialProvider {
    fn get(&self) -> Option<String>;

    fn set(&self, token: &str) -> Result<()>;

    fn clear(&self) -> Result<()>;
}

#[derive(Deserialize)]
struct Claims {
    exp: Option<i64>,
}

/// Reads the `exp` claim of a JWT without verifying its signature. Tokens
/// that can't be decoded, or carry no expiry, count as expired.
pub fn token_expired(token: &str, now_millis: i64) -> bool {
    let payload = match token.split('.').nth(1) {
        Some(payload) => payload.trim_end_matches('='),
        None => return true,
    };

    let decoded = match URL_SAFE_NO_PAD.decode(payload) {
        Ok(decoded) => decoded,
        Err(_) => return true,
    };

    match serde_json::from_slice::<Claims>(&decoded) {
        Ok(Claims { exp: Some(exp) }) => return now_millis >= exp.saturating_mul(1000),
        _ => return true,
    }
}

/// Returns the stored token when it is present and unexpired. Expired tokens
/// are cleared from storage.
pub fn usable_token(credentials: &CredentialsBox) -> Option<String> {
    let token = credentials.get()?;
    if !token_expired(&token, chrono::Utc::now().timestamp_millis()) {
        return Some(token);
    }

    tracing::warn!("Stored token has expired");
    if let Err(err) = credentials.clear() {
        tracing::error!(error = ?err, "Failed to clear expired token");
    }

    return None;
}
