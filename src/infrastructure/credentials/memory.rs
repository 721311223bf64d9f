#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;

use std::sync::RwLock;

use anyhow::anyhow;
use anyhow::Result;

use crate::domain::models::CredentialProvider;

#[derive(Default)]
pub struct MemoryCredentials {
    token: RwLock<Option<String>>,
}

impl MemoryCredentials {
    pub fn new(token: Option<String>) -> MemoryCredentials {
        return MemoryCredentials {
            token: RwLock::new(token),
        };
    }
}

impl CredentialProvider for MemoryCredentials {
    fn get(&self) -> Option<String> {
        return self.token.read().ok().and_then(|token| return token.clone());
    }

    fn set(&self, token: &str) -> Result<()> {
        let mut guard = self
            .token
            .write()
            .map_err(|_| return anyhow!("Token lock was poisoned"))?;
        *guard = Some(token.to_string());

        return Ok(());
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self
            .token
            .write()
            .map_err(|_| return anyhow!("Token lock was poisoned"))?;
        *guard = None;

        return Ok(());
    }
}
