#[cfg(test)]
#[path = "file_test.rs"]
mod tests;

use std::fs;
use std::path::PathBuf;

use anyhow::Result;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::CredentialProvider;

/// Keeps the bearer token in a plain file so it survives between runs.
pub struct FileCredentials {
    pub file_path: PathBuf,
}

impl Default for FileCredentials {
    fn default() -> FileCredentials {
        return FileCredentials::new(PathBuf::from(Config::get(ConfigKey::TokenFile)));
    }
}

impl FileCredentials {
    pub fn new(file_path: PathBuf) -> FileCredentials {
        return FileCredentials { file_path };
    }
}

impl CredentialProvider for FileCredentials {
    fn get(&self) -> Option<String> {
        let contents = match fs::read_to_string(&self.file_path) {
            Ok(contents) => contents,
            Err(err) => {
                tracing::debug!(error = ?err, path = ?self.file_path, "No stored token");
                return None;
            }
        };

        let token = contents.trim();
        if token.is_empty() {
            return None;
        }

        return Some(token.to_string());
    }

    fn set(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(&self.file_path, token.trim())?;

        return Ok(());
    }

    fn clear(&self) -> Result<()> {
        if !self.file_path.exists() {
            return Ok(());
        }

        fs::remove_file(&self.file_path)?;

        return Ok(());
    }
}
