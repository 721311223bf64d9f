mod file;
mod memory;

use std::sync::Arc;

pub use file::*;
pub use memory::*;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::CredentialsBox;

pub struct CredentialsManager {}

impl CredentialsManager {
    /// A token passed through `--token` or `SOLACE_TOKEN` lives only for the
    /// current process. Otherwise the token file written by `solace login`
    /// is used.
    pub fn get() -> CredentialsBox {
        let token = Config::get(ConfigKey::Token);
        if !token.is_empty() {
            return Arc::new(MemoryCredentials::new(Some(token)));
        }

        return Arc::new(FileCredentials::default());
    }
}
