#[cfg(test)]
#[path = "sender_test.rs"]
mod tests;

use std::fmt;

use serde_derive::Deserialize;
use serde_derive::Serialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    /// Older backends store assistant replies with the `bot` sender.
    #[serde(alias = "bot")]
    Assistant,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Sender::User => return write!(f, "{}", Config::get(ConfigKey::Username)),
            Sender::Assistant => return write!(f, "Solace"),
        }
    }
}
