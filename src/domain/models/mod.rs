mod api;
mod credentials;
mod event;
mod message;
mod sender;
mod session;
mod slash_commands;
mod streaming;

pub use api::*;
pub use credentials::*;
pub use event::*;
pub use message::*;
pub use sender::*;
pub use session::*;
pub use slash_commands::*;
pub use streaming::*;
