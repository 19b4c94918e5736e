//! Domain entities - Core business objects with no external dependencies

pub mod message;
pub mod command;

pub use message::Message;
pub use command::{Command, CommandHandler, CommandRegistry};
