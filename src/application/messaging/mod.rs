//! Message handling - Addressing, parsing and dispatch

pub mod dispatcher;
pub mod parser;

pub use dispatcher::{Action, Dispatcher, ACKNOWLEDGEMENT};
pub use parser::{mention_token, Invocation, MessageParser};
