//! Message dispatcher - Routes addressed messages to command handlers
//!
//! Every dispatch runs on its own tokio task and the receive loop never
//! waits on it. There is no pool bound or backpressure: one task per
//! qualifying message, and replies to overlapping commands may go out in
//! any order. Handlers are synchronous and may block on network I/O, so
//! they run on the blocking thread pool.

use std::sync::Arc;
use tokio::task::JoinHandle;
use crate::domain::entities::{Command, CommandRegistry, Message};
use crate::domain::traits::Outbox;
use super::parser::{Invocation, MessageParser};

/// Reply to a mention that is not a command invocation
pub const ACKNOWLEDGEMENT: &str = "You rang?";

/// What the dispatcher decided to do with a message
#[derive(Debug, Clone)]
pub enum Action {
    /// Run a registered command with the remaining fields as arguments
    Run { command: Arc<Command>, args: Vec<String> },
    /// Unknown or missing command name: reply with the help listing
    Help,
    /// Casual mention: reply with the acknowledgement
    Acknowledge,
    /// Not addressed to the bot
    Ignore,
}

/// Message dispatcher - owns the registry and a handle to send replies
pub struct Dispatcher {
    registry: Arc<CommandRegistry>,
    outbox: Arc<dyn Outbox>,
}

impl Dispatcher {
    pub fn new(registry: Arc<CommandRegistry>, outbox: Arc<dyn Outbox>) -> Self {
        Self { registry, outbox }
    }

    /// Decide what a message asks for, without running anything
    pub fn resolve(&self, message: &Message, bot_id: &str) -> Action {
        let parser = MessageParser::new(bot_id);

        match parser.parse(&message.text) {
            Invocation::Command { name: Some(name), args } => match self.registry.get(&name) {
                Some(command) => {
                    tracing::info!(command = %name, "Dispatching: {}", message.text);
                    Action::Run { command, args }
                }
                None => {
                    tracing::info!(command = %name, "No command found: {}", message.text);
                    Action::Help
                }
            },
            Invocation::Command { name: None, .. } => {
                tracing::info!("Mention without command: {}", message.text);
                Action::Help
            }
            Invocation::Mention => Action::Acknowledge,
            Invocation::Ignored => Action::Ignore,
        }
    }

    /// Resolve a message and spawn the task that produces and sends the reply.
    ///
    /// Returns the task handle, or `None` when the message is not addressed
    /// to the bot. Dropping the handle detaches the task.
    pub fn process(&self, message: Message, bot_id: &str) -> Option<JoinHandle<()>> {
        tracing::info!(channel = %message.channel, "Processing message: {}", message.text);

        let action = self.resolve(&message, bot_id);
        if matches!(action, Action::Ignore) {
            return None;
        }

        let registry = Arc::clone(&self.registry);
        let outbox = Arc::clone(&self.outbox);

        Some(tokio::spawn(async move {
            let text = match action {
                Action::Run { command, args } => {
                    let name = command.name.clone();
                    match tokio::task::spawn_blocking(move || command.run(&args)).await {
                        Ok(text) => text,
                        Err(e) => {
                            tracing::error!(command = %name, "Handler failed: {}", e);
                            return;
                        }
                    }
                }
                Action::Help => registry.help_text(),
                Action::Acknowledge => ACKNOWLEDGEMENT.to_string(),
                Action::Ignore => return,
            };

            tracing::debug!(channel = %message.channel, "Replying: {}", text);
            if let Err(e) = outbox.send(message.reply(text)).await {
                tracing::error!("Failed to send reply: {}", e);
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use crate::application::errors::BotError;

    #[derive(Default)]
    struct RecordingOutbox {
        sent: Mutex<Vec<Message>>,
    }

    #[async_trait]
    impl Outbox for RecordingOutbox {
        async fn send(&self, message: Message) -> Result<(), BotError> {
            self.sent.lock().unwrap().push(message);
            Ok(())
        }
    }

    fn dispatcher() -> (Dispatcher, Arc<RecordingOutbox>) {
        let mut registry = CommandRegistry::new();
        registry.register(
            Command::new("echo")
                .with_description("Repeat the arguments")
                .with_handler(|args| args.join(" ")),
        );
        registry.register(
            Command::new("boom")
                .with_description("Always panics")
                .with_handler(|_| panic!("boom")),
        );
        let outbox = Arc::new(RecordingOutbox::default());
        (Dispatcher::new(Arc::new(registry), outbox.clone()), outbox)
    }

    #[test]
    fn test_resolve_actions() {
        let (dispatcher, _) = dispatcher();

        let run = dispatcher.resolve(&Message::new("C1", "<@B> echo a b"), "B");
        match run {
            Action::Run { command, args } => {
                assert_eq!(command.name, "echo");
                assert_eq!(args, vec!["a", "b"]);
            }
            other => panic!("unexpected action: {:?}", other),
        }

        assert!(matches!(dispatcher.resolve(&Message::new("C1", "<@B> nope"), "B"), Action::Help));
        assert!(matches!(dispatcher.resolve(&Message::new("C1", "<@B>"), "B"), Action::Help));
        assert!(matches!(dispatcher.resolve(&Message::new("C1", "hi <@B>"), "B"), Action::Acknowledge));
        assert!(matches!(dispatcher.resolve(&Message::new("C1", "hi"), "B"), Action::Ignore));
    }

    #[tokio::test]
    async fn test_process_replies_with_handler_output() {
        let (dispatcher, outbox) = dispatcher();
        let inbound = Message::new("C1", "<@B> echo hello world").with_user("U1");

        dispatcher.process(inbound, "B").unwrap().await.unwrap();

        let sent = outbox.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].text, "hello world");
        assert_eq!(sent[0].channel, "C1");
        assert_eq!(sent[0].user.as_deref(), Some("U1"));
    }

    #[tokio::test]
    async fn test_process_ignores_unaddressed_message() {
        let (dispatcher, outbox) = dispatcher();
        assert!(dispatcher.process(Message::new("C1", "echo hi"), "B").is_none());
        assert!(outbox.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_panicking_handler_sends_nothing() {
        let (dispatcher, outbox) = dispatcher();

        dispatcher.process(Message::new("C1", "<@B> boom"), "B").unwrap().await.unwrap();
        assert!(outbox.sent.lock().unwrap().is_empty());

        dispatcher.process(Message::new("C1", "<@B> echo still alive"), "B").unwrap().await.unwrap();
        assert_eq!(outbox.sent.lock().unwrap()[0].text, "still alive");
    }
}
