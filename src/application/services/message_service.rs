use std::sync::Arc;
use crate::application::errors::BotError;
use crate::application::messaging::{Dispatcher, MessageParser};
use crate::domain::entities::{CommandRegistry, Message};
use crate::domain::traits::{BotInfo, Transport};

/// Receive loop: pulls messages from a transport and feeds addressed ones
/// to the dispatcher
pub struct MessageService<T: Transport> {
    transport: T,
    dispatcher: Dispatcher,
    info: BotInfo,
    parser: MessageParser,
}

impl<T: Transport> MessageService<T> {
    pub fn new(transport: T, registry: Arc<CommandRegistry>) -> Self {
        let info = transport.bot_info();
        let dispatcher = Dispatcher::new(registry, transport.outbox());
        let parser = MessageParser::new(&info.id);
        Self {
            transport,
            dispatcher,
            info,
            parser,
        }
    }

    /// Whether a message should be handed to the dispatcher
    pub fn is_addressed(&self, message: &Message) -> bool {
        message.is_chat()
            && message.user.as_deref() != Some(self.info.id.as_str())
            && self.parser.mentions(&message.text)
    }

    /// Run until the connection closes.
    ///
    /// Other receive errors are logged and the loop carries on. Dispatched
    /// tasks are detached and never awaited here.
    pub async fn run(&mut self) -> Result<(), BotError> {
        tracing::info!("Starting message loop as {} ({})", self.info.name, self.info.id);

        loop {
            let message = match self.transport.receive().await {
                Ok(message) => message,
                Err(BotError::ConnectionClosed) => {
                    tracing::error!("Connection closed, stopping message loop");
                    return Err(BotError::ConnectionClosed);
                }
                Err(e) => {
                    tracing::error!("Failed to receive message: {}", e);
                    continue;
                }
            };

            if self.is_addressed(&message) {
                tracing::info!(channel = %message.channel, "Mentioned: {}", message.text);
                self.dispatcher.process(message, &self.info.id);
            }
        }
    }
}
