use async_trait::async_trait;
use std::sync::Arc;
use crate::domain::entities::Message;
use crate::application::errors::BotError;

/// Transport trait - receive side of a messaging platform session
#[async_trait]
pub trait Transport: Send {
    /// Wait for the next frame from the platform
    async fn receive(&mut self) -> Result<Message, BotError>;

    /// Handle used to send replies; may be cloned into many tasks
    fn outbox(&self) -> Arc<dyn Outbox>;

    /// Get bot info
    fn bot_info(&self) -> BotInfo;
}

/// Outbox trait - send side of a session, safe for concurrent callers
#[async_trait]
pub trait Outbox: Send + Sync {
    /// Send a message to the channel it is addressed to
    async fn send(&self, message: Message) -> Result<(), BotError>;
}

/// Bot information
#[derive(Debug, Clone)]
pub struct BotInfo {
    pub id: String,
    pub name: String,
}
