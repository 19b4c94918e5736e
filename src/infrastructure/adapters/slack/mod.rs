//! Slack Real Time Messaging adapter

use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use reqwest::Client;
use serde::Deserialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::{self, Message as Frame};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::application::errors::BotError;
use crate::domain::entities::message::{Message, MESSAGE_TYPE};
use crate::domain::traits::{BotInfo, Outbox, Transport};
use crate::infrastructure::config::SlackConfig;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// `rtm.connect` response
#[derive(Debug, Deserialize)]
struct ConnectResponse {
    ok: bool,
    error: Option<String>,
    url: Option<String>,
    #[serde(rename = "self")]
    identity: Option<Identity>,
}

#[derive(Debug, Deserialize)]
struct Identity {
    id: String,
    name: String,
}

/// Fields common to every RTM frame
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type", default)]
    kind: String,
    ok: Option<bool>,
    reply_to: Option<u64>,
    error: Option<serde_json::Value>,
}

impl Envelope {
    /// Id and reason of a send the server refused
    fn rejection(&self) -> Option<(u64, String)> {
        match (self.ok, self.reply_to) {
            (Some(false), Some(id)) => {
                let reason = self.error.as_ref()
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "unknown error".to_string());
                Some((id, reason))
            }
            _ => None,
        }
    }
}

/// Slack bot adapter: owns the read half of the RTM websocket
pub struct SlackAdapter {
    info: BotInfo,
    stream: SplitStream<Socket>,
    outbox: Arc<SlackOutbox>,
    writer: JoinHandle<()>,
}

impl SlackAdapter {
    /// Start an RTM session and open its websocket
    pub async fn connect(token: &str, config: &SlackConfig) -> Result<Self, BotError> {
        let (url, info) = Self::rtm_connect(token, config).await?;
        tracing::info!("Connecting to RTM websocket as {} ({})", info.name, info.id);

        let (socket, _) = connect_async(url.as_str())
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;
        let (sink, stream) = socket.split();

        let (sender, receiver) = mpsc::unbounded_channel();
        let writer = tokio::spawn(write_frames(sink, receiver));

        Ok(Self {
            info,
            stream,
            outbox: Arc::new(SlackOutbox::new(sender)),
            writer,
        })
    }

    /// Exchange the token for a websocket URL and the bot's own identity
    async fn rtm_connect(token: &str, config: &SlackConfig) -> Result<(String, BotInfo), BotError> {
        let url = format!("{}/rtm.connect", config.api_base.trim_end_matches('/'));
        let response = Client::new()
            .get(&url)
            .query(&[("token", token)])
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BotError::Network(format!("Slack API error: {}", response.status())));
        }

        let body = response
            .text()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        parse_connect_response(&body)
    }
}

impl Drop for SlackAdapter {
    fn drop(&mut self) {
        self.writer.abort();
    }
}

#[async_trait]
impl Transport for SlackAdapter {
    async fn receive(&mut self) -> Result<Message, BotError> {
        loop {
            let frame = match self.stream.next().await {
                Some(Ok(frame)) => frame,
                Some(Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed)) | None => {
                    return Err(BotError::ConnectionClosed);
                }
                Some(Err(e)) => return Err(BotError::Network(e.to_string())),
            };

            match frame {
                Frame::Text(text) => {
                    tracing::debug!("Frame: {}", text);
                    return decode_event(&text);
                }
                Frame::Close(reason) => {
                    tracing::info!("Server closed the connection: {:?}", reason);
                    return Err(BotError::ConnectionClosed);
                }
                _ => continue,
            }
        }
    }

    fn outbox(&self) -> Arc<dyn Outbox> {
        self.outbox.clone()
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}

/// Send side of an RTM session.
///
/// Messages are queued to a single writer task so concurrent callers never
/// interleave frames on the socket.
pub struct SlackOutbox {
    next_id: AtomicU64,
    sender: mpsc::UnboundedSender<Message>,
}

impl SlackOutbox {
    pub fn new(sender: mpsc::UnboundedSender<Message>) -> Self {
        Self {
            next_id: AtomicU64::new(1),
            sender,
        }
    }
}

#[async_trait]
impl Outbox for SlackOutbox {
    async fn send(&self, mut message: Message) -> Result<(), BotError> {
        message.id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.sender
            .send(message)
            .map_err(|_| BotError::ConnectionClosed)
    }
}

async fn write_frames(mut sink: SplitSink<Socket, Frame>, mut receiver: mpsc::UnboundedReceiver<Message>) {
    while let Some(message) = receiver.recv().await {
        let payload = match serde_json::to_string(&message) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!("Failed to encode message {}: {}", message.id, e);
                continue;
            }
        };

        if let Err(e) = sink.send(Frame::Text(payload)).await {
            tracing::error!(channel = %message.channel, "Failed to send message {}: {}", message.id, e);
        }
    }
}

fn parse_connect_response(body: &str) -> Result<(String, BotInfo), BotError> {
    let data: ConnectResponse = serde_json::from_str(body)
        .map_err(|e| BotError::Parse(e.to_string()))?;

    if !data.ok {
        return Err(BotError::Auth(data.error.unwrap_or_else(|| "unknown error".to_string())));
    }

    let url = data.url
        .ok_or_else(|| BotError::Parse("rtm.connect returned no url".to_string()))?;
    let identity = data.identity
        .ok_or_else(|| BotError::Parse("rtm.connect returned no identity".to_string()))?;

    Ok((url, BotInfo { id: identity.id, name: identity.name }))
}

/// Decode one RTM frame. Only `message` events are decoded in full; other
/// event types come back as non-chat messages carrying just their type.
fn decode_event(text: &str) -> Result<Message, BotError> {
    let envelope: Envelope = serde_json::from_str(text)
        .map_err(|e| BotError::Parse(e.to_string()))?;

    if let Some((id, reason)) = envelope.rejection() {
        tracing::warn!("Message {} rejected by server: {}", id, reason);
    }

    if envelope.kind != MESSAGE_TYPE {
        return Ok(Message {
            message_type: envelope.kind,
            ..Message::default()
        });
    }

    serde_json::from_str(text).map_err(|e| BotError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_connect_response() {
        let body = r#"{"ok":true,"url":"wss://example.slack/websocket/abc","team":{"id":"T1"},"self":{"id":"U0BOT","name":"daryl"}}"#;
        let (url, info) = parse_connect_response(body).unwrap();

        assert_eq!(url, "wss://example.slack/websocket/abc");
        assert_eq!(info.id, "U0BOT");
        assert_eq!(info.name, "daryl");
    }

    #[test]
    fn test_parse_connect_rejected_token() {
        let body = r#"{"ok":false,"error":"invalid_auth"}"#;
        match parse_connect_response(body) {
            Err(BotError::Auth(reason)) => assert_eq!(reason, "invalid_auth"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_connect_missing_fields() {
        assert!(matches!(parse_connect_response(r#"{"ok":true}"#), Err(BotError::Parse(_))));
        assert!(matches!(parse_connect_response("not json"), Err(BotError::Parse(_))));
    }

    #[test]
    fn test_decode_event() {
        let msg = decode_event(r#"{"type":"message","channel":"C1","user":"U2","text":"<@U0BOT> coinflip"}"#).unwrap();
        assert!(msg.is_chat());
        assert_eq!(msg.text, "<@U0BOT> coinflip");
        assert!(decode_event("{").is_err());
    }

    #[test]
    fn test_decode_user_change_event() {
        let frame = r#"{"type":"user_change","user":{"id":"U2","name":"alice","profile":{"real_name":"Alice"}}}"#;
        let msg = decode_event(frame).unwrap();
        assert!(!msg.is_chat());
        assert_eq!(msg.message_type, "user_change");
        assert!(msg.user.is_none());
    }

    #[test]
    fn test_decode_channel_created_event() {
        let frame = r#"{"type":"channel_created","channel":{"id":"C9","name":"random","created":1360782804,"creator":"U2"}}"#;
        let msg = decode_event(frame).unwrap();
        assert!(!msg.is_chat());
        assert_eq!(msg.message_type, "channel_created");
        assert!(msg.channel.is_empty());
    }

    #[test]
    fn test_decode_message_with_null_text() {
        let frame = r#"{"type":"message","subtype":"message_deleted","channel":"C1","text":null,"ts":"1.2"}"#;
        let msg = decode_event(frame).unwrap();
        assert!(msg.is_chat());
        assert_eq!(msg.channel, "C1");
        assert!(msg.text.is_empty());
    }

    #[test]
    fn test_rejected_send_ack() {
        let frame = r#"{"ok":false,"reply_to":4,"error":{"code":2,"msg":"message text is missing"}}"#;
        let envelope: Envelope = serde_json::from_str(frame).unwrap();
        let (id, reason) = envelope.rejection().unwrap();
        assert_eq!(id, 4);
        assert!(reason.contains("message text is missing"));

        let msg = decode_event(frame).unwrap();
        assert!(!msg.is_chat());
    }

    #[test]
    fn test_accepted_send_ack() {
        let envelope: Envelope = serde_json::from_str(r#"{"ok":true,"reply_to":5,"ts":"1.3","text":"hi"}"#).unwrap();
        assert!(envelope.rejection().is_none());
    }

    #[tokio::test]
    async fn test_outbox_assigns_increasing_ids() {
        let (sender, mut receiver) = mpsc::unbounded_channel();
        let outbox = SlackOutbox::new(sender);

        outbox.send(Message::new("C1", "one")).await.unwrap();
        outbox.send(Message::new("C1", "two")).await.unwrap();

        assert_eq!(receiver.recv().await.unwrap().id, 1);
        assert_eq!(receiver.recv().await.unwrap().id, 2);
    }

    #[tokio::test]
    async fn test_outbox_reports_closed_writer() {
        let (sender, receiver) = mpsc::unbounded_channel();
        drop(receiver);
        let outbox = SlackOutbox::new(sender);

        assert!(matches!(
            outbox.send(Message::new("C1", "lost")).await,
            Err(BotError::ConnectionClosed)
        ));
    }
}
