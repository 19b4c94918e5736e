use serde::{Deserialize, Deserializer, Serialize};

/// Type discriminator carried by actionable chat messages
pub const MESSAGE_TYPE: &str = "message";

/// Represents an incoming or outgoing message.
///
/// Mirrors the RTM event shape: control frames (`hello`, `reconnect_url`,
/// reply acks) decode into the same struct with a different or empty `type`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Message {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub id: u64,
    #[serde(rename = "type", default)]
    pub message_type: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub channel: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn is_zero(id: &u64) -> bool {
    *id == 0
}

impl Message {
    pub fn new(channel: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: 0,
            message_type: MESSAGE_TYPE.to_string(),
            channel: channel.into(),
            user: None,
            text: text.into(),
        }
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Whether this is a genuine chat message rather than a control frame
    pub fn is_chat(&self) -> bool {
        self.message_type == MESSAGE_TYPE
    }

    /// Build an outgoing message addressed like this one
    pub fn reply(&self, text: impl Into<String>) -> Message {
        Message {
            id: 0,
            message_type: MESSAGE_TYPE.to_string(),
            channel: self.channel.clone(),
            user: self.user.clone(),
            text: text.into(),
        }
    }
}
