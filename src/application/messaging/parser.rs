//! Message parser - Decides whether text addresses the bot and splits it into fields

/// What a piece of text asks of the bot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Text opens with the mention token. `name` is `None` when nothing follows it.
    Command { name: Option<String>, args: Vec<String> },
    /// Mention token appears, but not as the opening token
    Mention,
    /// Bot is not mentioned at all
    Ignored,
}

/// Parses message text addressed to a given bot identifier
pub struct MessageParser {
    mention: String,
}

impl MessageParser {
    pub fn new(bot_id: &str) -> Self {
        Self {
            mention: mention_token(bot_id),
        }
    }

    /// The `<@id>` token this parser looks for
    pub fn mention(&self) -> &str {
        &self.mention
    }

    /// Whether the mention token appears anywhere in the text
    pub fn mentions(&self, text: &str) -> bool {
        text.contains(&self.mention)
    }

    /// Whether the text opens with the mention token as a whole field
    pub fn is_direct(&self, text: &str) -> bool {
        match text.strip_prefix(&self.mention) {
            Some(rest) => rest.chars().next().map_or(true, char::is_whitespace),
            None => false,
        }
    }

    /// Parse text into an invocation
    pub fn parse(&self, text: &str) -> Invocation {
        if self.is_direct(text) {
            let mut fields = text.split_whitespace().skip(1);
            let name = fields.next().map(str::to_string);
            let args = fields.map(str::to_string).collect();
            return Invocation::Command { name, args };
        }

        if self.mentions(text) {
            Invocation::Mention
        } else {
            Invocation::Ignored
        }
    }
}

/// Format the mention token for a bot identifier
pub fn mention_token(bot_id: &str) -> String {
    format!("<@{}>", bot_id)
}
