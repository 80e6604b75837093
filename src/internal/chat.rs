use std::time::Duration;

use super::models::{ChatMessage, Sender};

/// Delay before the canned bot reply is appended.
pub const BOT_REPLY_DELAY: Duration = Duration::from_secs(1);

/// There is no chat backend yet; every message gets this answer.
pub const BOT_REPLY: &str =
    "Sorry, the chat feature is still under development. Please wait a little longer.";

/// Chat panel state: visibility, the input line and the transcript.
#[derive(Debug, Clone, Default)]
pub struct ChatPanel {
    pub visible: bool,
    pub input: String,
    messages: Vec<ChatMessage>,
}

impl ChatPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_char(&mut self) {
        self.input.pop();
    }

    /// Submit the input line. Returns `true` when a user message was appended, in which
    /// case the caller schedules the bot reply.
    pub fn submit(&mut self) -> bool {
        let message = self.input.trim();
        if message.is_empty() {
            return false;
        }
        let message = message.to_string();
        self.input.clear();
        self.add_message(message, Sender::User);
        true
    }

    pub fn add_bot_reply(&mut self) {
        self.add_message(BOT_REPLY.to_string(), Sender::Bot);
    }

    fn add_message(&mut self, text: String, sender: Sender) {
        tracing::debug!(%sender, len = text.len(), "chat.message");
        self.messages.push(ChatMessage { text, sender });
    }
}
