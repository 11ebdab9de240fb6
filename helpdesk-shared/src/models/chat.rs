use serde::{Deserialize, Serialize};

use super::Timestamp;

/// Who produced a chat log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sender {
    /// The person typing into the widget.
    User,
    /// The helpdesk assistant.
    Bot,
}

impl Sender {
    #[must_use]
    pub const fn is_user(self) -> bool {
        matches!(self, Self::User)
    }
}

/// One line of the session transcript, in the shape the save endpoint expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatLogEntry {
    /// Message text exactly as rendered.
    pub message: String,
    /// `true` for user messages, `false` for bot messages.
    pub is_user: bool,
    /// When the entry was appended.
    pub timestamp: Timestamp,
}

impl ChatLogEntry {
    /// Creates an entry stamped with the current time.
    pub fn new(message: impl Into<String>, sender: Sender) -> Self {
        Self {
            message: message.into(),
            is_user: sender.is_user(),
            timestamp: Timestamp::now(),
        }
    }

    #[must_use]
    pub const fn sender(&self) -> Sender {
        if self.is_user { Sender::User } else { Sender::Bot }
    }
}

/// Request body for `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Response body for `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    /// Text to show as the bot's answer.
    pub response: String,
    /// Set when the assistant could not resolve the issue and a ticket should be opened.
    #[serde(default)]
    pub requires_complaint: bool,
}

/// Request body for `POST /api/chat/save`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveChatRequest {
    /// The user message that triggered the escalation.
    pub issue: String,
    /// Full transcript up to and including the escalating reply.
    pub chat_history: Vec<ChatLogEntry>,
    /// Last troubleshooting advice the assistant gave; empty when it gave none.
    ///
    /// Always sent: the save endpoint reads the key unconditionally.
    #[serde(rename = "troubleshooting_steps", default)]
    pub troubleshooting_steps: String,
}

/// Response body for `POST /api/chat/save`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveChatResponse {
    #[serde(default)]
    pub complaint_created: bool,
    #[serde(default)]
    pub complaint_no: Option<String>,
    #[serde(default)]
    pub assigned_technician: Option<String>,
}
