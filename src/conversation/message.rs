//! Messages and the append-only conversation log

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};
use uuid::Uuid;

/// Identifier of a message within one conversation. Ids increase with every append.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(u64);

impl MessageId {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
    Human,
}

/// Delivery status, only ever set on the user message awaiting a reply and on failure notices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MessageStatus {
    Sending,
    Sent,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MessageKind {
    Text,
    Image,
}

/// Payload of a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MessageBody {
    Text { content: String },
    Image { url: String },
}

impl MessageBody {
    pub fn text(content: impl Into<String>) -> Self {
        MessageBody::Text {
            content: content.into(),
        }
    }

    pub fn kind(&self) -> MessageKind {
        match self {
            MessageBody::Text { .. } => MessageKind::Text,
            MessageBody::Image { .. } => MessageKind::Image,
        }
    }
}

/// A single entry in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub sender: Sender,
    pub body: MessageBody,
    pub timestamp: DateTime<Utc>,
    pub status: Option<MessageStatus>,
}

impl Message {
    /// Text content; empty for image entries
    pub fn content(&self) -> &str {
        match &self.body {
            MessageBody::Text { content } => content,
            MessageBody::Image { .. } => "",
        }
    }

    pub fn kind(&self) -> MessageKind {
        self.body.kind()
    }

    pub fn image_url(&self) -> Option<&str> {
        match &self.body {
            MessageBody::Image { url } => Some(url),
            MessageBody::Text { .. } => None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.status == Some(MessageStatus::Error)
    }
}

/// Ordered message history plus the typing and handoff flags of one chat session.
///
/// Messages are only ever appended. The one permitted edit to an existing
/// entry is updating the status of the user message whose reply is pending.
#[derive(Debug, Clone)]
pub struct Conversation {
    id: Uuid,
    messages: Vec<Message>,
    is_agent_typing: bool,
    is_human_agent: bool,
    next_id: u64,
}

impl Conversation {
    /// Create a conversation seeded with the assistant greeting
    pub fn new(greeting: impl Into<String>) -> Self {
        let mut conversation = Self {
            id: Uuid::new_v4(),
            messages: Vec::new(),
            is_agent_typing: false,
            is_human_agent: false,
            next_id: 1,
        };
        conversation.append(Sender::Ai, MessageBody::text(greeting), None);
        conversation
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn is_agent_typing(&self) -> bool {
        self.is_agent_typing
    }

    pub fn is_human_agent(&self) -> bool {
        self.is_human_agent
    }

    /// Append a message, keeping timestamps non-decreasing even if the wall clock steps back
    pub(crate) fn append(
        &mut self,
        sender: Sender,
        body: MessageBody,
        status: Option<MessageStatus>,
    ) -> MessageId {
        let now = Utc::now();
        let timestamp = match self.messages.last() {
            Some(previous) if previous.timestamp > now => previous.timestamp,
            _ => now,
        };

        let id = MessageId(self.next_id);
        self.next_id += 1;

        self.messages.push(Message {
            id,
            sender,
            body,
            timestamp,
            status,
        });
        id
    }

    pub(crate) fn set_status(&mut self, id: MessageId, status: MessageStatus) -> bool {
        match self.messages.iter_mut().rev().find(|message| message.id == id) {
            Some(message) => {
                message.status = Some(status);
                true
            }
            None => false,
        }
    }

    pub(crate) fn set_agent_typing(&mut self, typing: bool) {
        self.is_agent_typing = typing;
    }

    /// One-way: there is no way back to automated replies within a conversation
    pub(crate) fn mark_human_agent(&mut self) {
        self.is_human_agent = true;
    }
}
