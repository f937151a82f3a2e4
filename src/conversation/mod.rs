//! Conversation state and the reply flow behind the chat widget

pub mod message;
pub mod reply;
pub mod view_model;

pub use message::{Conversation, Message, MessageBody, MessageId, MessageKind, MessageStatus, Sender};
pub use reply::{
    HttpReplyProducer, MockReplyProducer, ReplyError, ReplyProducer, ReplyRequest,
    producer_from_config,
};
pub use view_model::{ConversationViewModel, ReplyOutcome, SubmitOutcome, ViewState};
