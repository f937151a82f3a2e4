use crate::conversation::message::{Conversation, MessageBody, MessageId, MessageStatus, Sender};
use crate::conversation::reply::{ReplyError, ReplyProducer, ReplyRequest};
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub const REPLY_FAILURE_TEXT: &str =
    "Sorry, there was an error processing your request. Please try again.";

pub const HANDOFF_ANNOUNCEMENT: &str =
    "You have been connected to a human agent. Please allow a moment for them to review your conversation.";

/// Whether a reply is currently outstanding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Idle,
    AwaitingReply,
}

/// Result of handing text to [`ConversationViewModel::submit`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The user message was appended and a reply requested
    Accepted(MessageId),
    /// Blank input, nothing happened
    Empty,
    /// A reply is still pending, nothing happened
    Busy,
}

/// How a pending reply was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyOutcome {
    Delivered(MessageId),
    Failed(MessageId),
}

struct PendingReply {
    user_message: MessageId,
    sender: Sender,
    receiver: oneshot::Receiver<Result<String, ReplyError>>,
    task: JoinHandle<()>,
}

/// Owns one conversation and drives it through the reply producer.
///
/// At most one reply is in flight. Replies are requested on the tokio
/// runtime and applied when the owner calls [`poll_reply`](Self::poll_reply)
/// or [`settle`](Self::settle). Dropping the view-model aborts the request
/// and its result is never applied.
pub struct ConversationViewModel {
    conversation: Conversation,
    producer: Arc<dyn ReplyProducer>,
    pending: Option<PendingReply>,
}

impl ConversationViewModel {
    pub fn new(producer: Arc<dyn ReplyProducer>, greeting: impl Into<String>) -> Self {
        let conversation = Conversation::new(greeting);
        tracing::info!(conversation = %conversation.id(), "conversation started");

        Self {
            conversation,
            producer,
            pending: None,
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn state(&self) -> ViewState {
        if self.pending.is_some() {
            ViewState::AwaitingReply
        } else {
            ViewState::Idle
        }
    }

    /// Sender the outstanding reply will carry, if any
    pub fn pending_sender(&self) -> Option<Sender> {
        self.pending.as_ref().map(|pending| pending.sender)
    }

    /// Append the user's text and request a reply.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(&mut self, text: &str) -> SubmitOutcome {
        if text.trim().is_empty() {
            return SubmitOutcome::Empty;
        }
        if self.pending.is_some() {
            tracing::debug!(conversation = %self.conversation.id(), "submit rejected while awaiting reply");
            return SubmitOutcome::Busy;
        }

        let user_message = self.conversation.append(
            Sender::User,
            MessageBody::text(text),
            Some(MessageStatus::Sending),
        );
        self.conversation.set_agent_typing(true);

        let human_agent = self.conversation.is_human_agent();
        let sender = if human_agent { Sender::Human } else { Sender::Ai };
        let request = ReplyRequest {
            history: self.conversation.messages().to_vec(),
            text: text.to_string(),
            human_agent,
        };

        let (tx, receiver) = oneshot::channel();
        let producer = Arc::clone(&self.producer);
        let task = tokio::spawn(async move {
            let result = producer.produce(request).await;
            // The receiver is gone once the conversation is discarded
            let _ = tx.send(result);
        });

        tracing::debug!(
            conversation = %self.conversation.id(),
            message = user_message.value(),
            reply_sender = %sender,
            "reply requested"
        );

        self.pending = Some(PendingReply {
            user_message,
            sender,
            receiver,
            task,
        });

        SubmitOutcome::Accepted(user_message)
    }

    /// Switch all later replies to the human agent and announce it.
    ///
    /// Every call appends an announcement, including repeats.
    pub fn request_human_agent(&mut self) -> MessageId {
        if self.conversation.is_human_agent() {
            tracing::debug!(conversation = %self.conversation.id(), "human agent requested again");
        } else {
            tracing::info!(conversation = %self.conversation.id(), "handed off to human agent");
        }

        self.conversation.mark_human_agent();
        self.conversation
            .append(Sender::Ai, MessageBody::text(HANDOFF_ANNOUNCEMENT), None)
    }

    /// Apply the pending reply if it has already finished. Never blocks.
    pub fn poll_reply(&mut self) -> Option<ReplyOutcome> {
        let pending = self.pending.as_mut()?;
        let result = match pending.receiver.try_recv() {
            Ok(result) => result,
            Err(oneshot::error::TryRecvError::Empty) => return None,
            Err(oneshot::error::TryRecvError::Closed) => Err(ReplyError::Dropped),
        };
        let pending = self.pending.take()?;
        Some(self.resolve(pending, result))
    }

    /// Wait for the pending reply and apply it. Returns `None` when idle.
    pub async fn settle(&mut self) -> Option<ReplyOutcome> {
        let received = match self.pending.as_mut() {
            Some(pending) => (&mut pending.receiver).await,
            None => return None,
        };
        let result = received.unwrap_or(Err(ReplyError::Dropped));
        let pending = self.pending.take()?;
        Some(self.resolve(pending, result))
    }

    fn resolve(&mut self, pending: PendingReply, result: Result<String, ReplyError>) -> ReplyOutcome {
        self.conversation
            .set_status(pending.user_message, MessageStatus::Sent);
        self.conversation.set_agent_typing(false);

        match result {
            Ok(reply) => {
                let id = self
                    .conversation
                    .append(pending.sender, MessageBody::text(reply), None);
                tracing::debug!(conversation = %self.conversation.id(), message = id.value(), "reply delivered");
                ReplyOutcome::Delivered(id)
            }
            Err(err) => {
                tracing::warn!(conversation = %self.conversation.id(), error = %err, "reply failed");
                let id = self.conversation.append(
                    Sender::Ai,
                    MessageBody::text(REPLY_FAILURE_TEXT),
                    Some(MessageStatus::Error),
                );
                ReplyOutcome::Failed(id)
            }
        }
    }
}

impl Drop for ConversationViewModel {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.task.abort();
            tracing::debug!(conversation = %self.conversation.id(), "pending reply discarded");
        }
        tracing::info!(conversation = %self.conversation.id(), "conversation closed");
    }
}
