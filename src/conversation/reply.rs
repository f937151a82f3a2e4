//! Reply producers: the capability that turns user text into an assistant or human reply

use crate::config::{AssistantConfig, ReplyBackend};
use crate::conversation::message::{Message, Sender};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Everything a producer gets to see for one reply
#[derive(Debug, Clone)]
pub struct ReplyRequest {
    /// Conversation history up to and including the new user message
    pub history: Vec<Message>,
    pub text: String,
    pub human_agent: bool,
}

/// Failure of a reply producer. Never shown to the user directly.
#[derive(Debug, Error)]
pub enum ReplyError {
    #[error("reply backend unavailable: {0}")]
    Unavailable(String),
    #[error("reply request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("reply backend returned status {0}")]
    Status(u16),
    #[error("reply backend returned an unusable body: {0}")]
    Malformed(String),
    #[error("reply task ended without a result")]
    Dropped,
}

/// Produces exactly one reply per call. No streaming, no partial output.
#[async_trait]
pub trait ReplyProducer: Send + Sync {
    async fn produce(&self, request: ReplyRequest) -> Result<String, ReplyError>;
}

/// Build the producer selected in configuration
pub fn producer_from_config(config: &AssistantConfig) -> anyhow::Result<Arc<dyn ReplyProducer>> {
    let producer: Arc<dyn ReplyProducer> = match &config.backend {
        ReplyBackend::Mock => Arc::new(MockReplyProducer::new(Duration::from_millis(
            config.reply_delay_ms,
        ))),
        ReplyBackend::Http {
            endpoint,
            timeout_secs,
        } => Arc::new(HttpReplyProducer::new(
            endpoint.clone(),
            Duration::from_secs(*timeout_secs),
            config,
        )?),
    };
    Ok(producer)
}

/// Canned replies after a fixed delay
#[derive(Debug, Clone)]
pub struct MockReplyProducer {
    delay: Duration,
}

impl MockReplyProducer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn canned_reply(text: &str, human_agent: bool) -> String {
        if human_agent {
            format!(
                "Thanks for your message! This is a human agent response to: \"{}\". How else can I help you?",
                text
            )
        } else {
            format!(
                "This is an AI response to: \"{}\". I can provide more information if needed.",
                text
            )
        }
    }
}

#[async_trait]
impl ReplyProducer for MockReplyProducer {
    async fn produce(&self, request: ReplyRequest) -> Result<String, ReplyError> {
        tokio::time::sleep(self.delay).await;
        Ok(Self::canned_reply(&request.text, request.human_agent))
    }
}

#[derive(Debug, Serialize)]
struct HistoryEntry<'a> {
    sender: Sender,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ReplyPayload<'a> {
    history: Vec<HistoryEntry<'a>>,
    message: &'a str,
    human_agent: bool,
    model: &'a str,
    system_prompt: &'a str,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ReplyBody {
    reply: String,
}

/// Replies from a JSON backend
#[derive(Clone)]
pub struct HttpReplyProducer {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    system_prompt: String,
    temperature: f32,
}

impl HttpReplyProducer {
    pub fn new(endpoint: String, timeout: Duration, assistant: &AssistantConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint,
            model: assistant.model.clone(),
            system_prompt: assistant.system_prompt.clone(),
            temperature: assistant.temperature,
        })
    }
}

#[async_trait]
impl ReplyProducer for HttpReplyProducer {
    async fn produce(&self, request: ReplyRequest) -> Result<String, ReplyError> {
        if self.endpoint.trim().is_empty() {
            return Err(ReplyError::Unavailable("no endpoint configured".to_string()));
        }

        let payload = ReplyPayload {
            history: request
                .history
                .iter()
                .map(|message| HistoryEntry {
                    sender: message.sender,
                    content: message.content(),
                })
                .collect(),
            message: &request.text,
            human_agent: request.human_agent,
            model: &self.model,
            system_prompt: &self.system_prompt,
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ReplyError::Status(response.status().as_u16()));
        }

        let text = response.text().await?;
        let body: ReplyBody =
            serde_json::from_str(&text).map_err(|e| ReplyError::Malformed(e.to_string()))?;

        if body.reply.trim().is_empty() {
            return Err(ReplyError::Malformed("empty reply".to_string()));
        }

        Ok(body.reply)
    }
}
