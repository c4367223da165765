//! Text-generation ports
//!
//! Defines how the application layer reaches text-generation backends.
//! [`TextGenerator`] is one backend; [`CapabilityResolver`] maps an agent's
//! [`CapabilityRef`] to a backend so the use cases never see environment,
//! credentials, or vendor details.

use async_trait::async_trait;
use council_domain::{CapabilityRef, Message, StreamEvent};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur while generating text
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Capability not available: {0}")]
    CapabilityNotFound(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout")]
    Timeout,

    #[error("Backend process error: {0}")]
    Process(String),

    #[error("Other error: {0}")]
    Other(String),
}

/// Per-call sampling options forwarded to the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// Handle for receiving streaming events from a backend.
#[derive(Debug)]
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<StreamEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>) -> Self {
        Self { receiver }
    }

    /// A stream that yields `text` as a single `Completed` event.
    pub fn completed(text: impl Into<String>) -> Self {
        let (tx, rx) = mpsc::channel(1);
        // Capacity 1 and a fresh channel: try_send cannot fail here.
        let _ = tx.try_send(StreamEvent::Completed(text.into()));
        Self::new(rx)
    }

    /// Consume the stream and collect all text into a single string.
    pub async fn collect_text(mut self) -> Result<String, GatewayError> {
        let mut full_text = String::new();
        while let Some(event) = self.receiver.recv().await {
            match event {
                StreamEvent::Delta(chunk) => full_text.push_str(&chunk),
                StreamEvent::Completed(text) => {
                    if full_text.is_empty() {
                        return Ok(text);
                    }
                    return Ok(full_text);
                }
                StreamEvent::Error(e) => {
                    return Err(GatewayError::RequestFailed(e));
                }
            }
        }
        // Channel closed without Completed: return what we have
        Ok(full_text)
    }
}

/// A text-generation backend
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for the given role-tagged messages.
    async fn generate(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<String, GatewayError>;

    /// Generate a completion as a stream of events.
    ///
    /// Default implementation calls `generate()` and wraps the result in a
    /// single `Completed` event.
    async fn generate_stream(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<StreamHandle, GatewayError> {
        let text = self.generate(messages, options).await?;
        Ok(StreamHandle::completed(text))
    }
}

/// Maps a capability name to a backend.
pub trait CapabilityResolver: Send + Sync {
    fn resolve(&self, capability: &CapabilityRef) -> Result<Arc<dyn TextGenerator>, GatewayError>;
}

impl<F> CapabilityResolver for F
where
    F: Fn(&CapabilityRef) -> Result<Arc<dyn TextGenerator>, GatewayError> + Send + Sync,
{
    fn resolve(&self, capability: &CapabilityRef) -> Result<Arc<dyn TextGenerator>, GatewayError> {
        self(capability)
    }
}
