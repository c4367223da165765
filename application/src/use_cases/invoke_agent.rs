//! Agent Invocation
//!
//! The isolation boundary of the panel: one agent, one capability call, and
//! every failure (unresolvable capability, backend error, timeout) folded
//! into the returned [`RoundResponse`]. Nothing here returns `Err`.

use crate::ports::llm_gateway::{CapabilityResolver, GatewayError, GenerationOptions};
use council_domain::{Agent, Message, RoundResponse};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Invokes single agents against their capability.
///
/// Cheap to clone; each concurrent invocation in a round holds its own copy.
#[derive(Clone)]
pub struct AgentInvoker {
    resolver: Arc<dyn CapabilityResolver>,
    options: GenerationOptions,
    timeout: Option<Duration>,
}

impl AgentInvoker {
    pub fn new(resolver: Arc<dyn CapabilityResolver>) -> Self {
        Self {
            resolver,
            options: GenerationOptions::default(),
            timeout: None,
        }
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Call `agent`'s capability with `messages`.
    ///
    /// No retries happen at this layer.
    pub async fn invoke(&self, agent: &Agent, messages: &[Message]) -> RoundResponse {
        debug!(
            "Invoking agent {} via capability {} ({} messages)",
            agent.id,
            agent.capability,
            messages.len()
        );

        match self.generate(agent, messages).await {
            Ok(content) => RoundResponse::success(agent, content),
            Err(e) => {
                warn!("Agent {} failed: {}", agent.id, e);
                RoundResponse::failure(agent, e.to_string())
            }
        }
    }

    async fn generate(&self, agent: &Agent, messages: &[Message]) -> Result<String, GatewayError> {
        let generator = self.resolver.resolve(&agent.capability)?;
        let call = generator.generate(messages, &self.options);
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| GatewayError::Timeout)?,
            None => call.await,
        }
    }
}
