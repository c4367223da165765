//! Test doubles shared by the use case tests.
//!
//! [`ScriptedBackend`] serves one script per capability name and records
//! every call, so tests can assert both the number of invocations and the
//! exact prompts that were sent.

use crate::ports::llm_gateway::{
    CapabilityResolver, GatewayError, GenerationOptions, StreamHandle, TextGenerator,
};
use async_trait::async_trait;
use council_domain::{Agent, CapabilityRef, Message, StreamEvent};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

/// Test agent whose capability name equals its id.
pub(crate) fn agent(id: &str) -> Agent {
    Agent::new(
        id,
        format!("Agent {}", id.to_uppercase()),
        id,
        format!("You are agent {}.", id),
    )
}

#[derive(Clone)]
enum Step {
    Reply(String, Duration),
    Fail(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Call {
    pub capability: String,
    pub messages: Vec<Message>,
}

#[derive(Default)]
struct Inner {
    scripts: Mutex<HashMap<String, Vec<Step>>>,
    served: Mutex<HashMap<String, usize>>,
    calls: Mutex<Vec<Call>>,
}

/// Scripted capability backend.
///
/// Each capability replays its steps in order; the last step repeats.
#[derive(Clone, Default)]
pub(crate) struct ScriptedBackend {
    inner: Arc<Inner>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(self, capability: &str, step: Step) -> Self {
        self.inner
            .scripts
            .lock()
            .unwrap()
            .entry(capability.to_string())
            .or_default()
            .push(step);
        self
    }

    pub fn reply(self, capability: &str, text: &str) -> Self {
        self.push(capability, Step::Reply(text.to_string(), Duration::ZERO))
    }

    pub fn reply_after(self, capability: &str, text: &str, delay: Duration) -> Self {
        self.push(capability, Step::Reply(text.to_string(), delay))
    }

    pub fn fail(self, capability: &str, error: &str) -> Self {
        self.push(capability, Step::Fail(error.to_string()))
    }

    pub fn resolver(&self) -> Arc<dyn CapabilityResolver> {
        Arc::new(self.clone())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.inner.calls.lock().unwrap().len()
    }

    /// Prompts sent to one capability, in call order.
    pub fn prompts_for(&self, capability: &str) -> Vec<Vec<Message>> {
        self.calls()
            .into_iter()
            .filter(|c| c.capability == capability)
            .map(|c| c.messages)
            .collect()
    }
}

impl CapabilityResolver for ScriptedBackend {
    fn resolve(&self, capability: &CapabilityRef) -> Result<Arc<dyn TextGenerator>, GatewayError> {
        if self
            .inner
            .scripts
            .lock()
            .unwrap()
            .contains_key(capability.as_str())
        {
            Ok(Arc::new(ScriptedGenerator {
                capability: capability.to_string(),
                inner: Arc::clone(&self.inner),
            }))
        } else {
            Err(GatewayError::CapabilityNotFound(capability.to_string()))
        }
    }
}

struct ScriptedGenerator {
    capability: String,
    inner: Arc<Inner>,
}

impl ScriptedGenerator {
    fn next_step(&self) -> Step {
        let scripts = self.inner.scripts.lock().unwrap();
        let steps = &scripts[&self.capability];
        let mut served = self.inner.served.lock().unwrap();
        let n = served.entry(self.capability.clone()).or_insert(0);
        let step = steps[(*n).min(steps.len() - 1)].clone();
        *n += 1;
        step
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(
        &self,
        messages: &[Message],
        _options: &GenerationOptions,
    ) -> Result<String, GatewayError> {
        self.inner.calls.lock().unwrap().push(Call {
            capability: self.capability.clone(),
            messages: messages.to_vec(),
        });
        match self.next_step() {
            Step::Reply(text, delay) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok(text)
            }
            Step::Fail(error) => Err(GatewayError::RequestFailed(error)),
        }
    }

    async fn generate_stream(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<StreamHandle, GatewayError> {
        let text = self.generate(messages, options).await?;
        let words: Vec<String> = text.split_inclusive(' ').map(str::to_string).collect();
        let (tx, rx) = mpsc::channel(words.len() + 1);
        for word in words {
            let _ = tx.try_send(StreamEvent::Delta(word));
        }
        let _ = tx.try_send(StreamEvent::Completed(text));
        Ok(StreamHandle::new(rx))
    }
}
