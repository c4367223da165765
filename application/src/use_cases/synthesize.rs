//! Synthesis
//!
//! Reduces a transcript to the single answer shown to the user. Unlike the
//! panel, a synthesis failure is returned to the caller: there is no answer
//! to fall back on.

use crate::ports::llm_gateway::{
    CapabilityResolver, GatewayError, GenerationOptions, StreamHandle,
};
use council_domain::{Agent, PromptTemplate, StreamEvent, SynthesisDepth, Transcript};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

const STREAM_BUFFER: usize = 64;

/// One synthesis request.
pub struct SynthesisRequest<'a> {
    pub question: &'a str,
    pub transcript: &'a Transcript,
    pub context: Option<&'a str>,
    pub depth: SynthesisDepth,
}

#[derive(Clone)]
pub struct Synthesizer {
    resolver: Arc<dyn CapabilityResolver>,
    agent: Agent,
    options: GenerationOptions,
    timeout: Option<Duration>,
}

impl Synthesizer {
    pub fn new(resolver: Arc<dyn CapabilityResolver>, agent: Agent) -> Self {
        Self {
            resolver,
            agent,
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

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Produce the final answer, verbatim from the synthesizer capability.
    pub async fn synthesize(&self, request: &SynthesisRequest<'_>) -> Result<String, GatewayError> {
        let messages = self.messages(request);
        let generator = self.resolver.resolve(&self.agent.capability)?;
        let call = generator.generate(&messages, &self.options);
        let answer = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| GatewayError::Timeout)??,
            None => call.await?,
        };
        info!("Synthesis by {} complete ({} bytes)", self.agent.id, answer.len());
        Ok(answer)
    }

    /// Start a streaming synthesis; chunks are passed through untouched.
    ///
    /// The timeout covers opening the stream and waiting for its first
    /// event. Once output is flowing the caller decides how long to read.
    pub async fn synthesize_stream(
        &self,
        request: &SynthesisRequest<'_>,
    ) -> Result<StreamHandle, GatewayError> {
        let messages = self.messages(request);
        let generator = self.resolver.resolve(&self.agent.capability)?;
        let Some(limit) = self.timeout else {
            return generator.generate_stream(&messages, &self.options).await;
        };

        let started = async {
            let mut handle = generator.generate_stream(&messages, &self.options).await?;
            let first = handle.receiver.recv().await;
            Ok::<_, GatewayError>((first, handle))
        };
        let (first, rest) = tokio::time::timeout(limit, started)
            .await
            .map_err(|_| GatewayError::Timeout)??;
        debug!("Synthesis stream from {} started", self.agent.id);
        Ok(resume(first, rest))
    }

    fn messages(&self, request: &SynthesisRequest<'_>) -> Vec<council_domain::Message> {
        let messages = PromptTemplate::synthesis_context(
            &self.agent,
            request.question,
            request.transcript,
            request.context,
            request.depth,
        );
        debug!(
            "Synthesis prompt: {} rounds, {} bytes, depth {:?}",
            request.transcript.len(),
            messages.iter().map(|m| m.content.len()).sum::<usize>(),
            request.depth
        );
        messages
    }
}

/// Re-emit `first` ahead of the rest of an already-started stream.
fn resume(first: Option<StreamEvent>, mut rest: StreamHandle) -> StreamHandle {
    let (tx, rx) = mpsc::channel(STREAM_BUFFER);
    tokio::spawn(async move {
        let Some(first) = first else {
            return;
        };
        if tx.send(first).await.is_err() {
            return;
        }
        while let Some(event) = rest.receiver.recv().await {
            if tx.send(event).await.is_err() {
                return;
            }
        }
    });
    StreamHandle::new(rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{ScriptedBackend, agent};
    use council_domain::RoundResponse;

    fn transcript() -> Transcript {
        let a = agent("a");
        let b = agent("b");
        let mut t = Transcript::new();
        t.push_round(vec![
            RoundResponse::success(&a, "a says yes"),
            RoundResponse::failure(&b, "quota exceeded"),
        ]);
        t
    }

    #[tokio::test]
    async fn answer_is_returned_verbatim() {
        let backend = ScriptedBackend::new().reply("s", "  Final answer.\n");
        let synth = Synthesizer::new(backend.resolver(), agent("s"));
        let t = transcript();
        let answer = synth
            .synthesize(&SynthesisRequest {
                question: "Q",
                transcript: &t,
                context: Some("private note"),
                depth: SynthesisDepth::Standard,
            })
            .await
            .unwrap();
        assert_eq!(answer, "  Final answer.\n");

        let prompt = &backend.prompts_for("s")[0];
        let user = &prompt[1].content;
        assert!(user.contains("a says yes"));
        assert!(user.contains("[Error - quota exceeded]"));
        assert!(user.contains("private note"));
    }

    #[tokio::test]
    async fn failure_propagates() {
        let backend = ScriptedBackend::new().fail("s", "synth down");
        let synth = Synthesizer::new(backend.resolver(), agent("s"));
        let t = transcript();
        let err = synth
            .synthesize(&SynthesisRequest {
                question: "Q",
                transcript: &t,
                context: None,
                depth: SynthesisDepth::Deep,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::RequestFailed(m) if m == "synth down"));
    }

    #[tokio::test]
    async fn stream_passes_chunks_through() {
        let backend = ScriptedBackend::new().reply("s", "one two three");
        let synth = Synthesizer::new(backend.resolver(), agent("s"));
        let t = transcript();
        let mut handle = synth
            .synthesize_stream(&SynthesisRequest {
                question: "Q",
                transcript: &t,
                context: None,
                depth: SynthesisDepth::Standard,
            })
            .await
            .unwrap();

        let mut deltas = Vec::new();
        while let Some(event) = handle.receiver.recv().await {
            if let StreamEvent::Delta(chunk) = event {
                deltas.push(chunk);
            }
        }
        assert_eq!(deltas, vec!["one ", "two ", "three"]);
    }

    #[tokio::test]
    async fn stream_with_timeout_keeps_every_event() {
        let backend = ScriptedBackend::new().reply("s", "one two three");
        let synth = Synthesizer::new(backend.resolver(), agent("s"))
            .with_timeout(Some(Duration::from_secs(5)));
        let t = transcript();
        let handle = synth
            .synthesize_stream(&SynthesisRequest {
                question: "Q",
                transcript: &t,
                context: None,
                depth: SynthesisDepth::Standard,
            })
            .await
            .unwrap();
        assert_eq!(handle.collect_text().await.unwrap(), "one two three");
    }

    #[tokio::test(start_paused = true)]
    async fn stream_that_never_starts_times_out() {
        let backend =
            ScriptedBackend::new().reply_after("s", "too late", Duration::from_secs(60));
        let synth = Synthesizer::new(backend.resolver(), agent("s"))
            .with_timeout(Some(Duration::from_secs(1)));
        let t = transcript();
        let err = synth
            .synthesize_stream(&SynthesisRequest {
                question: "Q",
                transcript: &t,
                context: None,
                depth: SynthesisDepth::Standard,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Timeout));
    }
}
