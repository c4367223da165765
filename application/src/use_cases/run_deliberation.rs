//! Run Deliberation use case
//!
//! The depth state machine. A request's [`Mode`] (after routing policy) is
//! looked up as a [`PhasePlan`] and executed:
//!
//! ```text
//! quick:        fast-path agent ─────────────────────────────▶ answer
//! otherwise:    panel ─▶ roundtable × k ─▶ synthesis ─────────▶ answer
//! ```
//!
//! Rounds run strictly one after another; each roundtable reads only the
//! round before it. Nothing outlives the request.

use super::invoke_agent::AgentInvoker;
use super::panel_round::PanelRound;
use super::roundtable::RoundtablePhase;
use super::shared::check_cancelled;
use super::synthesize::{SynthesisRequest, Synthesizer};
use crate::config::DeliberationParams;
use crate::ports::classifier::QuestionClassifier;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::{CapabilityResolver, GatewayError, StreamHandle};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use council_domain::util::preview;
use council_domain::{
    Agent, AgentId, DomainError, FAST_PATH_FALLBACK, Mode, ModePolicy, Phase, PhasePlan,
    PromptTemplate, Question, RoundResponse, SynthesisDepth, SynthesisResult, Transcript,
    StreamEvent, ensure_unique_ids,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that can surface from a deliberation
#[derive(Error, Debug)]
pub enum RunDeliberationError {
    /// Rejected before any capability was called.
    #[error("Invalid request: {0}")]
    Config(DomainError),

    /// The synthesizer failed; there is no fallback answer.
    #[error("Synthesis failed: {0}")]
    SynthesisFailed(#[source] GatewayError),

    #[error("Operation cancelled")]
    Cancelled,
}

impl RunDeliberationError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunDeliberationError::Cancelled)
    }
}

impl From<DomainError> for RunDeliberationError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Cancelled => RunDeliberationError::Cancelled,
            other => RunDeliberationError::Config(other),
        }
    }
}

/// Input for the RunDeliberation use case
#[derive(Debug, Clone)]
pub struct AskInput {
    /// The user's question
    pub question: String,
    /// Panel members, in the order their answers are reported
    pub agents: Vec<Agent>,
    /// Opaque external context injected into every prompt
    pub context: Option<String>,
    /// Requested mode; `None` lets routing policy decide
    pub mode: Option<Mode>,
    /// Return every round alongside the answer
    pub include_transcript: bool,
}

impl AskInput {
    pub fn new(question: impl Into<String>, agents: Vec<Agent>) -> Self {
        Self {
            question: question.into(),
            agents,
            context: None,
            mode: None,
            include_transcript: false,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_transcript(mut self) -> Self {
        self.include_transcript = true;
        self
    }
}

/// Result of [`RunDeliberationUseCase::ask_streaming`].
///
/// Every phase before synthesis has already completed; `events` carries
/// the synthesizer's output as it is produced.
pub struct DeliberationStream {
    pub question: String,
    pub mode: Mode,
    pub transcript: Option<Transcript>,
    pub suggest_alt_opinion: bool,
    pub events: StreamHandle,
}

struct Prepared {
    question: Question,
    mode: Mode,
    plan: PhasePlan,
    suggest_alt_opinion: bool,
}

enum Outcome {
    FastPath(String),
    Deliberated(Transcript, SynthesisDepth),
}

/// Use case for answering a question through the panel protocol
pub struct RunDeliberationUseCase {
    resolver: Arc<dyn CapabilityResolver>,
    classifier: Option<Arc<dyn QuestionClassifier>>,
    policy: ModePolicy,
    params: DeliberationParams,
    synthesizer: Option<Agent>,
    fast_path_agent: Option<Agent>,
    conversation_logger: Arc<dyn ConversationLogger>,
    cancellation_token: Option<CancellationToken>,
}

impl RunDeliberationUseCase {
    pub fn new(resolver: Arc<dyn CapabilityResolver>) -> Self {
        Self {
            resolver,
            classifier: None,
            policy: ModePolicy::default(),
            params: DeliberationParams::default(),
            synthesizer: None,
            fast_path_agent: None,
            conversation_logger: Arc::new(NoConversationLogger),
            cancellation_token: None,
        }
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn QuestionClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn with_policy(mut self, policy: ModePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_params(mut self, params: DeliberationParams) -> Self {
        self.params = params;
        self
    }

    /// Designate the synthesizer. Defaults to the first agent's capability
    /// with the built-in moderator persona.
    pub fn with_synthesizer(mut self, agent: Agent) -> Self {
        self.synthesizer = Some(agent);
        self
    }

    /// Dedicated quick-mode agent. Defaults to the first panel agent.
    pub fn with_fast_path_agent(mut self, agent: Agent) -> Self {
        self.fast_path_agent = Some(agent);
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Answer a question with default (no-op) progress
    pub async fn ask(&self, input: AskInput) -> Result<SynthesisResult, RunDeliberationError> {
        self.ask_with_progress(input, &NoProgress).await
    }

    /// Answer a question with progress callbacks
    pub async fn ask_with_progress(
        &self,
        input: AskInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<SynthesisResult, RunDeliberationError> {
        let prepared = self.prepare(&input, progress).await?;

        let (answer, transcript) = match self.run_phases(&input, &prepared, progress).await? {
            Outcome::FastPath(answer) => (answer, None),
            Outcome::Deliberated(transcript, depth) => {
                let synthesizer = self.synthesizer(&input.agents);
                let request = SynthesisRequest {
                    question: prepared.question.content(),
                    transcript: &transcript,
                    context: input.context.as_deref(),
                    depth,
                };

                info!("Phase: Synthesis");
                progress.on_phase_start(&Phase::Synthesis, 1);
                let answer = self
                    .until_cancelled(synthesizer.synthesize(&request))
                    .await?
                    .map_err(RunDeliberationError::SynthesisFailed)?;
                progress.on_phase_complete(&Phase::Synthesis);

                log_synthesis(
                    self.conversation_logger.as_ref(),
                    &synthesizer.agent().id,
                    depth,
                    &answer,
                );
                (answer, Some(transcript))
            }
        };

        let mut result =
            SynthesisResult::new(prepared.question.into_content(), prepared.mode, answer)
                .with_alt_opinion_hint(prepared.suggest_alt_opinion);
        if input.include_transcript
            && let Some(transcript) = transcript
        {
            result = result.with_transcript(transcript);
        }
        Ok(result)
    }

    /// Like [`ask_with_progress`](Self::ask_with_progress), but the final
    /// synthesis is streamed rather than collected.
    ///
    /// In quick mode the stream carries the fast-path answer as a single
    /// completed event.
    pub async fn ask_streaming(
        &self,
        input: AskInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<DeliberationStream, RunDeliberationError> {
        let prepared = self.prepare(&input, progress).await?;

        let (events, transcript) = match self.run_phases(&input, &prepared, progress).await? {
            Outcome::FastPath(answer) => (StreamHandle::completed(answer), None),
            Outcome::Deliberated(transcript, depth) => {
                let synthesizer = self.synthesizer(&input.agents);
                let request = SynthesisRequest {
                    question: prepared.question.content(),
                    transcript: &transcript,
                    context: input.context.as_deref(),
                    depth,
                };
                info!("Phase: Synthesis (streaming)");
                progress.on_phase_start(&Phase::Synthesis, 1);
                let events = self
                    .until_cancelled(synthesizer.synthesize_stream(&request))
                    .await?
                    .map_err(RunDeliberationError::SynthesisFailed)?;
                progress.on_phase_complete(&Phase::Synthesis);

                let events =
                    self.log_synthesis_stream(synthesizer.agent().id.clone(), depth, events);
                (events, Some(transcript))
            }
        };

        Ok(DeliberationStream {
            question: prepared.question.into_content(),
            mode: prepared.mode,
            transcript: transcript.filter(|_| input.include_transcript),
            suggest_alt_opinion: prepared.suggest_alt_opinion,
            events,
        })
    }

    /// Validate the request and fix the mode. No capability is called here.
    async fn prepare(
        &self,
        input: &AskInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<Prepared, RunDeliberationError> {
        let question = Question::parse(input.question.as_str())?;
        if input.agents.is_empty() {
            return Err(DomainError::NoAgents.into());
        }
        ensure_unique_ids(&input.agents)?;

        let decision = match &self.classifier {
            Some(classifier) => {
                check_cancelled(&self.cancellation_token)?;
                Some(self.until_cancelled(classifier.classify(question.content())).await?)
            }
            None => None,
        };
        let mode = self.policy.resolve(input.mode, decision.as_ref());

        let mut plan = mode.phase_plan();
        if plan.caller_defined_rounds {
            plan = plan.with_roundtables(self.params.council_roundtables);
        }

        info!(
            "Deliberating in {} mode with {} agents: {}",
            mode,
            input.agents.len(),
            preview(question.content(), 80)
        );
        if input.mode.is_some_and(|requested| requested != mode) {
            info!(
                "Routing policy changed mode {} -> {}",
                input.mode.map(|m| m.as_str()).unwrap_or("auto"),
                mode
            );
        }
        progress.on_mode_resolved(input.mode, mode);

        self.conversation_logger.log(ConversationEvent::new(
            "mode_resolved",
            serde_json::json!({
                "requested": input.mode,
                "resolved": mode,
                "complexity": decision.as_ref().map(|d| d.complexity),
                "confidence": decision.as_ref().map(|d| d.confidence),
            }),
        ));

        Ok(Prepared {
            question,
            mode,
            plan,
            suggest_alt_opinion: decision.is_some_and(|d| d.should_suggest_alt_opinion),
        })
    }

    async fn run_phases(
        &self,
        input: &AskInput,
        prepared: &Prepared,
        progress: &dyn ProgressNotifier,
    ) -> Result<Outcome, RunDeliberationError> {
        if prepared.plan.fast_path {
            let answer = self.fast_path(input, prepared, progress).await?;
            return Ok(Outcome::FastPath(answer));
        }

        let transcript = self.deliberate(input, prepared, progress).await?;
        check_cancelled(&self.cancellation_token)?;
        let depth = prepared.plan.synthesis.unwrap_or(SynthesisDepth::Standard);
        Ok(Outcome::Deliberated(transcript, depth))
    }

    /// Quick mode: one agent, no panel, no synthesis.
    async fn fast_path(
        &self,
        input: &AskInput,
        prepared: &Prepared,
        progress: &dyn ProgressNotifier,
    ) -> Result<String, RunDeliberationError> {
        check_cancelled(&self.cancellation_token)?;

        let agent = self.fast_path_agent.as_ref().unwrap_or(&input.agents[0]);
        let messages = PromptTemplate::panel_context(
            agent,
            prepared.question.content(),
            input.context.as_deref(),
        );

        info!("Phase: Quick answer by {}", agent.id);
        progress.on_phase_start(&Phase::FastPath, 1);
        let response = self
            .until_cancelled(self.invoker().invoke(agent, &messages))
            .await?;
        progress.on_agent_complete(&Phase::FastPath, &response);
        progress.on_phase_complete(&Phase::FastPath);

        let answer = if response.content().trim().is_empty() {
            if let Some(error) = response.error() {
                warn!("Quick answer by {} failed: {}", agent.id, error);
            } else {
                warn!("Quick answer by {} was empty", agent.id);
            }
            FAST_PATH_FALLBACK.to_string()
        } else {
            response.content().to_string()
        };

        self.conversation_logger.log(ConversationEvent::new(
            "fast_path_answer",
            serde_json::json!({
                "agent": agent.id.as_str(),
                "fallback": answer == FAST_PATH_FALLBACK,
                "text": answer,
            }),
        ));
        Ok(answer)
    }

    /// Panel round followed by the plan's roundtables.
    async fn deliberate(
        &self,
        input: &AskInput,
        prepared: &Prepared,
        progress: &dyn ProgressNotifier,
    ) -> Result<Transcript, RunDeliberationError> {
        let question = prepared.question.content();
        let context = input.context.as_deref();
        let agents = &input.agents;
        let panel =
            PanelRound::new(self.invoker()).with_cancellation(self.cancellation_token.clone());

        check_cancelled(&self.cancellation_token)?;
        info!("Phase: Panel");
        let first = panel
            .run(
                Phase::Panel,
                agents,
                |agent| PromptTemplate::panel_context(agent, question, context),
                progress,
            )
            .await?;
        self.log_round(Phase::Panel, &first);

        let mut transcript = Transcript::new();
        transcript.push_round(first);

        let roundtables = prepared.plan.roundtables_for(agents.len());
        if roundtables == 0 {
            debug!("Skipping roundtable: {} agent(s)", agents.len());
        }

        let roundtable = RoundtablePhase::new(&panel, question, context);
        for index in 1..=roundtables {
            check_cancelled(&self.cancellation_token)?;
            info!("Phase: Roundtable {}/{}", index, roundtables);
            let next = {
                let prior = transcript.last_round().unwrap_or_default();
                roundtable.run(index, agents, prior, progress).await?
            };
            self.log_round(Phase::Roundtable(index), &next);
            transcript.push_round(next);
        }

        Ok(transcript)
    }

    /// Race `fut` against the cancellation token, if any.
    async fn until_cancelled<T>(
        &self,
        fut: impl Future<Output = T>,
    ) -> Result<T, RunDeliberationError> {
        match &self.cancellation_token {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => Err(RunDeliberationError::Cancelled),
                out = fut => Ok(out),
            },
            None => Ok(fut.await),
        }
    }

    fn invoker(&self) -> AgentInvoker {
        AgentInvoker::new(Arc::clone(&self.resolver))
            .with_options(self.params.generation.clone())
            .with_timeout(self.params.invocation_timeout)
    }

    fn synthesizer(&self, agents: &[Agent]) -> Synthesizer {
        let agent = self.synthesizer.clone().unwrap_or_else(|| Agent {
            id: AgentId::new("synthesizer"),
            display_name: "Synthesizer".to_string(),
            capability: agents[0].capability.clone(),
            persona: String::new(),
        });
        Synthesizer::new(Arc::clone(&self.resolver), agent)
            .with_options(self.params.generation.clone())
            .with_timeout(self.params.invocation_timeout)
    }

    /// Pass the synthesis stream through, recording `synthesis_complete`
    /// before the final event reaches the caller.
    fn log_synthesis_stream(
        &self,
        synthesizer: AgentId,
        depth: SynthesisDepth,
        mut upstream: StreamHandle,
    ) -> StreamHandle {
        let logger = Arc::clone(&self.conversation_logger);
        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        tokio::spawn(async move {
            let mut streamed = String::new();
            while let Some(event) = upstream.receiver.recv().await {
                match &event {
                    StreamEvent::Delta(chunk) => streamed.push_str(chunk),
                    StreamEvent::Completed(text) => {
                        let answer = if streamed.is_empty() { text } else { &streamed };
                        log_synthesis(logger.as_ref(), &synthesizer, depth, answer);
                    }
                    StreamEvent::Error(e) => warn!("Streamed synthesis failed: {}", e),
                }
                if tx.send(event).await.is_err() {
                    debug!("Synthesis stream receiver dropped");
                    return;
                }
            }
        });
        StreamHandle::new(rx)
    }

    fn log_round(&self, phase: Phase, round: &[RoundResponse]) {
        self.conversation_logger.log(ConversationEvent::new(
            "round_complete",
            serde_json::json!({
                "phase": phase.to_string(),
                "responses": round,
            }),
        ));
    }
}

const STREAM_BUFFER: usize = 64;

fn log_synthesis(
    logger: &dyn ConversationLogger,
    synthesizer: &AgentId,
    depth: SynthesisDepth,
    answer: &str,
) {
    logger.log(ConversationEvent::new(
        "synthesis_complete",
        serde_json::json!({
            "synthesizer": synthesizer.as_str(),
            "depth": depth,
            "bytes": answer.len(),
            "text": answer,
        }),
    ));
}
