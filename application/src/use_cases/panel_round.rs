//! Panel Round
//!
//! Scatter/gather over a set of agents: every invocation is spawned at once
//! and the round settles only when all of them have. Failures are already
//! captured by [`AgentInvoker`], so one bad agent never aborts the round.

use super::invoke_agent::AgentInvoker;
use crate::ports::progress::ProgressNotifier;
use council_domain::{Agent, DomainError, Phase, PromptContext, RoundResponse};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Runs one round of concurrent agent invocations.
#[derive(Clone)]
pub struct PanelRound {
    invoker: AgentInvoker,
    cancellation_token: Option<CancellationToken>,
}

impl PanelRound {
    pub fn new(invoker: AgentInvoker) -> Self {
        Self {
            invoker,
            cancellation_token: None,
        }
    }

    pub fn with_cancellation(mut self, token: Option<CancellationToken>) -> Self {
        self.cancellation_token = token;
        self
    }

    /// Invoke every agent with the prompt produced by `build_prompt`.
    ///
    /// The result holds one entry per agent in input order, whatever order
    /// the invocations finished in. An empty agent list is a no-op round.
    ///
    /// Only cancellation makes this return `Err`; outstanding invocations
    /// are aborted and no partial round is returned.
    pub async fn run<F>(
        &self,
        phase: Phase,
        agents: &[Agent],
        build_prompt: F,
        progress: &dyn ProgressNotifier,
    ) -> Result<Vec<RoundResponse>, DomainError>
    where
        F: Fn(&Agent) -> PromptContext,
    {
        if agents.is_empty() {
            return Ok(Vec::new());
        }

        info!("{}: invoking {} agents", phase, agents.len());
        progress.on_phase_start(&phase, agents.len());

        let mut join_set = JoinSet::new();
        for (index, agent) in agents.iter().enumerate() {
            let messages = build_prompt(agent);
            let invoker = self.invoker.clone();
            let agent = agent.clone();
            join_set.spawn(async move {
                let response = invoker.invoke(&agent, &messages).await;
                (index, response)
            });
        }

        let mut slots: Vec<Option<RoundResponse>> = vec![None; agents.len()];

        loop {
            let joined = if let Some(ref token) = self.cancellation_token {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        join_set.abort_all();
                        warn!("{} cancelled with invocations outstanding", phase);
                        return Err(DomainError::Cancelled);
                    }
                    joined = join_set.join_next() => joined,
                }
            } else {
                join_set.join_next().await
            };

            let Some(joined) = joined else { break };
            match joined {
                Ok((index, response)) => {
                    progress.on_agent_complete(&phase, &response);
                    slots[index] = Some(response);
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                }
            }
        }

        let round: Vec<RoundResponse> = slots
            .into_iter()
            .zip(agents)
            .map(|(slot, agent)| {
                slot.unwrap_or_else(|| RoundResponse::failure(agent, "agent task did not complete"))
            })
            .collect();

        let failed = round.iter().filter(|r| !r.is_success()).count();
        if failed > 0 {
            warn!("{}: {}/{} agents failed", phase, failed, round.len());
        }
        progress.on_phase_complete(&phase);
        Ok(round)
    }
}
