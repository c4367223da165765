//! Roundtable Phase
//!
//! A critique round built from the immediately preceding round. Each agent
//! sees its own previous answer as its prior turn plus everyone else's
//! answers by display name, and is asked to react. Execution is delegated to
//! [`PanelRound`], so concurrency, ordering and failure isolation are the
//! same as for the panel.
//!
//! Only the previous round is shown to the agents; the full history is
//! reserved for synthesis.

use super::panel_round::PanelRound;
use crate::ports::progress::ProgressNotifier;
use council_domain::{Agent, DomainError, Phase, PromptTemplate, RoundResponse};

pub struct RoundtablePhase<'a> {
    panel: &'a PanelRound,
    question: &'a str,
    context: Option<&'a str>,
}

impl<'a> RoundtablePhase<'a> {
    pub fn new(panel: &'a PanelRound, question: &'a str, context: Option<&'a str>) -> Self {
        Self {
            panel,
            question,
            context,
        }
    }

    /// Run roundtable number `index` (1-based) against `prior_round`.
    ///
    /// An agent whose prior entry failed gets no "own answer" turn; the
    /// failure is not turned into invented content.
    pub async fn run(
        &self,
        index: usize,
        agents: &[Agent],
        prior_round: &[RoundResponse],
        progress: &dyn ProgressNotifier,
    ) -> Result<Vec<RoundResponse>, DomainError> {
        self.panel
            .run(
                Phase::Roundtable(index),
                agents,
                |agent| {
                    PromptTemplate::roundtable_context(
                        agent,
                        self.question,
                        self.context,
                        prior_round,
                    )
                },
                progress,
            )
            .await
    }
}
