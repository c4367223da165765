//! Classifier output

use serde::{Deserialize, Serialize};

/// Complexity signal produced by a question classifier.
///
/// Read-only input to [`ModePolicy`](super::ModePolicy); nothing in the
/// deliberation engine mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingDecision {
    /// Free-form category label, e.g. "factual" or "planning".
    pub question_type: String,
    /// Estimated complexity in `[0, 1]`.
    pub complexity: f64,
    /// Agent the classifier would pick for a single-voice answer.
    pub recommended_agent: String,
    /// Classifier confidence in `[0, 1]`.
    pub confidence: f64,
    pub should_suggest_alt_opinion: bool,
}

impl RoutingDecision {
    pub fn new(question_type: impl Into<String>, complexity: f64, confidence: f64) -> Self {
        Self {
            question_type: question_type.into(),
            complexity: complexity.clamp(0.0, 1.0),
            recommended_agent: String::new(),
            confidence: confidence.clamp(0.0, 1.0),
            should_suggest_alt_opinion: false,
        }
    }

    pub fn with_recommended_agent(mut self, agent: impl Into<String>) -> Self {
        self.recommended_agent = agent.into();
        self
    }

    pub fn with_alt_opinion(mut self, suggest: bool) -> Self {
        self.should_suggest_alt_opinion = suggest;
        self
    }
}
