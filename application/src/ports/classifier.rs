//! Question classification port
//!
//! The classifier's scoring heuristics live outside this crate; the
//! orchestrator only consumes its [`RoutingDecision`].

use async_trait::async_trait;
use council_domain::RoutingDecision;

/// Estimates question complexity.
///
/// Must be a pure function of the question text. Implementations report
/// their own failures as a low-confidence decision rather than an error.
#[async_trait]
pub trait QuestionClassifier: Send + Sync {
    async fn classify(&self, question: &str) -> RoutingDecision;
}

/// Classifier that always returns the same decision.
///
/// Useful for pinning routing behaviour in tests and for deployments that
/// want a fixed complexity estimate.
pub struct FixedClassifier(pub RoutingDecision);

#[async_trait]
impl QuestionClassifier for FixedClassifier {
    async fn classify(&self, _question: &str) -> RoutingDecision {
        self.0.clone()
    }
}
