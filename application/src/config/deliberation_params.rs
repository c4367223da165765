//! Deliberation parameters: use case control.
//!
//! [`DeliberationParams`] groups the static parameters that control how
//! [`RunDeliberationUseCase`](crate::use_cases::run_deliberation::RunDeliberationUseCase)
//! talks to its capabilities. They are set once at start-up.

use crate::ports::llm_gateway::GenerationOptions;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct DeliberationParams {
    /// Upper bound for each single capability call. `None` waits forever.
    pub invocation_timeout: Option<Duration>,
    /// Roundtables run in council mode.
    pub council_roundtables: usize,
    /// Sampling options sent with every call.
    pub generation: GenerationOptions,
}

impl Default for DeliberationParams {
    fn default() -> Self {
        Self {
            invocation_timeout: Some(Duration::from_secs(120)),
            council_roundtables: 2,
            generation: GenerationOptions::default(),
        }
    }
}

impl DeliberationParams {
    pub fn with_invocation_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.invocation_timeout = timeout;
        self
    }

    pub fn with_council_roundtables(mut self, rounds: usize) -> Self {
        self.council_roundtables = rounds;
        self
    }

    pub fn with_generation(mut self, generation: GenerationOptions) -> Self {
        self.generation = generation;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = DeliberationParams::default();
        assert_eq!(params.invocation_timeout, Some(Duration::from_secs(120)));
        assert_eq!(params.council_roundtables, 2);
        assert_eq!(params.generation, GenerationOptions::default());
    }

    #[test]
    fn test_builder() {
        let params = DeliberationParams::default()
            .with_invocation_timeout(None)
            .with_council_roundtables(3)
            .with_generation(GenerationOptions {
                temperature: Some(0.2),
                max_tokens: None,
            });

        assert!(params.invocation_timeout.is_none());
        assert_eq!(params.council_roundtables, 3);
        assert_eq!(params.generation.temperature, Some(0.2));
    }
}
