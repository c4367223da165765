//! Deliberation settings from TOML (`[deliberation]` section)

use council_application::{DeliberationParams, GenerationOptions};
use council_domain::Mode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw deliberation configuration
///
/// ```toml
/// [deliberation]
/// default_mode = "thoughtful"
/// include_transcript = false
/// timeout_seconds = 120
/// temperature = 0.7
/// max_tokens = 1024
/// council_roundtables = 3
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDeliberationConfig {
    /// Mode used when neither the caller nor routing picks one
    pub default_mode: Mode,
    /// Return every round alongside the answer
    pub include_transcript: bool,
    /// Per-invocation timeout. `0` is rejected by validation.
    pub timeout_seconds: Option<u64>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Roundtables run in council mode
    pub council_roundtables: usize,
}

impl Default for FileDeliberationConfig {
    fn default() -> Self {
        Self {
            default_mode: Mode::default(),
            include_transcript: false,
            timeout_seconds: Some(120),
            temperature: None,
            max_tokens: None,
            council_roundtables: 2,
        }
    }
}

impl FileDeliberationConfig {
    pub fn to_params(&self) -> DeliberationParams {
        DeliberationParams::default()
            .with_invocation_timeout(self.timeout_seconds.map(Duration::from_secs))
            .with_council_roundtables(self.council_roundtables)
            .with_generation(GenerationOptions {
                temperature: self.temperature,
                max_tokens: self.max_tokens,
            })
    }
}
