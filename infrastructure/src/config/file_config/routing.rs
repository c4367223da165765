//! Routing policy from TOML (`[routing]` section)
//!
//! ```toml
//! [routing]
//! enabled = true
//! quick_below = 0.3
//! contemplate_above = 0.75
//! min_confidence = 0.6
//! allow_upgrade = false
//!
//! [routing.classifier]
//! command = "council-classify"
//! args = ["--json"]
//! ```

use super::FileCapabilityConfig;
use council_domain::{Mode, ModePolicy};
use serde::{Deserialize, Serialize};

/// External classifier command. Same shape as a capability.
pub type FileClassifierConfig = FileCapabilityConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRoutingConfig {
    /// Consult the classifier at all
    pub enabled: bool,
    pub quick_below: f64,
    pub contemplate_above: f64,
    pub min_confidence: f64,
    /// Let a confident "complex" verdict upgrade thoughtful to contemplate
    pub allow_upgrade: bool,
    pub classifier: Option<FileClassifierConfig>,
}

impl Default for FileRoutingConfig {
    fn default() -> Self {
        let policy = ModePolicy::default();
        Self {
            enabled: true,
            quick_below: policy.quick_below,
            contemplate_above: policy.contemplate_above,
            min_confidence: policy.min_confidence,
            allow_upgrade: policy.allow_upgrade,
            classifier: None,
        }
    }
}

impl FileRoutingConfig {
    pub fn to_policy(&self, default_mode: Mode) -> ModePolicy {
        ModePolicy {
            default_mode,
            quick_below: self.quick_below,
            contemplate_above: self.contemplate_above,
            min_confidence: self.min_confidence,
            allow_upgrade: self.allow_upgrade,
        }
    }

    /// Classifier to consult, if routing is enabled and one is configured.
    pub fn active_classifier(&self) -> Option<&FileClassifierConfig> {
        self.classifier.as_ref().filter(|_| self.enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_policy_default() {
        let config = FileRoutingConfig::default();
        assert_eq!(config.to_policy(Mode::Thoughtful), ModePolicy::default());
    }

    #[test]
    fn test_disabled_routing_hides_classifier() {
        let config = FileRoutingConfig {
            enabled: false,
            classifier: Some(FileCapabilityConfig::new("classify")),
            ..Default::default()
        };
        assert!(config.active_classifier().is_none());
    }
}
