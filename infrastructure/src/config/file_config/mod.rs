//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod agents;
mod capabilities;
mod deliberation;
mod logging;
mod routing;

pub use agents::FileAgentConfig;
pub use capabilities::FileCapabilityConfig;
pub use deliberation::FileDeliberationConfig;
pub use logging::FileLoggingConfig;
pub use routing::{FileClassifierConfig, FileRoutingConfig};

use super::error::ConfigIssue;
use council_domain::{Agent, ModePolicy};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Panel members, in reporting order
    pub agents: Vec<FileAgentConfig>,
    /// Final-answer agent; defaults to the built-in moderator persona
    pub synthesizer: Option<FileAgentConfig>,
    /// Dedicated quick-mode agent; defaults to the first panel agent
    pub fast_path: Option<FileAgentConfig>,
    pub deliberation: FileDeliberationConfig,
    pub routing: FileRoutingConfig,
    /// Named text-generation backends
    pub capabilities: BTreeMap<String, FileCapabilityConfig>,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    pub fn panel(&self) -> Vec<Agent> {
        self.agents.iter().map(FileAgentConfig::to_agent).collect()
    }

    pub fn synthesizer_agent(&self) -> Option<Agent> {
        self.synthesizer.as_ref().map(FileAgentConfig::to_agent)
    }

    pub fn fast_path_agent(&self) -> Option<Agent> {
        self.fast_path.as_ref().map(FileAgentConfig::to_agent)
    }

    pub fn policy(&self) -> ModePolicy {
        self.routing.to_policy(self.deliberation.default_mode)
    }

    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Errors make the configuration unusable; warnings are reported and
    /// otherwise ignored.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        // 1. Panel
        if self.agents.is_empty() {
            issues.push(ConfigIssue::error(
                "agents",
                "no [[agents]] configured; at least one panel agent is required",
            ));
        }
        let mut seen = HashSet::new();
        for (i, agent) in self.agents.iter().enumerate() {
            let field = format!("agents[{}]", i);
            self.check_agent(&field, agent, &mut issues);
            if !agent.id.trim().is_empty() && !seen.insert(agent.id.trim()) {
                issues.push(ConfigIssue::error(
                    format!("{}.id", field),
                    format!("duplicate agent id '{}'", agent.id.trim()),
                ));
            }
        }

        // 2. Optional agents
        if let Some(agent) = &self.synthesizer {
            self.check_agent("synthesizer", agent, &mut issues);
        }
        if let Some(agent) = &self.fast_path {
            self.check_agent("fast_path", agent, &mut issues);
        }

        // 3. Backends
        for (name, capability) in &self.capabilities {
            if capability.command.trim().is_empty() {
                issues.push(ConfigIssue::error(
                    format!("capabilities.{}.command", name),
                    "command cannot be empty",
                ));
            }
        }
        if let Some(classifier) = &self.routing.classifier
            && classifier.command.trim().is_empty()
        {
            issues.push(ConfigIssue::error(
                "routing.classifier.command",
                "command cannot be empty",
            ));
        }

        // 4. Deliberation
        if self.deliberation.timeout_seconds == Some(0) {
            issues.push(ConfigIssue::error(
                "deliberation.timeout_seconds",
                "timeout_seconds cannot be 0",
            ));
        }
        if self.deliberation.council_roundtables == 0 {
            issues.push(ConfigIssue::warning(
                "deliberation.council_roundtables",
                "council mode will run no roundtables",
            ));
        }

        // 5. Routing thresholds
        let thresholds = [
            ("routing.quick_below", self.routing.quick_below),
            ("routing.contemplate_above", self.routing.contemplate_above),
            ("routing.min_confidence", self.routing.min_confidence),
        ];
        for (field, value) in thresholds {
            if !(0.0..=1.0).contains(&value) {
                issues.push(ConfigIssue::error(
                    field,
                    format!("{} is outside [0, 1]", value),
                ));
            }
        }
        if self.routing.quick_below > self.routing.contemplate_above {
            issues.push(ConfigIssue::error(
                "routing.quick_below",
                format!(
                    "quick_below ({}) is above contemplate_above ({})",
                    self.routing.quick_below, self.routing.contemplate_above
                ),
            ));
        }

        issues
    }

    fn check_agent(&self, field: &str, agent: &FileAgentConfig, issues: &mut Vec<ConfigIssue>) {
        if agent.id.trim().is_empty() {
            issues.push(ConfigIssue::error(
                format!("{}.id", field),
                "agent id cannot be empty",
            ));
        }
        let capability = agent.capability.trim();
        if capability.is_empty() {
            issues.push(ConfigIssue::error(
                format!("{}.capability", field),
                "capability cannot be empty",
            ));
        } else if !self.capabilities.contains_key(capability) {
            issues.push(ConfigIssue::error(
                format!("{}.capability", field),
                format!("unknown capability '{}'", capability),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::Mode;

    const FULL: &str = r#"
[[agents]]
id = "optimist"
display_name = "The Optimist"
capability = "local"
persona = "Look for what could go right."

[[agents]]
id = "skeptic"
capability = "local"
persona = "Question every assumption."

[synthesizer]
id = "moderator"
capability = "large"

[deliberation]
default_mode = "contemplate"
timeout_seconds = 45
council_roundtables = 3

[routing]
quick_below = 0.2
allow_upgrade = true

[capabilities.local]
command = "llm-bridge"
args = ["--model", "small"]

[capabilities.large]
command = "llm-bridge"
args = ["--model", "large"]
env = { BRIDGE_TOKEN = "secret" }

[logging]
transcript_log = "/tmp/council.jsonl"
"#;

    #[test]
    fn test_deserialize_full_config() {
        let config: FileConfig = toml::from_str(FULL).unwrap();

        let panel = config.panel();
        assert_eq!(panel.len(), 2);
        assert_eq!(panel[0].display_name, "The Optimist");
        assert_eq!(panel[1].display_name, "skeptic");

        let synthesizer = config.synthesizer_agent().unwrap();
        assert_eq!(synthesizer.capability.as_str(), "large");
        assert!(config.fast_path_agent().is_none());

        assert_eq!(config.deliberation.default_mode, Mode::Contemplate);
        assert_eq!(config.deliberation.timeout_seconds, Some(45));
        assert_eq!(config.capabilities["large"].env["BRIDGE_TOKEN"], "secret");

        let policy = config.policy();
        assert_eq!(policy.default_mode, Mode::Contemplate);
        assert_eq!(policy.quick_below, 0.2);
        assert!(policy.allow_upgrade);

        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: FileConfig = toml::from_str(
            r#"
[deliberation]
include_transcript = true
"#,
        )
        .unwrap();
        assert!(config.deliberation.include_transcript);
        // Defaults should apply
        assert_eq!(config.deliberation.timeout_seconds, Some(120));
        assert_eq!(config.deliberation.council_roundtables, 2);
        assert!(config.routing.enabled);
    }

    #[test]
    fn test_unknown_mode_fails_to_parse() {
        let result: Result<FileConfig, _> = toml::from_str(
            r#"
[deliberation]
default_mode = "exhaustive"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_default_requires_agents() {
        let issues = FileConfig::default().validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "agents");
        assert!(issues[0].is_error());
    }

    #[test]
    fn test_validate_duplicate_and_unknown() {
        let config: FileConfig = toml::from_str(
            r#"
[[agents]]
id = "a"
capability = "local"

[[agents]]
id = "a"
capability = "remote"

[capabilities.local]
command = "bridge"
"#,
        )
        .unwrap();
        let issues = config.validate();
        assert!(issues.iter().any(|i| i.field == "agents[1].id"));
        assert!(
            issues
                .iter()
                .any(|i| i.field == "agents[1].capability" && i.message.contains("remote"))
        );
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config: FileConfig = toml::from_str(FULL).unwrap();
        config.deliberation.timeout_seconds = Some(0);
        let issues = config.validate();
        assert!(
            issues
                .iter()
                .any(|i| i.field == "deliberation.timeout_seconds" && i.is_error())
        );
    }

    #[test]
    fn test_validate_thresholds() {
        let mut config: FileConfig = toml::from_str(FULL).unwrap();
        config.routing.min_confidence = 1.5;
        config.routing.quick_below = 0.9;
        config.routing.contemplate_above = 0.5;
        let fields: Vec<String> = config.validate().into_iter().map(|i| i.field).collect();
        assert!(fields.contains(&"routing.min_confidence".to_string()));
        assert!(fields.contains(&"routing.quick_below".to_string()));
    }

    #[test]
    fn test_validate_zero_council_roundtables_is_warning() {
        let mut config: FileConfig = toml::from_str(FULL).unwrap();
        config.deliberation.council_roundtables = 0;
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(!issues[0].is_error());
    }
}
