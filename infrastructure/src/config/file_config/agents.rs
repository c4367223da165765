//! Agent definitions from TOML (`[[agents]]`, `[synthesizer]`, `[fast_path]`)

use council_domain::Agent;
use serde::{Deserialize, Serialize};

/// Raw agent definition
///
/// ```toml
/// [[agents]]
/// id = "skeptic"
/// display_name = "The Skeptic"
/// capability = "local"
/// persona = "Question every assumption."
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    pub id: String,
    /// Falls back to `id` when omitted.
    pub display_name: Option<String>,
    /// Key into `[capabilities]`.
    pub capability: String,
    pub persona: String,
}

impl FileAgentConfig {
    pub fn to_agent(&self) -> Agent {
        Agent::new(
            self.id.trim(),
            self.display_name
                .clone()
                .unwrap_or_else(|| self.id.trim().to_string()),
            self.capability.trim(),
            self.persona.as_str(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_defaults_to_id() {
        let config = FileAgentConfig {
            id: "analyst".to_string(),
            capability: "local".to_string(),
            ..Default::default()
        };
        let agent = config.to_agent();
        assert_eq!(agent.display_name, "analyst");
        assert_eq!(agent.capability.as_str(), "local");
        assert!(agent.persona.is_empty());
    }

    #[test]
    fn test_ids_are_trimmed() {
        let config = FileAgentConfig {
            id: " analyst ".to_string(),
            display_name: Some("The Analyst".to_string()),
            capability: " local".to_string(),
            persona: "Be precise.".to_string(),
        };
        let agent = config.to_agent();
        assert_eq!(agent.id.as_str(), "analyst");
        assert_eq!(agent.display_name, "The Analyst");
        assert_eq!(agent.capability.as_str(), "local");
    }
}
