//! Capability backends from TOML (`[capabilities.<name>]` tables)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A text-generation backend run as a child process
///
/// ```toml
/// [capabilities.local]
/// command = "ollama-bridge"
/// args = ["--model", "llama3"]
/// env = { OLLAMA_HOST = "127.0.0.1:11434" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCapabilityConfig {
    pub command: String,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
}

impl FileCapabilityConfig {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Default::default()
        }
    }
}
