//! Infrastructure layer for council
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: configuration loading, process-backed
//! capabilities and the JSONL transcript log.

pub mod capabilities;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use capabilities::{CapabilityRouter, CommandClassifier, ProcessGenerator};
pub use config::{
    ConfigError, ConfigIssue, ConfigLoader, ConfigSource, FileAgentConfig, FileCapabilityConfig,
    FileConfig, FileDeliberationConfig, FileRoutingConfig, Severity,
};
pub use logging::JsonlConversationLogger;
