//! Configuration file loading for council
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `COUNCIL_*` environment variables (`__` separates sections)
//! 2. `--config <path>` specified file
//! 3. Project root: `./council.toml` or `./.council.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/council/config.toml`
//! 5. Default values

mod error;
mod file_config;
mod loader;

pub use error::{ConfigError, ConfigIssue, Severity};
pub use file_config::{
    FileAgentConfig, FileCapabilityConfig, FileClassifierConfig, FileConfig,
    FileDeliberationConfig, FileLoggingConfig, FileRoutingConfig,
};
pub use loader::{ConfigLoader, ConfigSource};
