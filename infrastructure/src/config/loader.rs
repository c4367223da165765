//! Configuration file loader with multi-source merging

use super::error::{ConfigError, ConfigIssue};
use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const PROJECT_FILES: [&str; 2] = ["council.toml", ".council.toml"];
const ENV_PREFIX: &str = "COUNCIL_";

/// One place configuration may come from, for `--show-config`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigSource {
    pub label: &'static str,
    pub path: PathBuf,
    pub found: bool,
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `COUNCIL_*` environment variables
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./council.toml` or `./.council.toml`
    /// 4. XDG config: `$XDG_CONFIG_HOME/council/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, ConfigError> {
        let mut figment = Self::defaults();

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(project_path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(project_path));
        }

        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            figment = figment.merge(Toml::file(path));
        }

        Self::extract(figment)
    }

    /// Built-in defaults plus `COUNCIL_*` environment variables, skipping
    /// every config file (for --no-config).
    pub fn load_env_only() -> Result<FileConfig, ConfigError> {
        Self::extract(Self::defaults())
    }

    fn defaults() -> Figment {
        Figment::new().merge(Serialized::defaults(FileConfig::default()))
    }

    fn extract(figment: Figment) -> Result<FileConfig, ConfigError> {
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| ConfigError::Load(Box::new(e)))
    }

    /// Reject the configuration if validation reports errors.
    ///
    /// Warnings are returned alongside the config for the caller to report.
    pub fn check(config: FileConfig) -> Result<(FileConfig, Vec<ConfigIssue>), ConfigError> {
        let (errors, warnings): (Vec<_>, Vec<_>) =
            config.validate().into_iter().partition(|i| i.is_error());
        if !errors.is_empty() {
            return Err(ConfigError::Invalid(errors));
        }
        Ok((config, warnings))
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/council/config.toml if set,
    /// otherwise falls back to ~/.config/council/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("council").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// The file locations consulted, highest priority first.
    pub fn sources(config_path: Option<&Path>) -> Vec<ConfigSource> {
        let mut sources = Vec::new();

        if let Some(path) = config_path {
            sources.push(ConfigSource {
                label: "Explicit",
                path: path.to_path_buf(),
                found: path.exists(),
            });
        }

        match Self::project_config_path() {
            Some(path) => sources.push(ConfigSource {
                label: "Project",
                path,
                found: true,
            }),
            None => sources.push(ConfigSource {
                label: "Project",
                path: PathBuf::from(PROJECT_FILES[0]),
                found: false,
            }),
        }

        if let Some(path) = Self::global_config_path() {
            let found = path.exists();
            sources.push(ConfigSource {
                label: "Global",
                path,
                found,
            });
        }

        sources
    }
}
