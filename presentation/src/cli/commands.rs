//! CLI command definitions

use clap::{Parser, ValueEnum};
use council_domain::Mode;
use std::path::PathBuf;

/// Output format for deliberation results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Only the final answer
    Answer,
    /// Every round followed by the answer
    Full,
    /// JSON output
    Json,
}

/// CLI arguments for council
#[derive(Parser, Debug)]
#[command(name = "council")]
#[command(author, version, about = "Ask a panel of agents; get one considered answer")]
#[command(long_about = r#"
Council answers a question with a small deliberation protocol.

Depending on the mode:
  quick        One agent answers directly
  thoughtful   Panel answers in parallel, one roundtable, synthesis
  contemplate  Panel, two roundtables, deep synthesis
  council      Panel, configurable roundtables, deep synthesis

Configuration files are loaded from (in priority order):
1. COUNCIL_* environment variables
2. --config <path>     Explicit config file
3. ./council.toml      Project-level config
4. ~/.config/council/config.toml   Global config

Example:
  council "Should we rewrite the billing service?"
  council --mode quick "What is the capital of France?"
  council --mode contemplate --output full "Plan a migration to Postgres"
"#)]
pub struct Cli {
    /// The question to put to the panel
    pub question: Option<String>,

    /// Deliberation depth (q, t, c also accepted). Defaults to routing policy.
    #[arg(short, long, value_name = "MODE", value_parser = parse_mode)]
    pub mode: Option<Mode>,

    /// Extra context injected into every prompt
    #[arg(long, value_name = "TEXT")]
    pub context: Option<String>,

    /// Include every round in the result
    #[arg(short, long)]
    pub transcript: bool,

    /// Stream the final answer as it is generated
    #[arg(long)]
    pub stream: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "answer")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Skip configuration files; only COUNCIL_* environment variables apply
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Write diagnostic logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

fn parse_mode(s: &str) -> Result<Mode, String> {
    s.parse::<Mode>().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["council", "Why is the sky blue?"]).unwrap();
        assert_eq!(cli.question.as_deref(), Some("Why is the sky blue?"));
        assert_eq!(cli.mode, None);
        assert_eq!(cli.output, OutputFormat::Answer);
        assert!(!cli.transcript);
        assert!(!cli.stream);
    }

    #[test]
    fn test_mode_aliases() {
        let cli = Cli::try_parse_from(["council", "--mode", "c", "q"]).unwrap();
        assert_eq!(cli.mode, Some(Mode::Contemplate));
        let cli = Cli::try_parse_from(["council", "-m", "council", "q"]).unwrap();
        assert_eq!(cli.mode, Some(Mode::Council));
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        assert!(Cli::try_parse_from(["council", "--mode", "deep", "q"]).is_err());
    }

    #[test]
    fn test_verbosity_counts() {
        let cli = Cli::try_parse_from(["council", "-vv", "--output", "json", "q"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.output, OutputFormat::Json);
    }
}
