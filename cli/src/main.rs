//! CLI entrypoint for council
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use council_application::{
    AskInput, NoProgress, ProgressNotifier, RunDeliberationError, RunDeliberationUseCase,
};
use council_domain::StreamEvent;
use council_infrastructure::{
    CapabilityRouter, CommandClassifier, ConfigLoader, FileConfig, JsonlConversationLogger,
};
use council_presentation::{Cli, ConsoleFormatter, OutputFormat, ProgressReporter};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Exit status after Ctrl-C.
const EXIT_CANCELLED: i32 = 130;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_guard = init_tracing(cli.verbose, cli.log_file.as_deref())?;

    if cli.show_config {
        print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    info!("Starting council");

    let config = if cli.no_config {
        ConfigLoader::load_env_only()?
    } else {
        ConfigLoader::load(cli.config.as_deref())?
    };
    let (config, warnings) = ConfigLoader::check(config)?;
    for issue in &warnings {
        warn!("config: {}", issue);
    }

    let question = match cli.question.clone() {
        Some(q) => q,
        None => bail!("Question is required. Run `council --help` for usage."),
    };

    let token = CancellationToken::new();
    let ctrl_c = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    // === Dependency Injection ===
    let use_case = build_use_case(&config, token.clone());

    let mut input = AskInput::new(question, config.panel());
    if let Some(mode) = cli.mode {
        input = input.with_mode(mode);
    }
    if let Some(context) = &cli.context {
        input = input.with_context(context.as_str());
    }
    if cli.transcript || config.deliberation.include_transcript || cli.output == OutputFormat::Full
    {
        input = input.with_transcript();
    }

    let progress: Box<dyn ProgressNotifier> = if cli.quiet {
        Box::new(NoProgress)
    } else {
        Box::new(ProgressReporter::new())
    };

    let outcome = if cli.stream && cli.output != OutputFormat::Json {
        run_streaming(&use_case, input, progress.as_ref(), &cli, &token).await
    } else {
        if cli.stream {
            warn!("--stream is ignored with --output json");
        }
        run_collected(&use_case, input, progress.as_ref(), &cli).await
    };

    match outcome {
        Err(e) if is_cancelled(&e) => {
            eprintln!("Cancelled.");
            flush_logs(log_guard);
            std::process::exit(EXIT_CANCELLED);
        }
        other => other,
    }
}

fn is_cancelled(err: &anyhow::Error) -> bool {
    err.downcast_ref::<RunDeliberationError>()
        .is_some_and(|e| e.is_cancelled())
}

/// Drain the log file writer. `process::exit` skips destructors.
fn flush_logs(log_guard: Option<WorkerGuard>) {
    drop(log_guard);
}

/// Install the tracing subscriber. The guard must live until exit so the
/// file writer drains.
fn init_tracing(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    // Initialize logging based on verbosity level
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(file);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(Some(guard))
}

fn print_config_sources(config_path: Option<&Path>) {
    println!("Configuration sources (in priority order):");
    println!("  [ENV  ] COUNCIL_* environment variables");
    for source in ConfigLoader::sources(config_path) {
        let marker = if source.found { "FOUND" } else { "     " };
        println!("  [{}] {:<8} {}", marker, format!("{}:", source.label), source.path.display());
    }
    println!("  [     ] Default: built-in defaults");
}

fn build_use_case(config: &FileConfig, token: CancellationToken) -> RunDeliberationUseCase {
    let router = CapabilityRouter::from_config(&config.capabilities);
    info!("Capabilities: {}", router.names().join(", "));

    let mut use_case = RunDeliberationUseCase::new(Arc::new(router))
        .with_policy(config.policy())
        .with_params(config.deliberation.to_params())
        .with_cancellation(token);

    if let Some(agent) = config.synthesizer_agent() {
        use_case = use_case.with_synthesizer(agent);
    }
    if let Some(agent) = config.fast_path_agent() {
        use_case = use_case.with_fast_path_agent(agent);
    }
    if let Some(classifier) = config.routing.active_classifier() {
        use_case = use_case.with_classifier(Arc::new(CommandClassifier::new(classifier.clone())));
    }
    if let Some(path) = &config.logging.transcript_log
        && let Some(logger) = JsonlConversationLogger::open(path)
    {
        info!("Transcript log: {}", logger.path().display());
        use_case = use_case.with_conversation_logger(Arc::new(logger));
    }

    use_case
}

async fn run_collected(
    use_case: &RunDeliberationUseCase,
    input: AskInput,
    progress: &dyn ProgressNotifier,
    cli: &Cli,
) -> Result<()> {
    let result = use_case.ask_with_progress(input, progress).await?;

    let output = match cli.output {
        OutputFormat::Full => ConsoleFormatter::format(&result),
        OutputFormat::Answer => ConsoleFormatter::format_answer_only(&result),
        OutputFormat::Json => ConsoleFormatter::format_json(&result),
    };
    println!("{}", output.trim_end());

    Ok(())
}

async fn run_streaming(
    use_case: &RunDeliberationUseCase,
    input: AskInput,
    progress: &dyn ProgressNotifier,
    cli: &Cli,
    token: &CancellationToken,
) -> Result<()> {
    let mut stream = use_case.ask_streaming(input, progress).await?;

    if cli.output == OutputFormat::Full
        && let Some(transcript) = &stream.transcript
    {
        println!("{}", ConsoleFormatter::format_transcript(transcript));
    }

    let mut stdout = std::io::stdout();
    let mut printed = false;
    loop {
        let event = tokio::select! {
            biased;
            _ = token.cancelled() => return Err(RunDeliberationError::Cancelled.into()),
            event = stream.events.receiver.recv() => event,
        };
        match event {
            Some(StreamEvent::Delta(chunk)) => {
                print!("{}", chunk);
                stdout.flush()?;
                printed = true;
            }
            Some(StreamEvent::Completed(text)) => {
                if !printed {
                    print!("{}", text);
                }
                break;
            }
            Some(StreamEvent::Error(e)) => bail!("Synthesis failed: {}", e),
            None => break,
        }
    }
    println!();

    if stream.suggest_alt_opinion && !cli.quiet {
        eprintln!("\nThis question may benefit from a second opinion; try --mode council.");
    }
    info!("Answered in {} mode", stream.mode);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_application::GatewayError;

    #[test]
    fn test_only_cancellation_maps_to_cancelled_exit() {
        assert!(is_cancelled(&RunDeliberationError::Cancelled.into()));
        assert!(!is_cancelled(
            &RunDeliberationError::SynthesisFailed(GatewayError::Timeout).into()
        ));
        assert!(!is_cancelled(&anyhow::anyhow!("config missing")));
    }

    #[test]
    fn test_flush_logs_writes_buffered_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("council.log");
        let file = std::fs::File::create(&path).unwrap();
        let (writer, guard) = tracing_appender::non_blocking(file);
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(writer)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            info!("last words before exit");
        });

        flush_logs(Some(guard));
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("last words before exit"));
    }
}
