//! CLI entrypoint for concord
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use concord_application::{
    ConversationLogger, NoConversationLogger, ReplayTranscriptInput, ReplayTranscriptUseCase,
};
use concord_domain::{ShapeValidator, parse_brief};
use concord_infrastructure::{
    ConfigLoader, FileConfig, JsonlConversationLogger, SchemaLoader, load_transcript,
};
use concord_presentation::{Cli, Command, ConsoleFormatter, OutputFormat};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        bail!("No command given. Run `concord --help` for usage.");
    };

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())?
    };
    let config = match &command {
        Command::Replay { max_rounds, .. } => config.with_max_rounds_override(*max_rounds),
        Command::Brief { .. } => config,
    };
    check_config(&config)?;

    // === Dependency Injection ===
    let log_path = cli
        .conversation_log
        .as_deref()
        .or(config.logging.conversation_log.as_deref());
    let conversation_logger = open_conversation_log(log_path)?;

    match command {
        Command::Replay {
            transcript,
            output,
            schema,
            ..
        } => {
            let params = config.session_params();

            let schema_path = schema.as_deref().or(config.validation.schema_path.as_deref());
            let validator = ShapeValidator::with_primary(SchemaLoader::load(schema_path));

            let entries = load_transcript(&transcript)?;
            info!(
                "Loaded {} messages from {}",
                entries.len(),
                transcript.display()
            );

            let use_case = ReplayTranscriptUseCase::new(Arc::new(validator))
                .with_conversation_logger(conversation_logger);
            let result = use_case.execute(ReplayTranscriptInput::new(entries, params))?;

            let rendered = match output {
                OutputFormat::Full => ConsoleFormatter::format_replay(&result),
                OutputFormat::Json => ConsoleFormatter::format_json(&result),
            };
            println!("{}", rendered);

            Ok(if result.outcome.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Brief { text, output } => {
            let brief = parse_brief(&text)?;
            let rendered = match output {
                OutputFormat::Full => ConsoleFormatter::format_brief(&brief),
                OutputFormat::Json => ConsoleFormatter::format_json(&brief),
            };
            println!("{}", rendered);
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Report configuration issues; refuse to run on errors.
fn check_config(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    for issue in issues.iter().filter(|issue| !issue.is_error()) {
        warn!("{}", issue.message);
    }

    let errors: Vec<String> = issues
        .iter()
        .filter(|issue| issue.is_error())
        .map(|issue| issue.message.clone())
        .collect();
    if !errors.is_empty() {
        bail!("Invalid configuration:\n  {}", errors.join("\n  "));
    }
    Ok(())
}

fn open_conversation_log(path: Option<&Path>) -> Result<Arc<dyn ConversationLogger>> {
    let Some(path) = path else {
        return Ok(Arc::new(NoConversationLogger));
    };
    let logger = JsonlConversationLogger::open(path)
        .with_context(|| format!("Could not open conversation log {}", path.display()))?;
    info!("Logging conversation events to {}", path.display());
    Ok(Arc::new(logger))
}
