//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report
    Full,
    /// JSON output
    Json,
}

/// CLI arguments for concord
#[derive(Parser, Debug)]
#[command(name = "concord")]
#[command(author, version, about = "Track multi-party conversations toward consensus")]
#[command(long_about = r#"
Concord watches a conversation between several participants, decides when it
should stop (consensus, stalemate, repetition, or the round limit), and
recovers a validated JSON document from the final message.

Configuration files are loaded from (in priority order):
1. MAX_ROUNDS / CONCORD_* environment variables
2. --config <path>     Explicit config file
3. ./concord.toml      Project-level config
4. ~/.config/concord/config.toml   Global config

Example:
  concord replay session.json
  concord replay session.json --output json --conversation-log events.jsonl
  concord brief "* Recipe app * Busy parents * Plan a week of meals"
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Append conversation events to this JSONL file
    #[arg(long, value_name = "PATH", global = true)]
    pub conversation_log: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a recorded conversation and report the outcome
    Replay {
        /// JSON array of {"author": ..., "content": ...} messages
        transcript: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "full")]
        output: OutputFormat,

        /// Override the round ceiling
        #[arg(long, value_name = "N")]
        max_rounds: Option<usize>,

        /// JSON Schema for the primary validation rule
        #[arg(long, value_name = "PATH")]
        schema: Option<PathBuf>,
    },

    /// Split a project brief into idea, personas, and outcomes
    Brief {
        /// The brief text
        text: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "full")]
        output: OutputFormat,
    },
}
