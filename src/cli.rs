//! CLI argument definitions.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

/// Top-level CLI parser for `svi`.
#[derive(Debug, Parser)]
#[command(name = "svi", version, about = "Generate code from .svi task files")]
pub struct Cli {
    /// Log more (`-v` debug, `-vv` trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate code for every stale task file in the project.
    Run(RunArgs),
    /// Create `svi.json`, or a new task file when FILE is given.
    Init {
        /// Name of the task file to create (`.svi` is appended).
        file: Option<String>,
        /// Programming language recorded in the new file.
        #[arg(short, long)]
        lang: Option<String>,
    },
}

/// Arguments of `svi run`.
#[derive(Debug, Default, Args)]
pub struct RunArgs {
    /// Model name; `claude*` uses Anthropic, `gpt*` uses OpenAI.
    #[arg(short, long)]
    pub model: Option<String>,

    /// API key for the model provider (defaults to the provider's env var).
    #[arg(short = 'k', long = "key")]
    pub api_key: Option<String>,

    /// Path to a `.env` file to load before starting.
    #[arg(short, long = "env")]
    pub env_file: Option<PathBuf>,
}
