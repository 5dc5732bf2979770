//! Root CLI structure and global options.

use clap::Parser;

use crate::commands::Commands;

/// Serve a local Qwen GGUF model behind an OpenAI-compatible API.
#[derive(Debug, Parser)]
#[command(name = "fastqwen")]
#[command(about = "Serve a local Qwen model behind an OpenAI-compatible API")]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}
