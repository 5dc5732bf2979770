//! Subcommands and their arguments.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use fastqwen_bench::{DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS};
use fastqwen_core::{
    DEFAULT_BATCH_SIZE, DEFAULT_CONTEXT_SIZE, DEFAULT_ENGINE_BASE_PORT, DEFAULT_HOST,
    DEFAULT_MODEL_FILENAME, DEFAULT_MODEL_REPO_ID, DEFAULT_PORT, DEFAULT_STARTUP_TIMEOUT,
};

/// Seconds `bench` waits for the gateway to report ready.
pub const DEFAULT_BENCH_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the OpenAI-compatible gateway (fetches the model if missing)
    Serve(ServeArgs),

    /// Download the model artifact if it is missing and print its path
    Fetch(ModelArgs),

    /// Wait for a running gateway, then time one chat completion
    Bench(BenchArgs),
}

/// Which artifact to use and where it lives.
#[derive(Debug, Clone, Args)]
pub struct ModelArgs {
    /// Hugging Face repository holding the GGUF file
    #[arg(long = "repo-id", env = "MODEL_REPO_ID", default_value = DEFAULT_MODEL_REPO_ID)]
    pub repo_id: String,

    /// GGUF file name inside the repository
    #[arg(long, env = "MODEL_FILENAME", default_value = DEFAULT_MODEL_FILENAME)]
    pub filename: String,

    /// Models directory (falls back to MODEL_DIR, then ./models)
    #[arg(long = "models-dir")]
    pub models_dir: Option<String>,

    /// Hugging Face token for gated or private repositories
    #[arg(long = "hf-token", env = "HF_TOKEN", hide_env_values = true)]
    pub hf_token: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Interface to listen on
    #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Context window in tokens
    #[arg(long = "ctx-size", env = "CONTEXT_SIZE", default_value_t = DEFAULT_CONTEXT_SIZE)]
    pub ctx_size: u32,

    /// Inference threads (defaults to the available CPUs)
    #[arg(long, env = "N_THREADS")]
    pub threads: Option<usize>,

    /// Prompt batch size
    #[arg(long = "batch-size", env = "N_BATCH", default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: u32,

    /// Path to the llama-server binary (defaults to a PATH lookup)
    #[arg(long = "llama-server", env = "LLAMA_SERVER_PATH")]
    pub llama_server: Option<PathBuf>,

    /// First port tried for the engine's private listener
    #[arg(long = "engine-base-port", env = "ENGINE_BASE_PORT", default_value_t = DEFAULT_ENGINE_BASE_PORT)]
    pub engine_base_port: u16,

    /// Seconds to wait for the engine to load the model
    #[arg(
        long = "startup-timeout",
        env = "ENGINE_STARTUP_TIMEOUT",
        default_value_t = DEFAULT_STARTUP_TIMEOUT.as_secs()
    )]
    pub startup_timeout: u64,

    /// Allowed CORS origin (repeatable; omit to allow any origin)
    #[arg(long = "cors-origin", env = "CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Args)]
pub struct BenchArgs {
    /// Base URL of the gateway
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub url: String,

    /// Seconds to wait for the gateway to become ready
    #[arg(long, default_value_t = DEFAULT_BENCH_TIMEOUT_SECS)]
    pub timeout: u64,

    /// `max_tokens` for the benchmark request
    #[arg(long = "max-tokens", default_value_t = DEFAULT_MAX_TOKENS)]
    pub max_tokens: u32,
}
