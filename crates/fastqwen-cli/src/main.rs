//! CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use fastqwen_cli::{Cli, CliError, Commands, handlers};

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before parsing so env-backed flags see it.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Commands::Serve(args) => handlers::serve::execute(args).await,
        Commands::Fetch(args) => handlers::fetch::execute(args).await,
        Commands::Bench(args) => handlers::bench::execute(args).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let cli_err = CliError::from_anyhow(&err);
            tracing::error!(error = %format!("{err:#}"), "Command failed");
            eprintln!("Error: {cli_err}");
            ExitCode::from(u8::try_from(cli_err.exit_code()).unwrap_or(1))
        }
    }
}
