//! `fastqwen bench`.

use std::time::Duration;

use anyhow::Result;

use fastqwen_bench::{BenchClient, BenchOutcome};

use crate::commands::BenchArgs;
use crate::error::CliError;

/// Wait for readiness, run one timed request, print the report.
pub async fn execute(args: &BenchArgs) -> Result<()> {
    let client = BenchClient::new(args.url.as_str())
        .map_err(|e| CliError::Arguments(e.to_string()))?
        .with_max_tokens(args.max_tokens);

    println!("Waiting for {} to become ready...", client.base_url());
    if !client.wait_for_ready(Duration::from_secs(args.timeout)).await {
        return Err(CliError::NotReady(format!(
            "{} did not answer /health with 200 within {}s",
            client.base_url(),
            args.timeout
        ))
        .into());
    }
    println!("Gateway is up. Sending benchmark request...");

    match client.run_single_benchmark().await {
        BenchOutcome::Completed(report) => {
            println!("{}", report.render());
            Ok(())
        }
        BenchOutcome::Failed(reason) => Err(CliError::Bench(reason).into()),
    }
}
