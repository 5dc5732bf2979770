#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

mod client;
mod report;

pub use client::{
    BENCH_SYSTEM_PROMPT, BENCH_USER_PROMPT, BenchClient, BenchError, DEFAULT_BASE_URL,
    DEFAULT_MAX_TOKENS, DEFAULT_POLL_INTERVAL, benchmark_request,
};
pub use report::{BenchOutcome, BenchmarkReport};

#[cfg(test)]
use async_trait as _;
#[cfg(test)]
use fastqwen_axum as _;
#[cfg(test)]
use tempfile as _;
