#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod fetch;
mod health;
pub mod llama;
pub mod process;
pub mod system;

pub use fetch::HfModelFetcher;
pub use health::check_http_health;
pub use llama::{LlamaServerConfig, LlamaServerEngine, LlamaServerLoader};
pub use system::available_threads;

#[cfg(test)]
use tokio_test as _;
