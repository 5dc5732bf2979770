//! Model artifact acquisition.

mod hf;

pub use hf::HfModelFetcher;
