//! Command handlers.
//!
//! Each handler turns its arguments into settings, calls into the library
//! crates, and formats terminal output. Failures come back as `anyhow`
//! errors and are mapped to exit codes by `CliError::from_anyhow`.

pub mod bench;
pub mod fetch;
pub mod serve;
