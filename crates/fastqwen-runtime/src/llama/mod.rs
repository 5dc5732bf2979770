//! llama.cpp's `llama-server` as the native engine.

mod engine;
mod invocation;
mod loader;

pub use engine::LlamaServerEngine;
pub use invocation::{ENGINE_HOST, LlamaServerCommand};
pub use loader::{LLAMA_SERVER_BINARY, LlamaServerConfig, LlamaServerLoader};
