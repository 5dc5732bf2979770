//! Engine lifecycle and request translation.
//!
//! - `engine_handle`: exclusive, serialized access to the loaded engine
//! - `slot`: readiness cell plus the installed handle
//! - `lifecycle`: startup ordering (fetch, load, ready)
//! - `translator`: OpenAI types to engine-native types and back

mod engine_handle;
mod lifecycle;
mod slot;
mod translator;

pub use engine_handle::EngineHandle;
pub use lifecycle::{ReadinessController, StartupPlan};
pub use slot::{EngineSlot, Readiness};
pub use translator::{from_native_response, to_native_request};
