//! Child process plumbing for the engine.
//!
//! - `ports`: find a free loopback port for the engine's listener
//! - `logs`: forward child stdout/stderr into `tracing`
//! - `shutdown`: SIGTERM, grace period, SIGKILL, reap

mod logs;
mod ports;
mod shutdown;

pub use logs::forward_child_output;
pub use ports::{PORT_SEARCH_SPAN, PortAllocationError, allocate_port, is_port_available};
pub use shutdown::{SHUTDOWN_GRACE, shutdown_child};
