//! Loopback port allocation for the engine listener.

use std::net::TcpListener;

use thiserror::Error;
use tracing::debug;

/// How many consecutive ports are tried from the base port.
pub const PORT_SEARCH_SPAN: u16 = 100;

#[derive(Debug, Error)]
#[error("No free port in {first}-{last}")]
pub struct PortAllocationError {
    pub first: u16,
    pub last: u16,
}

/// Whether `127.0.0.1:port` can be bound right now.
pub fn is_port_available(port: u16) -> bool {
    TcpListener::bind(("127.0.0.1", port))
        .and_then(|listener| listener.local_addr())
        .is_ok()
}

/// First bindable port in `base_port..base_port + PORT_SEARCH_SPAN`, skipping `reserved`.
///
/// The port is released again before returning, so a racing process could
/// still take it; the engine's health check catches that case.
pub fn allocate_port(base_port: u16, reserved: &[u16]) -> Result<u16, PortAllocationError> {
    let last = base_port.saturating_add(PORT_SEARCH_SPAN - 1);
    for port in base_port..=last {
        if port == 0 || reserved.contains(&port) {
            continue;
        }
        if is_port_available(port) {
            debug!(port, "Allocated engine port");
            return Ok(port);
        }
        debug!(port, "Port busy, skipping");
    }
    Err(PortAllocationError {
        first: base_port,
        last,
    })
}
