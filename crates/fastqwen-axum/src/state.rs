//! Shared application state type.

use crate::bootstrap::GatewayContext;
use std::sync::Arc;

/// State handed to every handler.
pub type AppState = Arc<GatewayContext>;
