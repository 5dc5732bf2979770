//! Readiness cell and the slot the engine handle is installed into.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU8, Ordering};

use tracing::debug;

use super::engine_handle::EngineHandle;
use crate::domain::ReadinessState;
use crate::ports::CoreError;

/// Atomic, forward-only [`ReadinessState`].
#[derive(Debug)]
pub struct Readiness {
    state: AtomicU8,
}

impl Default for Readiness {
    fn default() -> Self {
        Self::new()
    }
}

impl Readiness {
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(ReadinessState::Uninitialized.as_u8()),
        }
    }

    pub fn get(&self) -> ReadinessState {
        ReadinessState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Move to `next` if that is a legal step from the current state.
    pub fn advance(&self, next: ReadinessState) -> Result<ReadinessState, CoreError> {
        let mut current = self.get();
        loop {
            if !current.can_transition_to(next) {
                return Err(CoreError::InvalidTransition {
                    from: current,
                    to: next,
                });
            }
            match self.state.compare_exchange(
                current.as_u8(),
                next.as_u8(),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    debug!(target: "fastqwen.startup", from = %current, to = %next, "Readiness changed");
                    return Ok(current);
                }
                Err(actual) => current = ReadinessState::from_u8(actual),
            }
        }
    }
}

/// Readiness plus the engine handle, shared between startup and the gateway.
#[derive(Debug)]
pub struct EngineSlot {
    model_id: String,
    readiness: Readiness,
    handle: OnceLock<EngineHandle>,
}

impl EngineSlot {
    /// An empty slot in `Uninitialized`.
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            readiness: Readiness::new(),
            handle: OnceLock::new(),
        }
    }

    /// A slot that is already `Ready` with `handle` installed.
    pub fn ready(model_id: impl Into<String>, handle: EngineHandle) -> Self {
        let slot = Self::new(model_id);
        let _ = slot.handle.set(handle);
        slot.readiness
            .state
            .store(ReadinessState::Ready.as_u8(), Ordering::Release);
        slot
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Non-blocking probe.
    pub fn state(&self) -> ReadinessState {
        self.readiness.get()
    }

    pub fn is_ready(&self) -> bool {
        self.state().is_ready()
    }

    /// The engine handle, or `NotReady` with the current state.
    pub fn ready_handle(&self) -> Result<&EngineHandle, CoreError> {
        let state = self.state();
        if !state.is_ready() {
            return Err(CoreError::NotReady(state));
        }
        self.handle.get().ok_or(CoreError::NotReady(state))
    }

    pub(crate) fn begin_loading(&self) -> Result<(), CoreError> {
        self.readiness
            .advance(ReadinessState::Loading)
            .map(|_| ())
            .map_err(|_| CoreError::AlreadyStarted(self.state()))
    }

    pub(crate) fn install(&self, handle: EngineHandle) -> Result<(), CoreError> {
        if self.handle.set(handle).is_err() {
            return Err(CoreError::AlreadyStarted(self.state()));
        }
        self.readiness.advance(ReadinessState::Ready).map(|_| ())
    }

    pub(crate) fn fail(&self) {
        let _ = self.readiness.advance(ReadinessState::Failed);
    }

    /// Release the engine if one was installed.
    ///
    /// Waits for an in-flight inference to finish. Safe to call repeatedly;
    /// only the first call tears anything down.
    pub async fn release(&self) -> bool {
        match self.handle.get() {
            Some(handle) => handle.release().await,
            None => false,
        }
    }
}
