//! Process-wide readiness state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of the engine as seen by the rest of the process.
///
/// Transitions are monotonic: `Uninitialized -> Loading -> {Ready | Failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ReadinessState {
    Uninitialized = 0,
    Loading = 1,
    Ready = 2,
    Failed = 3,
}

impl ReadinessState {
    /// Whether `self -> next` is a legal forward transition.
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Uninitialized, Self::Loading)
                | (Self::Loading, Self::Ready | Self::Failed)
        )
    }

    /// `Ready` and `Failed` never change again.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Ready | Self::Failed)
    }

    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }

    pub(crate) const fn as_u8(self) -> u8 {
        self as u8
    }

    pub(crate) const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Uninitialized,
            1 => Self::Loading,
            2 => Self::Ready,
            _ => Self::Failed,
        }
    }
}

impl fmt::Display for ReadinessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ReadinessState; 4] = [
        ReadinessState::Uninitialized,
        ReadinessState::Loading,
        ReadinessState::Ready,
        ReadinessState::Failed,
    ];

    #[test]
    fn test_forward_transitions() {
        use ReadinessState::*;
        assert!(Uninitialized.can_transition_to(Loading));
        assert!(Loading.can_transition_to(Ready));
        assert!(Loading.can_transition_to(Failed));
    }

    #[test]
    fn test_terminal_states_never_move() {
        for from in [ReadinessState::Ready, ReadinessState::Failed] {
            assert!(from.is_terminal());
            for to in ALL {
                assert!(!from.can_transition_to(to), "{from} -> {to}");
            }
        }
    }

    #[test]
    fn test_no_skipping_loading() {
        assert!(!ReadinessState::Uninitialized.can_transition_to(ReadinessState::Ready));
        assert!(!ReadinessState::Uninitialized.can_transition_to(ReadinessState::Failed));
    }

    #[test]
    fn test_u8_encoding() {
        for state in ALL {
            assert_eq!(ReadinessState::from_u8(state.as_u8()), state);
        }
    }
}
