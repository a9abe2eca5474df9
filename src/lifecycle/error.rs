//! Lifecycle-specific error types

use super::{Phase, State};
use thiserror::Error;

/// Errors that can occur during lifecycle operations
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// A hook returned an error
    #[error("{phase} hook #{index} failed: {source}")]
    HookFailed {
        /// Phase the hook was registered for
        phase: Phase,
        /// Position of the hook within its phase
        index: usize,
        /// Error returned by the hook
        #[source]
        source: anyhow::Error,
    },

    /// The requested operation is not allowed in the current state
    #[error("cannot move from {from} to {to}")]
    InvalidState {
        /// State the service was in
        from: State,
        /// State the operation would have entered
        to: State,
    },
}

impl LifecycleError {
    /// Create a hook failure error
    pub fn hook_failed(phase: Phase, index: usize, source: anyhow::Error) -> Self {
        Self::HookFailed {
            phase,
            index,
            source,
        }
    }

    /// Create an invalid transition error
    pub fn invalid_state(from: State, to: State) -> Self {
        Self::InvalidState { from, to }
    }

    /// The phase of the failing hook, if this is a hook failure
    pub fn phase(&self) -> Option<Phase> {
        match self {
            Self::HookFailed { phase, .. } => Some(*phase),
            Self::InvalidState { .. } => None,
        }
    }
}

/// A specialized Result type for lifecycle operations
pub type Result<T> = std::result::Result<T, LifecycleError>;
