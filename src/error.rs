//! Engine errors and the success/failure status boundary.

use crate::core::{IndexError, MAX_STATES};
use crate::engine::Mode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by engine operations.
///
/// Every error is local to the failing call: validation happens before any
/// table or bitset is touched, so a rejected call leaves the machine exactly
/// as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsmError {
    #[error("invalid state count {state_count}: must be between 1 and {MAX_STATES}")]
    InvalidStateCount { state_count: usize },

    #[error("state {state} is out of range for {state_count} states")]
    StateOutOfRange { state: usize, state_count: usize },

    #[error("transition {from} -> {to} is out of range for {state_count} states")]
    TransitionOutOfRange {
        from: usize,
        to: usize,
        state_count: usize,
    },

    #[error("self transition on state {state} is not representable")]
    SelfTransition { state: usize },

    #[error("permission set built for {built_for} states cannot seed {state_count} states")]
    PermissionStateCount { built_for: usize, state_count: usize },

    #[error("state machine is not initialized")]
    NotInitialized,

    #[error("state machine is not running (mode: {mode})")]
    NotRunning { mode: Mode },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<IndexError> for FsmError {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::InvalidStateCount { state_count } => Self::InvalidStateCount { state_count },
            IndexError::StateOutOfRange { state, state_count } => {
                Self::StateOutOfRange { state, state_count }
            }
            IndexError::TransitionOutOfRange {
                from,
                to,
                state_count,
            } => Self::TransitionOutOfRange {
                from,
                to,
                state_count,
            },
            IndexError::SelfTransition { state } => Self::SelfTransition { state },
            IndexError::PermissionStateCount {
                built_for,
                state_count,
            } => Self::PermissionStateCount {
                built_for,
                state_count,
            },
        }
    }
}

/// Two-valued outcome of a call, for callers that only need pass/fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Success,
    Failure,
}

impl Status {
    pub const SUCCESS_CODE: u8 = 0x00;
    pub const FAILURE_CODE: u8 = 0xFE;

    /// Numeric status code.
    pub fn code(self) -> u8 {
        match self {
            Self::Success => Self::SUCCESS_CODE,
            Self::Failure => Self::FAILURE_CODE,
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Collapse an engine result into a [`Status`].
///
/// # Example
///
/// ```rust
/// use bitfsm::{Fsm, Status, StatusExt};
///
/// let mut fsm = Fsm::create(3, None).unwrap();
/// assert_eq!(fsm.set_permission(0, 1, true).status(), Status::Success);
/// assert_eq!(fsm.set_permission(5, 6, true).status().code(), 0xFE);
/// ```
pub trait StatusExt {
    fn status(&self) -> Status;
}

impl<T> StatusExt for Result<T, FsmError> {
    fn status(&self) -> Status {
        match self {
            Ok(_) => Status::Success,
            Err(_) => Status::Failure,
        }
    }
}
