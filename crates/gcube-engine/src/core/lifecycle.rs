use std::fmt;

use crate::error::{EngineError, Operation};

/// The engine's coarse run status.
///
/// ```text
/// Uninitialized -> Initialized -> Running <-> Paused
///        \______________\____________\________\____-> Terminated
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EngineState {
    Uninitialized = 0,
    Initialized = 1,
    Running = 2,
    Paused = 3,
    Terminated = 4,
}

impl EngineState {
    /// True between `onInit` and `onTerminate`.
    pub fn is_live(self) -> bool {
        matches!(
            self,
            EngineState::Initialized | EngineState::Running | EngineState::Paused
        )
    }

    pub(crate) fn as_u8(self) -> u8 {
        self as u8
    }

    pub(crate) fn from_u8(raw: u8) -> Self {
        match raw {
            0 => EngineState::Uninitialized,
            1 => EngineState::Initialized,
            2 => EngineState::Running,
            3 => EngineState::Paused,
            _ => EngineState::Terminated,
        }
    }
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EngineState::Uninitialized => "uninitialized",
            EngineState::Initialized => "initialized",
            EngineState::Running => "running",
            EngineState::Paused => "paused",
            EngineState::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// Calls that move the engine between lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleOp {
    Init,
    Resume,
    Pause,
    Terminate,
}

impl LifecycleOp {
    pub fn operation(self) -> Operation {
        match self {
            LifecycleOp::Init => Operation::Init,
            LifecycleOp::Resume => Operation::Resume,
            LifecycleOp::Pause => Operation::Pause,
            LifecycleOp::Terminate => Operation::Terminate,
        }
    }
}

/// The transition table. Pure: the engine folds every lifecycle call through it.
///
/// `Terminate` on an already terminated engine is accepted and changes nothing.
pub fn next_state(state: EngineState, op: LifecycleOp) -> Result<EngineState, EngineError> {
    use EngineState::*;

    let next = match (state, op) {
        (Uninitialized, LifecycleOp::Init) => Initialized,
        (Initialized | Paused, LifecycleOp::Resume) => Running,
        (Running, LifecycleOp::Pause) => Paused,
        (_, LifecycleOp::Terminate) => Terminated,
        _ => {
            return Err(EngineError::InvalidState {
                op: op.operation(),
                state,
            })
        }
    };
    Ok(next)
}

/// Fail with `InvalidState` unless `state` is one of `allowed`.
pub(crate) fn require(
    op: Operation,
    state: EngineState,
    allowed: &[EngineState],
) -> Result<(), EngineError> {
    if allowed.contains(&state) {
        Ok(())
    } else {
        Err(EngineError::InvalidState { op, state })
    }
}

/// Fail with `InvalidState` unless the engine is between init and terminate.
pub(crate) fn require_live(op: Operation, state: EngineState) -> Result<(), EngineError> {
    if state.is_live() {
        Ok(())
    } else {
        Err(EngineError::InvalidState { op, state })
    }
}
