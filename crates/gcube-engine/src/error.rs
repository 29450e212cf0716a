use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::lifecycle::EngineState;

/// Every entry point the platform can drive.
/// Carried by errors so a rejected call can be traced back to its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Init,
    Resume,
    Pause,
    Terminate,
    ContextChanged,
    SizeChanged,
    Step,
    Touch,
    Orientation,
    GameEvent,
    BackKey,
    LowMemory,
}

impl Operation {
    /// The name the platform side uses for this call.
    pub fn name(self) -> &'static str {
        match self {
            Operation::Init => "onInit",
            Operation::Resume => "onResume",
            Operation::Pause => "onPause",
            Operation::Terminate => "onTerminate",
            Operation::ContextChanged => "onContextChanged",
            Operation::SizeChanged => "onSizeChanged",
            Operation::Step => "step",
            Operation::Touch => "onTouchEvent",
            Operation::Orientation => "onOrientationChanged",
            Operation::GameEvent => "sendGameEvent",
            Operation::BackKey => "onPressBackKey",
            Operation::LowMemory => "onLowMemory",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors returned by the in-process engine API.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// The operation is not legal in the engine's current lifecycle state.
    InvalidState { op: Operation, state: EngineState },
    /// An argument was out of range (negative dt, unknown enum code, ...).
    InvalidArgument { op: Operation, reason: String },
    /// The engine configuration could not be parsed or failed validation.
    Config(String),
}

impl EngineError {
    pub(crate) fn invalid_argument(op: Operation, reason: impl Into<String>) -> Self {
        EngineError::InvalidArgument { op, reason: reason.into() }
    }

    pub fn is_invalid_state(&self) -> bool {
        matches!(self, EngineError::InvalidState { .. })
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, EngineError::InvalidArgument { .. })
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidState { op, state } => {
                write!(f, "{op} is not valid while the engine is {state}")
            }
            EngineError::InvalidArgument { op, reason } => {
                write!(f, "invalid argument to {op}: {reason}")
            }
            EngineError::Config(msg) => write!(f, "invalid engine config: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Config(err.to_string())
    }
}

/// How the platform boundary reacts when the engine rejects a call.
///
/// The in-process API always returns `Result`. Exceptions cannot cross the
/// native call, so the bridge either aborts loudly (development builds) or
/// logs and drops the call (release builds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationPolicy {
    /// Panic with the error message. Panics cannot unwind out of an
    /// `extern "system"` function, so this aborts the process.
    Panic,
    /// Log at `warn` and treat the call as a no-op.
    Log,
}

impl ViolationPolicy {
    /// Resolve a call result according to the policy.
    /// Returns `None` when the call was rejected and the policy allows carrying on.
    pub fn apply<T>(self, result: Result<T, EngineError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => match self {
                ViolationPolicy::Panic => panic!("{err}"),
                ViolationPolicy::Log => {
                    log::warn!("dropping call: {err}");
                    None
                }
            },
        }
    }
}

impl Default for ViolationPolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            ViolationPolicy::Panic
        } else {
            ViolationPolicy::Log
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_platform_call() {
        let err = EngineError::InvalidState {
            op: Operation::Resume,
            state: EngineState::Terminated,
        };
        assert_eq!(err.to_string(), "onResume is not valid while the engine is terminated");
        assert!(err.is_invalid_state());
    }

    #[test]
    fn log_policy_swallows_errors() {
        let result: Result<u32, _> = Err(EngineError::invalid_argument(Operation::Step, "dt < 0"));
        assert_eq!(ViolationPolicy::Log.apply(result), None);
        assert_eq!(ViolationPolicy::Log.apply(Ok::<_, EngineError>(7)), Some(7));
    }

    #[test]
    #[should_panic(expected = "invalid argument to step")]
    fn panic_policy_is_loud() {
        let result: Result<(), _> = Err(EngineError::invalid_argument(Operation::Step, "dt < 0"));
        ViolationPolicy::Panic.apply(result);
    }

    #[test]
    fn default_policy_follows_build_profile() {
        let expected = if cfg!(debug_assertions) {
            ViolationPolicy::Panic
        } else {
            ViolationPolicy::Log
        };
        assert_eq!(ViolationPolicy::default(), expected);
    }
}
