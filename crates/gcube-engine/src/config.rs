use serde::{Deserialize, Serialize};

use crate::error::{EngineError, ViolationPolicy};
use crate::surface::orientation::OrientationMask;

/// Configuration for the engine, provided by the game.
/// Can also be loaded from a JSON file shipped with the app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Frames per second the platform should drive `step` at (default: 60).
    pub frame_rate: u32,
    /// Whether the platform should subscribe to the orientation sensor.
    pub use_orientation_sensor: bool,
    /// Orientations the game can be displayed in (default: portrait).
    pub supported_orientations: OrientationMask,
    /// Maximum number of events waiting for the next step (default: 256).
    pub max_pending_events: usize,
    /// Largest delta a single step may apply, in seconds.
    /// `None` (the default) applies every delta as given.
    pub max_step_dt: Option<f32>,
    /// Reaction to illegal calls at the platform boundary.
    /// `None` picks the build default (panic in debug, log in release).
    pub violation_policy: Option<ViolationPolicy>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60,
            use_orientation_sensor: false,
            supported_orientations: OrientationMask::default(),
            max_pending_events: 256,
            max_step_dt: None,
            violation_policy: None,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a config from a JSON string. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.frame_rate == 0 {
            return Err(EngineError::Config("frame_rate must be positive".into()));
        }
        if self.max_pending_events == 0 {
            return Err(EngineError::Config("max_pending_events must be positive".into()));
        }
        if let Some(max) = self.max_step_dt {
            if !(max.is_finite() && max > 0.0) {
                return Err(EngineError::Config(format!(
                    "max_step_dt must be a positive number, got {max}"
                )));
            }
        }
        if self.supported_orientations.is_empty() {
            return Err(EngineError::Config("supported_orientations must not be empty".into()));
        }
        Ok(())
    }

    /// The effective policy for this build.
    pub fn policy(&self) -> ViolationPolicy {
        self.violation_policy.unwrap_or_default()
    }
}
