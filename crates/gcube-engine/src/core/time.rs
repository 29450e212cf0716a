use crate::error::{EngineError, Operation};

/// Simulation clock advanced once per `step`.
/// Tracks total simulated time so games do not need to accumulate it themselves.
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    /// Total simulated seconds since init.
    elapsed: f64,
    /// Number of ticks run since init.
    frame: u64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one tick of `dt` seconds. Returns the frame number just completed.
    pub fn advance(&mut self, dt: f32) -> u64 {
        self.elapsed += f64::from(dt);
        self.frame += 1;
        self.frame
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}

/// Reject deltas that cannot advance a simulation: negative, NaN or infinite.
pub fn validate_dt(dt: f32) -> Result<f32, EngineError> {
    if !dt.is_finite() {
        return Err(EngineError::invalid_argument(
            Operation::Step,
            format!("dt must be finite, got {dt}"),
        ));
    }
    if dt < 0.0 {
        return Err(EngineError::invalid_argument(
            Operation::Step,
            format!("dt must be >= 0, got {dt}"),
        ));
    }
    Ok(dt)
}

/// Cap a frame delta when the game opted into a maximum.
/// Without a cap the delta is applied as given.
pub fn clamp_dt(dt: f32, max_dt: Option<f32>) -> f32 {
    match max_dt {
        Some(max_dt) if dt > max_dt => {
            log::debug!("clamping step dt {dt} to {max_dt}");
            max_dt
        }
        _ => dt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_accumulates() {
        let mut clock = SimClock::new();
        clock.advance(0.5);
        let frame = clock.advance(0.25);
        assert_eq!(frame, 2);
        assert_eq!(clock.frame(), 2);
        assert!((clock.elapsed() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn zero_dt_is_valid() {
        assert_eq!(validate_dt(0.0), Ok(0.0));
    }

    #[test]
    fn negative_and_nan_rejected() {
        assert!(validate_dt(-0.001).unwrap_err().is_invalid_argument());
        assert!(validate_dt(f32::NAN).unwrap_err().is_invalid_argument());
        assert!(validate_dt(f32::INFINITY).is_err());
    }

    #[test]
    fn clamp_only_with_a_cap() {
        assert_eq!(clamp_dt(1.0, Some(0.25)), 0.25);
        assert_eq!(clamp_dt(0.016, Some(0.25)), 0.016);
        assert_eq!(clamp_dt(5.0, None), 5.0);
    }
}
