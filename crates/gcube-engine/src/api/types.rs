use glam::{Vec2, Vec3};

use crate::error::{EngineError, Operation};

/// Touch phases as delivered by the platform (`MotionEvent` action codes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum TouchAction {
    Down = 0,
    Up = 1,
    Move = 2,
    Cancel = 3,
}

impl TryFrom<i32> for TouchAction {
    type Error = EngineError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(TouchAction::Down),
            1 => Ok(TouchAction::Up),
            2 => Ok(TouchAction::Move),
            3 => Ok(TouchAction::Cancel),
            other => Err(EngineError::invalid_argument(
                Operation::Touch,
                format!("unknown touch action {other}"),
            )),
        }
    }
}

/// A single touch sample in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchEvent {
    pub action: TouchAction,
    pub pos: Vec2,
    /// Platform uptime in milliseconds. Used for gesture timing only;
    /// delivery order is arrival order.
    pub time_ms: i64,
}

/// Device attitude from the orientation sensor, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationEvent {
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
}

impl OrientationEvent {
    /// (yaw, pitch, roll) in degrees.
    pub fn degrees(&self) -> Vec3 {
        Vec3::new(self.yaw, self.pitch, self.roll) * (180.0 / std::f32::consts::PI)
    }
}

/// A generic event posted by the platform UI layer (buttons, dialogs, IAP results).
/// `kind` identifies the event; the game decides what the parameters mean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEvent {
    pub kind: i32,
    pub params: [i32; 4],
    pub text: String,
}

/// Everything that can wait in the event queue between arrival and the next step.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingEvent {
    Touch(TouchEvent),
    Orientation(OrientationEvent),
    Game(GameEvent),
}

impl PendingEvent {
    pub fn operation(&self) -> Operation {
        match self {
            PendingEvent::Touch(_) => Operation::Touch,
            PendingEvent::Orientation(_) => Operation::Orientation,
            PendingEvent::Game(_) => Operation::GameEvent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_action_codes() {
        assert_eq!(TouchAction::try_from(0), Ok(TouchAction::Down));
        assert_eq!(TouchAction::try_from(3), Ok(TouchAction::Cancel));
        assert!(TouchAction::try_from(4).unwrap_err().is_invalid_argument());
        assert!(TouchAction::try_from(-1).is_err());
    }

    #[test]
    fn orientation_in_degrees() {
        let e = OrientationEvent { yaw: std::f32::consts::PI, pitch: 0.0, roll: -std::f32::consts::FRAC_PI_2 };
        let d = e.degrees();
        assert!((d.x - 180.0).abs() < 1e-4);
        assert_eq!(d.y, 0.0);
        assert!((d.z + 90.0).abs() < 1e-4);
    }
}
