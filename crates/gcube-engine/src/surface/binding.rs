use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::error::{EngineError, Operation};

/// Physical device orientation reported alongside surface size changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum DeviceOrientation {
    #[default]
    Unknown = 0,
    /// Vertical, home button at the bottom.
    Portrait = 1,
    /// Vertical, home button at the top.
    PortraitUpsideDown = 2,
    /// Horizontal, home button on the right.
    LandscapeLeft = 3,
    /// Horizontal, home button on the left.
    LandscapeRight = 4,
    FaceUp = 5,
    FaceDown = 6,
}

impl DeviceOrientation {
    pub fn is_landscape(self) -> bool {
        matches!(self, DeviceOrientation::LandscapeLeft | DeviceOrientation::LandscapeRight)
    }
}

impl TryFrom<i32> for DeviceOrientation {
    type Error = EngineError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Ok(match code {
            0 => DeviceOrientation::Unknown,
            1 => DeviceOrientation::Portrait,
            2 => DeviceOrientation::PortraitUpsideDown,
            3 => DeviceOrientation::LandscapeLeft,
            4 => DeviceOrientation::LandscapeRight,
            5 => DeviceOrientation::FaceUp,
            6 => DeviceOrientation::FaceDown,
            other => {
                return Err(EngineError::invalid_argument(
                    Operation::SizeChanged,
                    format!("unknown device orientation {other}"),
                ))
            }
        })
    }
}

/// Render surface geometry. Replaced wholesale on every size change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurfaceDescriptor {
    pub width: u32,
    pub height: u32,
    pub orientation: DeviceOrientation,
}

impl SurfaceDescriptor {
    /// Validate raw platform values.
    pub fn from_raw(width: i32, height: i32, orientation: i32) -> Result<Self, EngineError> {
        let width = u32::try_from(width).map_err(|_| {
            EngineError::invalid_argument(Operation::SizeChanged, format!("negative width {width}"))
        })?;
        let height = u32::try_from(height).map_err(|_| {
            EngineError::invalid_argument(Operation::SizeChanged, format!("negative height {height}"))
        })?;
        Ok(Self {
            width,
            height,
            orientation: DeviceOrientation::try_from(orientation)?,
        })
    }

    /// Width over height, or 0.0 for a zero-height surface.
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            0.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

/// Tracks surface geometry and graphics context validity.
///
/// Written from the platform's graphics callback thread, read by the stepping
/// thread. Nothing here touches the GPU: changes are staged and the stepper
/// applies them at the start of its next frame.
#[derive(Debug, Default)]
pub struct RenderSurface {
    pending: Mutex<Option<SurfaceDescriptor>>,
    generation: AtomicU64,
}

impl RenderSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the staged descriptor. Only the latest one survives until the next step.
    pub fn stage(&self, desc: SurfaceDescriptor) {
        *self.pending.lock().unwrap_or_else(PoisonError::into_inner) = Some(desc);
    }

    /// Take the staged descriptor, if any.
    pub fn take_pending(&self) -> Option<SurfaceDescriptor> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner).take()
    }

    /// Mark every GPU-side resource as stale. Returns the new generation.
    pub fn invalidate_context(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Monotonic counter bumped on every context loss.
    pub fn context_generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub(crate) fn reset(&self) {
        self.take_pending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_validates() {
        let d = SurfaceDescriptor::from_raw(1080, 1920, 1).unwrap();
        assert_eq!(d.width, 1080);
        assert_eq!(d.orientation, DeviceOrientation::Portrait);
        assert!(SurfaceDescriptor::from_raw(-1, 10, 0).unwrap_err().is_invalid_argument());
        assert!(SurfaceDescriptor::from_raw(10, -1, 0).is_err());
        assert!(SurfaceDescriptor::from_raw(10, 10, 7).is_err());
    }

    #[test]
    fn aspect_ratio_handles_zero_height() {
        assert_eq!(SurfaceDescriptor::default().aspect_ratio(), 0.0);
        let d = SurfaceDescriptor { width: 200, height: 100, orientation: DeviceOrientation::LandscapeLeft };
        assert_eq!(d.aspect_ratio(), 2.0);
        assert!(d.orientation.is_landscape());
    }

    #[test]
    fn latest_staged_descriptor_wins() {
        let s = RenderSurface::new();
        s.stage(SurfaceDescriptor { width: 1, height: 1, orientation: DeviceOrientation::Portrait });
        s.stage(SurfaceDescriptor { width: 2, height: 3, orientation: DeviceOrientation::LandscapeRight });
        let taken = s.take_pending().unwrap();
        assert_eq!((taken.width, taken.height), (2, 3));
        assert!(s.take_pending().is_none());
    }

    #[test]
    fn generation_is_monotonic() {
        let s = RenderSurface::new();
        assert_eq!(s.context_generation(), 0);
        assert_eq!(s.invalidate_context(), 1);
        assert_eq!(s.invalidate_context(), 2);
        assert_eq!(s.context_generation(), 2);
    }
}
