pub mod api;
pub mod config;
pub mod core;
pub mod error;
pub mod input;
pub mod surface;

// Re-export key types at crate root for convenience
pub use api::game::{EngineContext, Game};
pub use api::types::{GameEvent, OrientationEvent, PendingEvent, TouchAction, TouchEvent};
pub use config::EngineConfig;
pub use crate::core::engine::Engine;
pub use crate::core::lifecycle::{next_state, EngineState, LifecycleOp};
pub use crate::core::time::SimClock;
pub use error::{EngineError, Operation, ViolationPolicy};
pub use input::queue::EventQueue;
pub use surface::binding::{DeviceOrientation, RenderSurface, SurfaceDescriptor};
pub use surface::orientation::{OrientationMask, ScreenOrientation};
