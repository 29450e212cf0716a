use crate::api::types::PendingEvent;
use crate::config::EngineConfig;
use crate::core::time::SimClock;
use crate::surface::binding::SurfaceDescriptor;

/// The core contract every game must fulfill.
///
/// All hooks run on whichever thread holds the engine's world lock: lifecycle
/// hooks on the platform's UI thread, everything else on the stepping thread.
/// Hooks must return promptly.
pub trait Game: Send {
    /// Return engine configuration. Called once when the engine handle is built.
    fn config(&self) -> EngineConfig {
        EngineConfig::default()
    }

    /// Allocate game state. Called once, from `onInit`.
    fn init(&mut self, ctx: &mut EngineContext);

    /// The engine entered `Running`.
    fn resume(&mut self, _ctx: &mut EngineContext) {}

    /// The engine left `Running`. Save anything that must survive the process being killed.
    fn pause(&mut self, _ctx: &mut EngineContext) {}

    /// Release everything. The game is dropped right after.
    fn terminate(&mut self, _ctx: &mut EngineContext) {}

    /// Apply one queued event. Called in arrival order before `update`.
    fn handle_event(&mut self, _ctx: &mut EngineContext, _event: &PendingEvent) {}

    /// One simulation tick of `dt` seconds.
    fn update(&mut self, ctx: &mut EngineContext, dt: f32);

    /// Render pass, after `update`.
    fn draw(&mut self, _ctx: &mut EngineContext) {}

    /// The surface geometry changed. `ctx.surface()` holds the new descriptor.
    fn surface_changed(&mut self, _ctx: &mut EngineContext) {}

    /// The graphics context was lost. Recreate textures, buffers and shaders.
    fn rebuild_context(&mut self, _ctx: &mut EngineContext) {}

    /// Back key pressed. Return true if the game consumed it.
    fn back_pressed(&mut self, _ctx: &mut EngineContext) -> bool {
        false
    }

    /// The platform is short on memory. Drop caches.
    fn low_memory(&mut self, _ctx: &mut EngineContext) {}
}

/// Engine-owned state visible to the game.
#[derive(Debug, Default)]
pub struct EngineContext {
    surface: SurfaceDescriptor,
    clock: SimClock,
    context_generation: u64,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current render surface geometry.
    pub fn surface(&self) -> &SurfaceDescriptor {
        &self.surface
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Graphics context generation the game's GPU resources were built for.
    pub fn context_generation(&self) -> u64 {
        self.context_generation
    }

    pub(crate) fn set_surface(&mut self, surface: SurfaceDescriptor) {
        self.surface = surface;
    }

    pub(crate) fn set_context_generation(&mut self, generation: u64) {
        self.context_generation = generation;
    }

    pub(crate) fn clock_mut(&mut self) -> &mut SimClock {
        &mut self.clock
    }
}
