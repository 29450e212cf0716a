use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::api::game::{EngineContext, Game};
use crate::api::types::{GameEvent, OrientationEvent, PendingEvent, TouchEvent};
use crate::config::EngineConfig;
use crate::core::lifecycle::{next_state, require, require_live, EngineState, LifecycleOp};
use crate::core::time::{clamp_dt, validate_dt};
use crate::error::{EngineError, Operation, ViolationPolicy};
use crate::input::queue::EventQueue;
use crate::surface::binding::{RenderSurface, SurfaceDescriptor};
use crate::surface::orientation::OrientationMask;

/// Game plus the engine-owned context it runs against.
struct World<G> {
    game: G,
    ctx: EngineContext,
}

/// Where the game lives across the lifecycle.
enum WorldSlot<G> {
    /// Constructed but `onInit` has not run.
    Pending(G),
    /// Between `onInit` and `onTerminate`.
    Live(World<G>),
    /// After `onTerminate`. The game has been dropped.
    Released,
}

impl<G> WorldSlot<G> {
    fn live_mut(&mut self) -> Option<&mut World<G>> {
        match self {
            WorldSlot::Live(world) => Some(world),
            _ => None,
        }
    }
}

/// Handle to one engine instance.
///
/// # Locking
///
/// - The lifecycle lock serializes `init`, `resume`, `pause`, `terminate`,
///   `context_changed`, `press_back_key` and `low_memory`.
/// - The world lock owns the game. Only one thread can step at a time.
/// - Lock order is always lifecycle, then world. `step` holds the lifecycle
///   lock just long enough to check `Running` and take the world lock, so a
///   concurrent `pause` or `terminate` waits for the in-flight step and no
///   step ever runs against a terminated world.
/// - Event producers and `size_changed` read a lock-free state snapshot and
///   never wait on either lock.
pub struct Engine<G: Game> {
    config: EngineConfig,
    lifecycle: Mutex<EngineState>,
    snapshot: AtomicU8,
    world: Mutex<WorldSlot<G>>,
    events: EventQueue,
    surface: RenderSurface,
}

impl<G: Game> Engine<G> {
    /// Build an uninitialized engine using the game's own config.
    pub fn new(game: G) -> Result<Self, EngineError> {
        let config = game.config();
        Self::with_config(game, config)
    }

    /// Build an uninitialized engine with an explicit config.
    pub fn with_config(game: G, config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let events = EventQueue::new(config.max_pending_events);
        Ok(Self {
            config,
            lifecycle: Mutex::new(EngineState::Uninitialized),
            snapshot: AtomicU8::new(EngineState::Uninitialized.as_u8()),
            world: Mutex::new(WorldSlot::Pending(game)),
            events,
            surface: RenderSurface::new(),
        })
    }

    // ---- Lifecycle ----

    /// Allocate engine resources and run `Game::init`. Valid once, from `Uninitialized`.
    pub fn init(&self) -> Result<(), EngineError> {
        let mut state = self.lock_lifecycle();
        let next = next_state(*state, LifecycleOp::Init)?;

        let mut world = self.lock_world();
        let game = match std::mem::replace(&mut *world, WorldSlot::Released) {
            WorldSlot::Pending(game) => game,
            other => {
                *world = other;
                return Err(EngineError::InvalidState { op: Operation::Init, state: *state });
            }
        };

        self.events.clear();
        self.surface.reset();
        let mut ctx = EngineContext::new();
        ctx.set_context_generation(self.surface.context_generation());

        let mut live = World { game, ctx };
        live.game.init(&mut live.ctx);
        *world = WorldSlot::Live(live);

        self.set_state(&mut state, next);
        Ok(())
    }

    /// Enter `Running` from `Initialized` or `Paused`.
    pub fn resume(&self) -> Result<(), EngineError> {
        let mut state = self.lock_lifecycle();
        let next = next_state(*state, LifecycleOp::Resume)?;
        if let Some(World { game, ctx }) = self.lock_world().live_mut() {
            game.resume(ctx);
        }
        self.set_state(&mut state, next);
        Ok(())
    }

    /// Leave `Running`. Waits for an in-flight step to finish.
    pub fn pause(&self) -> Result<(), EngineError> {
        let mut state = self.lock_lifecycle();
        let next = next_state(*state, LifecycleOp::Pause)?;
        if let Some(World { game, ctx }) = self.lock_world().live_mut() {
            game.pause(ctx);
        }
        self.set_state(&mut state, next);
        Ok(())
    }

    /// Run `Game::terminate` and drop the game. Valid from any state;
    /// calling it again after termination is a no-op.
    ///
    /// Blocks until an in-flight step completes.
    pub fn terminate(&self) -> Result<(), EngineError> {
        let mut state = self.lock_lifecycle();
        let next = next_state(*state, LifecycleOp::Terminate)?;
        if *state == EngineState::Terminated {
            log::debug!("onTerminate on a terminated engine, ignoring");
            return Ok(());
        }

        let released = std::mem::replace(&mut *self.lock_world(), WorldSlot::Released);
        if let WorldSlot::Live(mut world) = released {
            world.game.terminate(&mut world.ctx);
        }
        self.events.clear();
        self.surface.reset();

        self.set_state(&mut state, next);
        Ok(())
    }

    /// The graphics context was recreated. GPU resources are rebuilt lazily
    /// on the stepping thread before the next tick.
    pub fn context_changed(&self) -> Result<(), EngineError> {
        let state = self.lock_lifecycle();
        require_live(Operation::ContextChanged, *state)?;
        let generation = self.surface.invalidate_context();
        log::info!("graphics context changed (generation {generation})");
        Ok(())
    }

    // ---- Surface ----

    /// Stage new surface geometry. Applied before the next tick.
    pub fn size_changed(&self, desc: SurfaceDescriptor) -> Result<(), EngineError> {
        require_live(Operation::SizeChanged, self.state())?;
        log::info!(
            "surface size changed to {}x{} ({:?})",
            desc.width,
            desc.height,
            desc.orientation
        );
        self.surface.stage(desc);
        Ok(())
    }

    // ---- Frame stepping ----

    /// Advance the simulation by `dt` seconds.
    ///
    /// Applies staged surface and context changes, drains the event queue in
    /// arrival order into `Game::handle_event`, then runs one `update` and one
    /// `draw`. Only valid while `Running`.
    pub fn step(&self, dt: f32) -> Result<(), EngineError> {
        let state = self.lock_lifecycle();
        require(Operation::Step, *state, &[EngineState::Running])?;
        let dt = validate_dt(dt)?;
        let mut world = self.lock_world();
        let current = *state;
        drop(state);

        let World { game, ctx } = world
            .live_mut()
            .ok_or(EngineError::InvalidState { op: Operation::Step, state: current })?;

        let generation = self.surface.context_generation();
        if generation != ctx.context_generation() {
            ctx.set_context_generation(generation);
            game.rebuild_context(ctx);
        }
        if let Some(desc) = self.surface.take_pending() {
            ctx.set_surface(desc);
            game.surface_changed(ctx);
        }

        let events = self.events.drain();
        if !events.is_empty() {
            log::trace!("applying {} queued events", events.len());
        }
        for event in &events {
            game.handle_event(ctx, event);
        }

        let dt = clamp_dt(dt, self.config.max_step_dt);
        game.update(ctx, dt);
        ctx.clock_mut().advance(dt);
        game.draw(ctx);
        Ok(())
    }

    // ---- Input & sensors ----

    /// Queue a touch sample for the next step.
    pub fn touch(&self, event: TouchEvent) -> Result<(), EngineError> {
        self.post(PendingEvent::Touch(event))
    }

    /// Queue an orientation sensor sample for the next step.
    pub fn orientation_changed(&self, event: OrientationEvent) -> Result<(), EngineError> {
        self.post(PendingEvent::Orientation(event))
    }

    /// Queue a platform UI event for the next step.
    pub fn send_game_event(&self, event: GameEvent) -> Result<(), EngineError> {
        self.post(PendingEvent::Game(event))
    }

    /// Queue any event. Only accepted while `Running`.
    /// A full queue drops the event and counts it in `dropped_events`.
    pub fn post(&self, event: PendingEvent) -> Result<(), EngineError> {
        require(event.operation(), self.state(), &[EngineState::Running])?;
        self.events.push(event);
        Ok(())
    }

    // ---- Serialized one-shot calls ----

    /// Offer the back key to the game. `Ok(true)` means the game consumed it
    /// and the platform must not navigate back.
    pub fn press_back_key(&self) -> Result<bool, EngineError> {
        let state = self.lock_lifecycle();
        require_live(Operation::BackKey, *state)?;
        let consumed = self
            .lock_world()
            .live_mut()
            .map(|World { game, ctx }| game.back_pressed(ctx))
            .unwrap_or(false);
        log::debug!("back key consumed: {consumed}");
        Ok(consumed)
    }

    /// Forward a low-memory warning to the game.
    pub fn low_memory(&self) -> Result<(), EngineError> {
        let state = self.lock_lifecycle();
        require_live(Operation::LowMemory, *state)?;
        log::warn!("low memory warning");
        if let Some(World { game, ctx }) = self.lock_world().live_mut() {
            game.low_memory(ctx);
        }
        Ok(())
    }

    // ---- Queries (any state, never mutate) ----

    pub fn frame_rate(&self) -> u32 {
        self.config.frame_rate
    }

    pub fn use_orientation_sensor(&self) -> bool {
        self.config.use_orientation_sensor
    }

    /// Android `SCREEN_ORIENTATION_*` value for the supported orientations.
    pub fn supported_orientation(&self) -> i32 {
        self.config.supported_orientations.android_screen_orientation()
    }

    pub fn supported_orientations(&self) -> OrientationMask {
        self.config.supported_orientations
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn policy(&self) -> ViolationPolicy {
        self.config.policy()
    }

    /// Lock-free view of the lifecycle state.
    pub fn state(&self) -> EngineState {
        EngineState::from_u8(self.snapshot.load(Ordering::Acquire))
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    pub fn dropped_events(&self) -> u64 {
        self.events.dropped()
    }

    /// Read-only access to the live game. `None` outside `init`..`terminate`.
    pub fn with_game<R>(&self, f: impl FnOnce(&G, &EngineContext) -> R) -> Option<R> {
        match &*self.lock_world() {
            WorldSlot::Live(world) => Some(f(&world.game, &world.ctx)),
            _ => None,
        }
    }

    // ---- Internals ----

    fn set_state(&self, state: &mut MutexGuard<'_, EngineState>, next: EngineState) {
        if **state != next {
            log::info!("engine {} -> {}", **state, next);
        }
        **state = next;
        self.snapshot.store(next.as_u8(), Ordering::Release);
    }

    fn lock_lifecycle(&self) -> MutexGuard<'_, EngineState> {
        self.lifecycle.lock().unwrap_or_else(|poisoned| {
            log::error!("lifecycle lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn lock_world(&self) -> MutexGuard<'_, WorldSlot<G>> {
        self.world.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<G: Game> std::fmt::Debug for Engine<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("state", &self.state())
            .field("config", &self.config)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}
