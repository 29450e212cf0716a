use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use glam::Vec2;

use gcube_engine::{
    Engine, EngineConfig, EngineError, EngineState, Game, GameEvent, OrientationEvent,
    SurfaceDescriptor, TouchAction, TouchEvent,
};
use gcube_engine::surface::orientation::android;

/// Process-wide owner of the engine behind the static `NDKInterface` surface.
///
/// The Java side only has static natives, so one engine handle lives here and
/// every exported function goes through it. Calls that arrive while no engine
/// is attached (before `onInit`, after `onTerminate`) are dropped. Errors from
/// an attached engine go through its `ViolationPolicy`.
///
/// Lock order: `lifecycle`, then `slot`, then the engine's own locks.
pub struct EngineHost<G: Game> {
    slot: RwLock<Option<Arc<Engine<G>>>>,
    make: fn() -> G,
    /// Serializes `onInit`/`onResume`/`onPause`/`onTerminate`. Holds the last
    /// request from the activity: `onResume` sets it, `onPause` clears it.
    /// Android may resume the activity before the GL surface exists.
    lifecycle: Mutex<bool>,
}

impl<G: Game> EngineHost<G> {
    pub const fn new(make: fn() -> G) -> Self {
        Self {
            slot: RwLock::new(None),
            make,
            lifecycle: Mutex::new(false),
        }
    }

    fn lock_lifecycle(&self) -> MutexGuard<'_, bool> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The engine handle, built (uninitialized) on first use.
    fn engine(&self) -> Option<Arc<Engine<G>>> {
        if let Some(engine) = self.attached() {
            return Some(engine);
        }
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        if slot.is_none() {
            match Engine::new((self.make)()) {
                Ok(engine) => *slot = Some(Arc::new(engine)),
                Err(err) => {
                    log::error!("cannot build engine: {err}");
                    return None;
                }
            }
        }
        slot.clone()
    }

    /// The current engine handle, if one has been built.
    pub fn attached(&self) -> Option<Arc<Engine<G>>> {
        self.slot.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Run `call` against the attached engine and resolve errors through its policy.
    ///
    /// The slot stays read-locked for the whole call, so `on_terminate` cannot
    /// detach the engine underneath it.
    fn dispatch<T>(
        &self,
        name: &str,
        call: impl FnOnce(&Engine<G>) -> Result<T, EngineError>,
    ) -> Option<T> {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        match slot.as_deref() {
            Some(engine) => engine.policy().apply(call(engine)),
            None => {
                log::debug!("{name}: no engine attached, ignoring");
                None
            }
        }
    }

    // ---- Lifecycle ----

    /// `onInit` runs on every GL surface creation. The first call initializes
    /// the engine; later calls mean the context was recreated.
    pub fn on_init(&self) {
        let resumed = self.lock_lifecycle();
        let Some(engine) = self.engine() else { return };
        let policy = engine.policy();
        if engine.state().is_live() {
            policy.apply(engine.context_changed());
            return;
        }
        if policy.apply(engine.init()).is_some() && *resumed {
            policy.apply(engine.resume());
        }
    }

    pub fn on_resume(&self) {
        let mut resumed = self.lock_lifecycle();
        *resumed = true;
        if let Some(engine) = self.attached() {
            if matches!(engine.state(), EngineState::Initialized | EngineState::Paused) {
                engine.policy().apply(engine.resume());
            }
        }
    }

    /// Only a running engine is paused; before the first resume there is nothing to stop.
    pub fn on_pause(&self) {
        let mut resumed = self.lock_lifecycle();
        *resumed = false;
        if let Some(engine) = self.attached() {
            if engine.state() == EngineState::Running {
                engine.policy().apply(engine.pause());
            }
        }
    }

    /// Terminate and detach the engine. A later `onInit` builds a fresh one.
    /// Waits for dispatched calls that are still running against it.
    pub fn on_terminate(&self) {
        let _lifecycle = self.lock_lifecycle();
        let taken = self.slot.write().unwrap_or_else(PoisonError::into_inner).take();
        match taken {
            Some(engine) => {
                engine.policy().apply(engine.terminate());
            }
            None => log::debug!("onTerminate: no engine attached, ignoring"),
        }
    }

    pub fn on_context_changed(&self) {
        self.dispatch("onContextChanged", |e| e.context_changed());
    }

    pub fn on_size_changed(&self, width: i32, height: i32, orientation: i32) {
        self.dispatch("onSizeChanged", |e| {
            e.size_changed(SurfaceDescriptor::from_raw(width, height, orientation)?)
        });
    }

    pub fn on_low_memory(&self) {
        self.dispatch("onLowMemory", |e| e.low_memory());
    }

    // ---- Frame ----

    pub fn step(&self, dt: f32) {
        self.dispatch("step", |e| e.step(dt));
    }

    // ---- Input ----

    /// True if the game consumed the key. False lets the platform navigate back.
    pub fn on_press_back_key(&self) -> bool {
        self.dispatch("onPressBackKey", |e| e.press_back_key())
            .unwrap_or(false)
    }

    pub fn on_touch_event(&self, action: i32, x: f32, y: f32, time_ms: i64) {
        self.dispatch("onTouchEvent", |e| {
            let action = TouchAction::try_from(action)?;
            e.touch(TouchEvent { action, pos: Vec2::new(x, y), time_ms })
        });
    }

    pub fn on_orientation_changed(&self, yaw: f32, pitch: f32, roll: f32) {
        self.dispatch("onOrientationChanged", |e| {
            e.orientation_changed(OrientationEvent { yaw, pitch, roll })
        });
    }

    pub fn send_game_event(&self, kind: i32, params: [i32; 4], text: String) {
        self.dispatch("sendGameEvent", |e| {
            e.send_game_event(GameEvent { kind, params, text })
        });
    }

    // ---- Queries ----

    pub fn get_frame_rate(&self) -> i32 {
        let rate = self
            .engine()
            .map(|e| e.frame_rate())
            .unwrap_or(EngineConfig::default().frame_rate);
        i32::try_from(rate).unwrap_or(i32::MAX)
    }

    pub fn use_orientation_sensor(&self) -> bool {
        self.engine().is_some_and(|e| e.use_orientation_sensor())
    }

    pub fn get_supported_orientation(&self) -> i32 {
        self.engine()
            .map(|e| e.supported_orientation())
            .unwrap_or(android::UNSPECIFIED)
    }
}
