use gcube_engine::{
    DeviceOrientation, EngineConfig, EngineContext, Game, GameEvent, OrientationEvent,
    OrientationMask, PendingEvent, ScreenOrientation, TouchAction,
};
use glam::Vec2;

const BALL_RADIUS: f32 = 24.0;
/// Pixels per second squared per radian of tilt.
const TILT_ACCEL: f32 = 1800.0;
const WALL_RESTITUTION: f32 = 0.6;
const FLICK_SCALE: f32 = 4.0;
/// A stalled frame should not fling the ball through a wall.
const MAX_STEP_DT: f32 = 0.1;

/// Game event kinds posted by the Java UI.
pub const EVENT_OPEN_MENU: i32 = 1;
pub const EVENT_RESET: i32 = 2;

/// Roll the ball by tilting the phone, flick it with a finger.
/// A Java-side menu can be opened over the game and closed with back.
pub struct TiltBall {
    pos: Vec2,
    vel: Vec2,
    tilt: Vec2,
    drag_start: Option<(Vec2, i64)>,
    menu_open: bool,
    bounces: u32,
}

impl TiltBall {
    pub fn new() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            tilt: Vec2::ZERO,
            drag_start: None,
            menu_open: false,
            bounces: 0,
        }
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn bounces(&self) -> u32 {
        self.bounces
    }

    pub fn menu_open(&self) -> bool {
        self.menu_open
    }

    fn center(ctx: &EngineContext) -> Vec2 {
        let s = ctx.surface();
        Vec2::new(s.width as f32, s.height as f32) * 0.5
    }

    fn on_game_event(&mut self, ctx: &EngineContext, event: &GameEvent) {
        match event.kind {
            EVENT_OPEN_MENU => self.menu_open = true,
            EVENT_RESET => {
                self.pos = Self::center(ctx);
                self.vel = Vec2::ZERO;
                self.bounces = 0;
            }
            other => log::debug!("tilt-ball: ignoring game event {other}"),
        }
    }

    /// Screen-space tilt. Held upright, roll tilts left/right and pitch
    /// tilts toward/away; held sideways the two axes trade places.
    fn tilt_from(o: &OrientationEvent, device: DeviceOrientation) -> Vec2 {
        if device.is_landscape() {
            Vec2::new(-o.pitch, -o.roll)
        } else {
            Vec2::new(o.roll, -o.pitch)
        }
    }

    fn keep_inside(&mut self, ctx: &EngineContext) {
        let s = ctx.surface();
        let max = Vec2::new(s.width as f32, s.height as f32) - Vec2::splat(BALL_RADIUS);
        let min = Vec2::splat(BALL_RADIUS);
        if max.x < min.x || max.y < min.y {
            return;
        }
        if self.pos.x < min.x || self.pos.x > max.x {
            self.vel.x = -self.vel.x * WALL_RESTITUTION;
            self.bounces += 1;
        }
        if self.pos.y < min.y || self.pos.y > max.y {
            self.vel.y = -self.vel.y * WALL_RESTITUTION;
            self.bounces += 1;
        }
        self.pos = self.pos.clamp(min, max);
    }
}

impl Default for TiltBall {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for TiltBall {
    fn config(&self) -> EngineConfig {
        EngineConfig {
            frame_rate: 60,
            use_orientation_sensor: true,
            supported_orientations: OrientationMask::from(vec![
                ScreenOrientation::Portrait,
                ScreenOrientation::PortraitUpsideDown,
            ]),
            max_step_dt: Some(MAX_STEP_DT),
            ..EngineConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        self.pos = Self::center(ctx);
        log::info!("tilt-ball: initialized");
    }

    fn pause(&mut self, _ctx: &mut EngineContext) {
        self.drag_start = None;
    }

    fn surface_changed(&mut self, ctx: &mut EngineContext) {
        if self.pos == Vec2::ZERO {
            self.pos = Self::center(ctx);
        }
        self.keep_inside(ctx);
    }

    fn handle_event(&mut self, ctx: &mut EngineContext, event: &PendingEvent) {
        match event {
            PendingEvent::Touch(touch) => match touch.action {
                TouchAction::Down => self.drag_start = Some((touch.pos, touch.time_ms)),
                TouchAction::Up => {
                    if let Some((start, t0)) = self.drag_start.take() {
                        let secs = ((touch.time_ms - t0).max(1) as f32) / 1000.0;
                        self.vel += (touch.pos - start) / secs / FLICK_SCALE;
                    }
                }
                TouchAction::Cancel => self.drag_start = None,
                TouchAction::Move => {}
            },
            PendingEvent::Orientation(o) => {
                self.tilt = Self::tilt_from(o, ctx.surface().orientation);
            }
            PendingEvent::Game(e) => self.on_game_event(ctx, e),
        }
    }

    fn update(&mut self, ctx: &mut EngineContext, dt: f32) {
        if self.menu_open {
            return;
        }
        self.vel += self.tilt * TILT_ACCEL * dt;
        self.pos += self.vel * dt;
        self.keep_inside(ctx);
    }

    fn back_pressed(&mut self, _ctx: &mut EngineContext) -> bool {
        std::mem::replace(&mut self.menu_open, false)
    }

    fn low_memory(&mut self, _ctx: &mut EngineContext) {
        self.drag_start = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gcube_engine::{Engine, OrientationEvent, SurfaceDescriptor, TouchEvent};

    fn running() -> Engine<TiltBall> {
        let engine = Engine::new(TiltBall::new()).unwrap();
        engine.init().unwrap();
        engine.size_changed(SurfaceDescriptor::from_raw(400, 800, 1).unwrap()).unwrap();
        engine.resume().unwrap();
        engine.step(0.0).unwrap();
        engine
    }

    fn pos(engine: &Engine<TiltBall>) -> Vec2 {
        engine.with_game(|g, _| g.pos()).unwrap()
    }

    #[test]
    fn config_requests_sensor_and_portrait_only() {
        let engine = Engine::new(TiltBall::new()).unwrap();
        assert!(engine.use_orientation_sensor());
        assert_eq!(engine.supported_orientation(), 7);
        assert_eq!(engine.frame_rate(), 60);
    }

    #[test]
    fn ball_starts_centered() {
        let engine = running();
        assert_eq!(pos(&engine), Vec2::new(200.0, 400.0));
    }

    #[test]
    fn tilting_right_rolls_right() {
        let engine = running();
        engine.orientation_changed(OrientationEvent { yaw: 0.0, pitch: 0.0, roll: 0.3 }).unwrap();
        for _ in 0..10 {
            engine.step(1.0 / 60.0).unwrap();
        }
        let p = pos(&engine);
        assert!(p.x > 200.0, "ball should move right, x={}", p.x);
        assert!((p.y - 400.0).abs() < 1e-3);
    }

    #[test]
    fn sideways_device_tilts_along_pitch() {
        let engine = running();
        engine.size_changed(SurfaceDescriptor::from_raw(800, 400, 3).unwrap()).unwrap();
        engine.step(0.0).unwrap();
        let start = pos(&engine);
        engine.orientation_changed(OrientationEvent { yaw: 0.0, pitch: -0.3, roll: 0.0 }).unwrap();
        for _ in 0..10 {
            engine.step(1.0 / 60.0).unwrap();
        }
        let p = pos(&engine);
        assert!(p.x > start.x, "ball should move right, x={}", p.x);
        assert!((p.y - start.y).abs() < 1e-3);
    }

    #[test]
    fn long_stall_is_capped() {
        let engine = running();
        engine.orientation_changed(OrientationEvent { yaw: 0.0, pitch: 0.0, roll: 0.3 }).unwrap();
        engine.step(10.0).unwrap();
        let elapsed = engine.with_game(|_, ctx| ctx.clock().elapsed()).unwrap();
        assert!((elapsed - f64::from(MAX_STEP_DT)).abs() < 1e-6);
    }

    #[test]
    fn flick_sets_velocity() {
        let engine = running();
        let down = TouchEvent { action: TouchAction::Down, pos: Vec2::new(100.0, 400.0), time_ms: 1000 };
        let up = TouchEvent { action: TouchAction::Up, pos: Vec2::new(100.0, 300.0), time_ms: 1100 };
        engine.touch(down).unwrap();
        engine.touch(up).unwrap();
        engine.step(0.1).unwrap();
        assert!(pos(&engine).y < 400.0);
    }

    #[test]
    fn ball_stays_inside_and_bounces() {
        let engine = running();
        engine.orientation_changed(OrientationEvent { yaw: 0.0, pitch: 0.0, roll: 1.0 }).unwrap();
        for _ in 0..120 {
            engine.step(1.0 / 60.0).unwrap();
        }
        let p = pos(&engine);
        assert!(p.x <= 400.0 - BALL_RADIUS);
        assert!(engine.with_game(|g, _| g.bounces()).unwrap() > 0);
    }

    #[test]
    fn menu_freezes_ball_until_back() {
        let engine = running();
        engine.send_game_event(GameEvent { kind: EVENT_OPEN_MENU, params: [0; 4], text: String::new() }).unwrap();
        engine.orientation_changed(OrientationEvent { yaw: 0.0, pitch: 0.0, roll: 0.5 }).unwrap();
        engine.step(0.1).unwrap();
        assert_eq!(pos(&engine), Vec2::new(200.0, 400.0));

        assert_eq!(engine.press_back_key(), Ok(true));
        assert_eq!(engine.press_back_key(), Ok(false));
        engine.step(0.1).unwrap();
        assert!(pos(&engine).x > 200.0);
    }
}
