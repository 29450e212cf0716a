mod game;
pub use game::TiltBall;

gcube_android::export_engine!(TiltBall, TiltBall::new);
