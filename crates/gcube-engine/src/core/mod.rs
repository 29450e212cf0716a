pub mod engine;
pub mod lifecycle;
pub mod time;
