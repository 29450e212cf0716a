pub mod binding;
pub mod orientation;
