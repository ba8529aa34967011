//! Minimal 2D vector math for the top-down world.

pub mod vec2;

pub use vec2::Vec2;
