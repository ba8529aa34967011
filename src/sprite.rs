//! World-space billboard entities.

use serde::{Deserialize, Serialize};

use crate::math::Vec2;

/// A point entity drawn as a camera-facing billboard.
///
/// `kind` is the texture id of the sprite's image. The renderer treats the
/// sprite list as an immutable snapshot for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub position: Vec2,
    pub kind: u32,
}

impl Sprite {
    pub fn new(x: f64, y: f64, kind: u32) -> Self {
        Self {
            position: Vec2::new(x, y),
            kind,
        }
    }
}
