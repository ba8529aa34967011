//! A CPU grid raycaster in the style of classic first-person engines.
//!
//! Walls are cast one screen column at a time with a DDA walk over a 2D cell
//! grid, scaled by inverse perpendicular distance and shaded by distance.
//! Billboard sprites are then depth-tested against the per-column wall
//! distances. All rendering is done on the CPU; SDL2 is used only by the
//! optional `window` feature to put the frame on screen.
//!
//! # Quick Start
//!
//! ```ignore
//! use raycaster::prelude::*;
//!
//! let mut grid = WorldGrid::new(16, 16)?;
//! grid.enclose(1);
//! let camera = Camera::from_angle(Vec2::new(8.5, 8.5), 0.0, DEFAULT_FOV);
//! let textures = TextureAtlas::new(64);
//!
//! let mut renderer = FrameRenderer::default();
//! if let Some(frame) = renderer.render(&camera, &grid, &textures, &[], Viewport::new(320, 200)) {
//!     present(frame.as_bytes());
//! }
//! ```

pub mod camera;
pub mod colors;
pub mod config;
pub mod frame;
pub mod math;
pub mod render;
pub mod scene;
pub mod sprite;
pub mod texture;
pub mod world;

#[cfg(feature = "window")]
pub mod window;

pub use camera::Camera;
pub use config::RenderConfig;
pub use frame::{Frame, FrameRenderer, FrameStats, Viewport};
pub use scene::{Scene, SceneError};
pub use sprite::Sprite;
pub use texture::{Texture, TextureAtlas, TextureError};
pub use world::{GridError, WorldGrid};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::camera::{Camera, DEFAULT_FOV};
    pub use crate::colors;
    pub use crate::config::RenderConfig;
    pub use crate::frame::{Frame, FrameRenderer, FrameStats, Viewport};
    pub use crate::math::Vec2;
    pub use crate::render::{cast_column, Side, WallHit};
    pub use crate::scene::Scene;
    pub use crate::sprite::Sprite;
    pub use crate::texture::{Texture, TextureAtlas};
    pub use crate::world::WorldGrid;

    #[cfg(feature = "window")]
    pub use crate::window::{FpsCounter, FrameLimiter, Window, WindowEvent};
}
