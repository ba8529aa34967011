//! The raycasting pipeline.
//!
//! Stages, in the order a frame runs them:
//! - [`caster`]: DDA ray per screen column, producing a [`WallHit`]
//! - [`wall`]: scaled, shaded texture strip per hit, depth written to the [`DepthBuffer`]
//! - [`sprite`]: billboards projected through the camera basis and depth tested per column

pub mod caster;
pub mod depth;
pub mod framebuffer;
pub mod renderer;
pub mod sprite;
pub mod wall;

pub use caster::{cast_column, Side, WallHit};
pub use depth::DepthBuffer;
pub use framebuffer::FrameBuffer;
pub use renderer::Renderer;
pub use sprite::{SpriteProjection, SpritePassStats};
pub use wall::WallColumn;
