//! Billboard sprite projection with depth-buffer occlusion.
//!
//! # Camera Space
//!
//! A sprite's world offset from the camera is multiplied by the inverse of the
//! camera basis `[[plane.x, dir.x], [plane.y, dir.y]]`. The result's `y` is
//! the sprite's depth along the view axis, in the same units as the
//! perpendicular wall distances in the [`DepthBuffer`], so a per-column
//! `depth < wall_depth` test is a valid occlusion test.
//!
//! # Screen Space
//!
//! ```text
//! center column = round(W / 2 * (1 + x / y))
//! size          = |H / y|          (same law as wall strips)
//! columns       = [center - size / 2, center + size / 2) clipped to the viewport
//! ```
//!
//! # Ordering
//!
//! Sprites are drawn farthest first (painter's algorithm), so nearer sprites
//! overwrite farther ones where they overlap. Walls never overwrite sprites
//! because the whole wall pass runs before any sprite is drawn.
//!
//! There is no sprite cap and no spatial culling: a frame costs a sort plus
//! up to `sprites x viewport_width` column tests.

use std::cmp::Ordering;

use super::depth::DepthBuffer;
use super::framebuffer::FrameBuffer;
use super::wall::distance_intensity;
use crate::camera::Camera;
use crate::colors;
use crate::config::RenderConfig;
use crate::sprite::Sprite;
use crate::texture::TextureAtlas;

/// Largest screen offset or extent a projection keeps, in pixels.
const MAX_EXTENT: f64 = (1u64 << 40) as f64;

/// A sprite's footprint on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteProjection {
    /// Depth along the view axis. Always positive.
    pub depth: f64,
    /// Lateral camera-space offset.
    pub lateral: f64,
    pub center_x: i64,
    /// Width and height in pixels.
    pub size: i64,
    /// First covered column (unclipped).
    pub left: i64,
    /// First covered row (unclipped).
    pub top: i64,
}

impl SpriteProjection {
    /// Columns the sprite covers, clipped to `[0, viewport_width)`.
    pub fn columns(&self, viewport_width: usize) -> std::ops::Range<usize> {
        clip(self.left, self.size, viewport_width)
    }

    /// Rows the sprite covers, clipped to `[0, viewport_height)`.
    pub fn rows(&self, viewport_height: usize) -> std::ops::Range<usize> {
        clip(self.top, self.size, viewport_height)
    }
}

#[inline]
fn clip(start: i64, len: i64, limit: usize) -> std::ops::Range<usize> {
    let end = start.saturating_add(len);
    let start = start.clamp(0, limit as i64) as usize;
    let end = end.clamp(0, limit as i64) as usize;
    start..end.max(start)
}

/// Returns `sprites` ordered farthest to nearest from the camera.
///
/// Ties keep their input order. Sprites at non-finite distances sort first.
pub fn sort_far_to_near<'a>(sprites: &'a [Sprite], camera: &Camera) -> Vec<&'a Sprite> {
    let mut sorted: Vec<(f64, &Sprite)> = sprites
        .iter()
        .map(|s| ((s.position - camera.position).length_squared(), s))
        .collect();
    sorted.sort_by(|a, b| match (a.0.is_nan(), b.0.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => b.0.total_cmp(&a.0),
    });
    sorted.into_iter().map(|(_, s)| s).collect()
}

/// Projects `sprite` onto a `viewport_width x viewport_height` screen.
///
/// Returns `None` when nothing can be drawn: the camera basis is degenerate,
/// the sprite is on or behind the camera plane, or the projection is not
/// finite.
pub fn project(
    sprite: &Sprite,
    camera: &Camera,
    viewport_width: usize,
    viewport_height: usize,
) -> Option<SpriteProjection> {
    let transform = camera.to_camera_space(sprite.position)?;
    if transform.y <= 0.0 {
        return None;
    }

    let center = (viewport_width as f64 / 2.0) * (1.0 + transform.x / transform.y);
    let size = (viewport_height as f64 / transform.y).abs().floor();
    if !center.is_finite() || !size.is_finite() {
        return None;
    }

    // Sprites grazing the camera plane project to astronomically large
    // extents; bound them so screen offsets stay in i64 range.
    let center_x = center.round().clamp(-MAX_EXTENT, MAX_EXTENT) as i64;
    let size = size.min(MAX_EXTENT) as i64;
    Some(SpriteProjection {
        depth: transform.y,
        lateral: transform.x,
        center_x,
        size,
        left: center_x.saturating_sub(size / 2),
        top: (viewport_height as i64 / 2).saturating_sub(size / 2),
    })
}

/// Draws the visible columns of one projected sprite. Returns how many
/// columns passed the depth test.
pub fn draw_sprite(
    fb: &mut FrameBuffer,
    depth: &DepthBuffer,
    sprite: &Sprite,
    projection: &SpriteProjection,
    atlas: &TextureAtlas,
    config: &RenderConfig,
) -> usize {
    if projection.size <= 0 {
        return 0;
    }

    let texture = atlas.resolve(sprite.kind);
    let flat = colors::fallback_color(sprite.kind);
    let opacity = if config.shade_sprites {
        1.0 - distance_intensity(projection.depth, config.max_render_distance)
    } else {
        0.0
    };
    let size = projection.size as f64;
    let rows = projection.rows(fb.height());

    let mut drawn = 0;
    for x in projection.columns(fb.width()) {
        // Behind a wall in this column
        if !(projection.depth < depth.get(x)) {
            continue;
        }
        drawn += 1;

        let tex_x = texture.map(|t| {
            let offset = (x as i64 - projection.left) as f64;
            (offset * t.size() as f64 / size) as u32
        });

        for y in rows.clone() {
            let texel = match (texture, tex_x) {
                (Some(t), Some(tex_x)) => {
                    let offset = (y as i64 - projection.top) as f64;
                    t.texel(tex_x, (offset * t.size() as f64 / size) as u32)
                }
                _ => flat,
            };
            if colors::alpha(texel) == 0 {
                continue;
            }
            fb.set_pixel(x, y, colors::blend_overlay(texel, config.overlay_color, opacity));
        }
    }
    drawn
}

/// Counts from one sprite pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpritePassStats {
    pub drawn: usize,
    pub culled: usize,
    pub columns: usize,
}

/// Sorts, projects and draws every sprite. The depth buffer must already hold
/// the finished wall pass.
pub fn draw_sprites(
    fb: &mut FrameBuffer,
    depth: &DepthBuffer,
    sprites: &[Sprite],
    camera: &Camera,
    atlas: &TextureAtlas,
    config: &RenderConfig,
) -> SpritePassStats {
    let mut stats = SpritePassStats::default();
    if camera.inverse_determinant().is_none() {
        tracing::trace!(sprites = sprites.len(), "degenerate camera basis, skipping sprites");
        stats.culled = sprites.len();
        return stats;
    }

    let (width, height) = (fb.width(), fb.height());
    for sprite in sort_far_to_near(sprites, camera) {
        let Some(projection) = project(sprite, camera, width, height) else {
            stats.culled += 1;
            continue;
        };
        let columns = draw_sprite(fb, depth, sprite, &projection, atlas, config);
        if columns > 0 {
            stats.drawn += 1;
            stats.columns += columns;
        } else {
            stats.culled += 1;
        }
    }
    stats
}
