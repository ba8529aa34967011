//! Turning a [`WallHit`] into a shaded, vertically scaled texture strip.
//!
//! # Projection
//!
//! A wall one unit tall at perpendicular distance `d` covers
//! `floor(viewport_height / d)` rows, centered on the horizon. That inverse
//! distance law is the whole 3D illusion; sprites use the same law so both
//! shrink together.
//!
//! # Shading
//!
//! Brightness falls off linearly with distance and east/west faces are dimmed
//! by a fixed ratio:
//!
//! ```text
//! intensity = 1 - min(d, max_distance) / max_distance
//! intensity *= side_darkening            (east/west faces only)
//! pixel     = texel over-painted with overlay_color at opacity 1 - intensity
//! ```

use std::ops::Range;

use super::caster::{Side, WallHit};
use super::framebuffer::FrameBuffer;
use crate::colors;
use crate::config::RenderConfig;
use crate::texture::{Texture, TextureAtlas};

/// Rows covered by a wall at `perp_distance`: `floor(viewport_height / perp_distance)`.
///
/// Saturates for walls touching the camera (distance 0).
#[inline]
pub fn strip_height(viewport_height: usize, perp_distance: f64) -> i64 {
    (viewport_height as f64 / perp_distance).floor() as i64
}

/// Distance falloff in `[0, 1]`, 1 at the camera and 0 at `max_distance` or beyond.
#[inline]
pub fn distance_intensity(distance: f64, max_distance: f64) -> f64 {
    if max_distance > 0.0 {
        (1.0 - distance.min(max_distance) / max_distance).clamp(0.0, 1.0)
    } else {
        1.0
    }
}

/// Wall brightness in `[0, 1]` for a hit at `distance` on `side`.
#[inline]
pub fn wall_intensity(distance: f64, side: Side, config: &RenderConfig) -> f64 {
    let intensity = distance_intensity(distance, config.max_render_distance);
    match side {
        Side::NorthSouth => intensity,
        Side::EastWest => intensity * config.side_darkening,
    }
}

/// Where a column's colors come from.
#[derive(Debug, Clone, Copy)]
enum ColumnSource<'a> {
    Texture { texture: &'a Texture, tex_x: u32 },
    /// No texture for the id or the atlas default.
    Flat(u32),
}

/// Everything needed to paint one screen column of wall.
#[derive(Debug, Clone, Copy)]
pub struct WallColumn<'a> {
    /// First row of the unclipped strip; negative when the wall overflows the top.
    top: i64,
    height: i64,
    rows: (usize, usize),
    source: ColumnSource<'a>,
    overlay_color: u32,
    overlay_opacity: f64,
}

impl<'a> WallColumn<'a> {
    pub fn new(
        hit: &WallHit,
        viewport_height: usize,
        atlas: &'a TextureAtlas,
        config: &RenderConfig,
    ) -> Self {
        let height = strip_height(viewport_height, hit.perp_distance).max(0);
        let top = viewport_height as i64 / 2 - height / 2;
        let bottom = top.saturating_add(height);

        // Clip to the viewport
        let start = top.clamp(0, viewport_height as i64) as usize;
        let end = bottom.clamp(0, viewport_height as i64) as usize;

        let source = match atlas.resolve(hit.texture_id) {
            Some(texture) => {
                let size = texture.size();
                let tex_x = ((hit.u * size as f64) as u32).min(size - 1);
                ColumnSource::Texture { texture, tex_x }
            }
            None => ColumnSource::Flat(colors::fallback_color(hit.texture_id)),
        };

        Self {
            top,
            height,
            rows: (start, end),
            source,
            overlay_color: config.overlay_color,
            overlay_opacity: 1.0 - wall_intensity(hit.perp_distance, hit.side, config),
        }
    }

    /// Screen rows the wall covers, already clipped to the viewport.
    #[inline]
    pub fn rows(&self) -> Range<usize> {
        self.rows.0..self.rows.1
    }

    #[inline]
    pub fn covers(&self, y: usize) -> bool {
        y >= self.rows.0 && y < self.rows.1
    }

    /// Unclipped strip height in rows.
    pub fn strip_height(&self) -> i64 {
        self.height
    }

    /// Final color of screen row `y`, which must lie in [`Self::rows`].
    #[inline]
    pub fn pixel(&self, y: usize) -> u32 {
        let base = match self.source {
            ColumnSource::Texture { texture, tex_x } => {
                // Stretch `size` texel rows over `height` screen rows
                let size = texture.size();
                let offset = (y as i64 - self.top) as f64;
                let tex_y = (offset * size as f64 / self.height as f64) as u32;
                texture.texel(tex_x, tex_y)
            }
            ColumnSource::Flat(color) => color,
        };
        colors::blend_overlay(base, self.overlay_color, self.overlay_opacity)
    }
}

/// Paint `column` of the frame buffer with its wall strip.
pub fn draw_wall_column(fb: &mut FrameBuffer, x: usize, column: &WallColumn) {
    for y in column.rows() {
        fb.set_pixel(x, y, column.pixel(y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn hit(perp_distance: f64, side: Side, texture_id: u32) -> WallHit {
        WallHit {
            perp_distance,
            side,
            texture_id,
            u: 0.5,
            cell: (0, 0),
            steps: 1,
        }
    }

    fn striped_atlas() -> TextureAtlas {
        // Texel color encodes its row so stretching is observable.
        let mut atlas = TextureAtlas::new(4);
        let tex = Texture::from_fn(4, |_, y| colors::pack_rgb(0, 0, (y * 60) as u8)).unwrap();
        atlas.insert(1, tex).unwrap();
        atlas
    }

    fn unshaded() -> RenderConfig {
        RenderConfig {
            max_render_distance: 1e9,
            ..RenderConfig::default()
        }
    }

    #[test]
    fn doubling_distance_halves_height() {
        for &d in &[0.5, 1.0, 1.5, 3.0, 7.25] {
            let near = strip_height(480, d);
            let far = strip_height(480, d * 2.0);
            assert_eq!(far, near / 2, "distance {d}");
        }
        assert_eq!(strip_height(480, 1.0), 480);
        assert_eq!(strip_height(480, 2.0), 240);
        assert_eq!(strip_height(480, 4.0), 120);
    }

    #[test]
    fn zero_distance_saturates() {
        assert_eq!(strip_height(480, 0.0), i64::MAX);
        let atlas = striped_atlas();
        let column = WallColumn::new(&hit(0.0, Side::NorthSouth, 1), 10, &atlas, &unshaded());
        assert_eq!(column.rows(), 0..10);
        // Still samples a valid texel.
        let _ = column.pixel(9);
    }

    #[test]
    fn intensity_falls_off_linearly() {
        let config = RenderConfig::default();
        let max = config.max_render_distance;
        assert_relative_eq!(wall_intensity(0.0, Side::NorthSouth, &config), 1.0);
        assert_relative_eq!(wall_intensity(max / 2.0, Side::NorthSouth, &config), 0.5);
        assert_relative_eq!(wall_intensity(max * 3.0, Side::NorthSouth, &config), 0.0);
        assert_relative_eq!(
            wall_intensity(0.0, Side::EastWest, &config),
            config.side_darkening
        );
    }

    #[test]
    fn short_wall_is_centered() {
        let atlas = striped_atlas();
        let column = WallColumn::new(&hit(2.0, Side::NorthSouth, 1), 8, &atlas, &unshaded());
        assert_eq!(column.strip_height(), 4);
        assert_eq!(column.rows(), 2..6);
    }

    #[test]
    fn tall_wall_is_clipped() {
        let atlas = striped_atlas();
        let column = WallColumn::new(&hit(0.25, Side::NorthSouth, 1), 8, &atlas, &unshaded());
        assert_eq!(column.strip_height(), 32);
        assert_eq!(column.rows(), 0..8);
        // Only the middle of the texture is visible: rows 12..20 of 32 map to texels 1..2.
        assert_eq!(column.pixel(0), colors::pack_rgb(0, 0, 60));
        assert_eq!(column.pixel(7), colors::pack_rgb(0, 0, 120));
    }

    #[test]
    fn texture_is_stretched_over_strip() {
        let atlas = striped_atlas();
        let column = WallColumn::new(&hit(1.0, Side::NorthSouth, 1), 8, &atlas, &unshaded());
        let rows: Vec<u32> = column.rows().map(|y| column.pixel(y)).collect();
        let expected: Vec<u32> = [0, 0, 60, 60, 120, 120, 180, 180]
            .iter()
            .map(|&b| colors::pack_rgb(0, 0, b))
            .collect();
        assert_eq!(rows, expected);
    }

    #[test]
    fn east_west_faces_are_darker() {
        let mut atlas = TextureAtlas::new(1);
        atlas.insert(1, Texture::solid(1, colors::WHITE).unwrap()).unwrap();
        let config = RenderConfig::default();
        let ns = WallColumn::new(&hit(2.0, Side::NorthSouth, 1), 8, &atlas, &config);
        let ew = WallColumn::new(&hit(2.0, Side::EastWest, 1), 8, &atlas, &config);
        assert!(ew.pixel(4) & 0xFF < ns.pixel(4) & 0xFF);
    }

    #[test]
    fn missing_texture_draws_flat_color() {
        let atlas = TextureAtlas::new(4);
        let column = WallColumn::new(&hit(1.0, Side::NorthSouth, 3), 8, &atlas, &unshaded());
        assert_eq!(column.pixel(4), colors::fallback_color(3));
    }

    #[test]
    fn draws_only_clipped_rows() {
        let atlas = striped_atlas();
        let column = WallColumn::new(&hit(2.0, Side::NorthSouth, 1), 8, &atlas, &unshaded());
        let mut buffer = vec![colors::WHITE; 8];
        let mut fb = FrameBuffer::new(&mut buffer, 1, 8);
        draw_wall_column(&mut fb, 0, &column);
        assert_eq!(buffer[0], colors::WHITE);
        assert_eq!(buffer[1], colors::WHITE);
        assert_ne!(buffer[2], colors::WHITE);
        assert_eq!(buffer[6], colors::WHITE);
    }
}
