//! Tunable render settings.
//!
//! The lighting model is a fixed aesthetic hack, not a physical one: brightness
//! falls off linearly to zero at [`RenderConfig::max_render_distance`] and walls
//! hit on an east/west face are multiplied by [`RenderConfig::side_darkening`].

use serde::{Deserialize, Serialize};

use crate::colors;

/// Distance at which walls fade fully into the overlay color.
pub const DEFAULT_MAX_RENDER_DISTANCE: f64 = 16.0;

/// Brightness ratio of east/west wall faces relative to north/south ones.
pub const DEFAULT_SIDE_DARKENING: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub max_render_distance: f64,
    pub side_darkening: f64,
    /// Solid color composited over walls with opacity `1 - intensity`.
    pub overlay_color: u32,
    pub ceiling_color: u32,
    pub floor_color: u32,
    /// Apply the distance falloff to sprites as well as walls.
    pub shade_sprites: bool,
    /// Run the wall pass on the rayon thread pool.
    pub parallel: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_render_distance: DEFAULT_MAX_RENDER_DISTANCE,
            side_darkening: DEFAULT_SIDE_DARKENING,
            overlay_color: colors::BLACK,
            ceiling_color: colors::CEILING,
            floor_color: colors::FLOOR,
            shade_sprites: true,
            parallel: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: RenderConfig =
            serde_json::from_str(r#"{ "max_render_distance": 8.0, "parallel": true }"#).unwrap();
        assert_eq!(config.max_render_distance, 8.0);
        assert!(config.parallel);
        assert_eq!(config.side_darkening, DEFAULT_SIDE_DARKENING);
        assert_eq!(config.overlay_color, colors::BLACK);
    }
}
