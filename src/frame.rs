//! Whole-frame orchestration.
//!
//! The [`FrameRenderer`] struct is the main entry point. Each call to
//! [`FrameRenderer::render`] is a pure function of its arguments:
//!
//! 1. Clear ceiling and floor.
//! 2. Wall pass: cast every column, record its distance in the depth buffer,
//!    and paint its strip. Runs to completion before step 3.
//! 3. Sprite pass: sort far to near, project, depth test and paint.
//!
//! The renderer reuses its buffers between calls but overwrites them
//! completely, so no frame depends on the previous one.

use rayon::prelude::*;

use crate::camera::Camera;
use crate::config::RenderConfig;
use crate::render::caster::{cast_column, column_to_camera_x, WallHit};
use crate::render::depth::DepthBuffer;
use crate::render::renderer::Renderer;
use crate::render::sprite::{draw_sprites, SpritePassStats};
use crate::render::wall::{draw_wall_column, WallColumn};
use crate::scene::Scene;
use crate::sprite::Sprite;
use crate::texture::TextureAtlas;
use crate::world::WorldGrid;

/// Output size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
}

impl Viewport {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Per-frame counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub columns: usize,
    pub max_dda_steps: u32,
    pub total_dda_steps: u64,
    pub sprites: SpritePassStats,
}

/// A finished frame, borrowed from the renderer that produced it.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pixels: &'a [u32],
    bytes: &'a [u8],
    depth: &'a DepthBuffer,
    viewport: Viewport,
    stats: FrameStats,
}

impl<'a> Frame<'a> {
    /// Row-major ARGB8888 pixels.
    pub fn pixels(&self) -> &'a [u32] {
        self.pixels
    }

    /// The pixels as bytes, ready for a streaming texture upload.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Wall distance per column, for layers drawn on top of the frame.
    pub fn depth(&self) -> &'a DepthBuffer {
        self.depth
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x < self.viewport.width && y < self.viewport.height {
            Some(self.pixels[y * self.viewport.width + x])
        } else {
            None
        }
    }

    pub fn width(&self) -> usize {
        self.viewport.width
    }

    pub fn height(&self) -> usize {
        self.viewport.height
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }
}

pub struct FrameRenderer {
    renderer: Renderer,
    hits: Vec<WallHit>,
    config: RenderConfig,
}

impl Default for FrameRenderer {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

impl FrameRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            renderer: Renderer::new(0, 0),
            hits: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut RenderConfig {
        &mut self.config
    }

    /// Renders one frame. Returns `None` (and draws nothing) for an empty viewport.
    pub fn render(
        &mut self,
        camera: &Camera,
        grid: &WorldGrid,
        textures: &TextureAtlas,
        sprites: &[Sprite],
        viewport: Viewport,
    ) -> Option<Frame<'_>> {
        if viewport.is_empty() {
            tracing::trace!(?viewport, "empty viewport, skipping frame");
            return None;
        }

        self.renderer.resize(viewport.width, viewport.height);
        self.renderer
            .clear(self.config.ceiling_color, self.config.floor_color);

        let mut stats = self.wall_pass(camera, grid, textures, viewport);

        let (mut fb, depth) = self.renderer.split_mut();
        stats.sprites = draw_sprites(&mut fb, depth, sprites, camera, textures, &self.config);

        tracing::trace!(
            columns = stats.columns,
            max_dda_steps = stats.max_dda_steps,
            sprites_drawn = stats.sprites.drawn,
            sprites_culled = stats.sprites.culled,
            "frame rendered"
        );

        Some(Frame {
            pixels: self.renderer.pixels(),
            bytes: self.renderer.as_bytes(),
            depth: self.renderer.depth(),
            viewport,
            stats,
        })
    }

    /// Renders `scene` with this renderer's config.
    pub fn render_scene(&mut self, scene: &Scene, viewport: Viewport) -> Option<Frame<'_>> {
        self.render(
            &scene.camera,
            &scene.grid,
            &scene.textures,
            &scene.sprites,
            viewport,
        )
    }

    fn wall_pass(
        &mut self,
        camera: &Camera,
        grid: &WorldGrid,
        textures: &TextureAtlas,
        viewport: Viewport,
    ) -> FrameStats {
        let Viewport { width, height } = viewport;
        let parallel = self.config.parallel;

        // Columns only read the camera and grid, so they cast independently
        let cast = |x: usize| cast_column(column_to_camera_x(x, width), camera, grid);
        self.hits.clear();
        if parallel {
            (0..width)
                .into_par_iter()
                .map(cast)
                .collect_into_vec(&mut self.hits);
        } else {
            self.hits.extend((0..width).map(cast));
        }

        let mut stats = FrameStats {
            columns: width,
            ..FrameStats::default()
        };
        let depth = self.renderer.depth_mut();
        for (x, hit) in self.hits.iter().enumerate() {
            depth.set(x, hit.perp_distance);
            stats.max_dda_steps = stats.max_dda_steps.max(hit.steps);
            stats.total_dda_steps += hit.steps as u64;
        }

        let columns: Vec<WallColumn> = self
            .hits
            .iter()
            .map(|hit| WallColumn::new(hit, height, textures, &self.config))
            .collect();

        let mut fb = self.renderer.as_framebuffer();
        if parallel {
            fb.rows_mut()
                .par_chunks_mut(width)
                .enumerate()
                .for_each(|(y, row)| {
                    for (x, column) in columns.iter().enumerate() {
                        if column.covers(y) {
                            row[x] = column.pixel(y);
                        }
                    }
                });
        } else {
            for (x, column) in columns.iter().enumerate() {
                draw_wall_column(&mut fb, x, column);
            }
        }

        stats
    }
}
