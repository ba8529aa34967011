//! Everything one frame needs, and loading it from JSON.
//!
//! A scene file looks like:
//!
//! ```json
//! {
//!   "map": [[1, 1, 1], [1, 0, 1], [1, 1, 1]],
//!   "camera": { "position": { "x": 1.5, "y": 1.5 }, "angle": 0.0 },
//!   "sprites": [{ "position": { "x": 1.5, "y": 1.2 }, "kind": 4 }],
//!   "textures": {
//!     "size": 64,
//!     "default": 1,
//!     "entries": [
//!       { "id": 1, "path": "brick.png" },
//!       { "id": 4, "color": 4294901760 }
//!     ]
//!   },
//!   "config": { "max_render_distance": 12.0 }
//! }
//! ```
//!
//! `map` is indexed `map[y][x]`. Texture paths are relative to the scene file.
//! The camera is either a full `{ position, direction, plane }` basis or a
//! `{ position, angle, fov }` shorthand with angles in radians.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::camera::{Camera, DEFAULT_FOV};
use crate::config::RenderConfig;
use crate::math::Vec2;
use crate::sprite::Sprite;
use crate::texture::{Texture, TextureAtlas, TextureError, DEFAULT_TEXTURE_SIZE};
use crate::world::{GridError, WorldGrid};

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid map: {0}")]
    Grid(#[from] GridError),
    #[error("texture {id}: {source}")]
    Texture {
        id: u32,
        #[source]
        source: TextureError,
    },
    #[error("camera direction and plane must be finite and not parallel")]
    DegenerateCamera,
}

/// A world, a point of view and what to draw it with.
#[derive(Debug, Clone)]
pub struct Scene {
    pub grid: WorldGrid,
    pub camera: Camera,
    pub sprites: Vec<Sprite>,
    pub textures: TextureAtlas,
    /// Render settings the scene asks for, if any.
    pub config: Option<RenderConfig>,
}

impl Scene {
    pub fn new(grid: WorldGrid, camera: Camera, textures: TextureAtlas) -> Self {
        Self {
            grid,
            camera,
            sprites: Vec::new(),
            textures,
            config: None,
        }
    }

    pub fn with_sprites(mut self, sprites: Vec<Sprite>) -> Self {
        self.sprites = sprites;
        self
    }

    /// The built-in showcase level: a 16x16 walled map with procedural
    /// textures and a few billboards.
    pub fn demo() -> Result<Self, SceneError> {
        let grid = WorldGrid::from_rows(&DEMO_MAP)?;
        let camera = Camera::from_angle(Vec2::new(2.5, 2.5), 0.0, DEFAULT_FOV);

        let size = DEFAULT_TEXTURE_SIZE;
        let mut textures = TextureAtlas::new(size).with_default(1);
        let procedural: [(u32, fn(u32, u32) -> u32); 6] = [
            (1, demo::brick),
            (2, demo::stone),
            (3, demo::wood),
            (4, demo::moss),
            (10, demo::barrel),
            (11, demo::lamp),
        ];
        for (id, pattern) in procedural {
            Texture::from_fn(size, pattern)
                .and_then(|texture| textures.insert(id, texture))
                .map_err(|source| SceneError::Texture { id, source })?;
        }

        Ok(Self::new(grid, camera, textures).with_sprites(vec![
            Sprite::new(4.5, 4.5, 10),
            Sprite::new(5.5, 2.5, 10),
            Sprite::new(9.5, 9.5, 11),
            Sprite::new(13.5, 4.5, 11),
            Sprite::new(3.5, 12.5, 10),
        ]))
    }

    /// Load a scene file. Relative texture paths resolve against its directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let scene = Self::from_json_str(&data, base_dir)?;
        tracing::debug!(
            path = %path.display(),
            width = scene.grid.width(),
            height = scene.grid.height(),
            sprites = scene.sprites.len(),
            textures = scene.textures.len(),
            "loaded scene"
        );
        Ok(scene)
    }

    pub fn from_json_str(data: &str, base_dir: &Path) -> Result<Self, SceneError> {
        let file: SceneFile = serde_json::from_str(data)?;
        file.into_scene(base_dir)
    }
}

#[rustfmt::skip]
const DEMO_MAP: [[u8; 16]; 16] = [
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 3, 0, 0, 0, 0, 2, 0, 0, 4, 4, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 4, 4, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 1],
    [1, 2, 2, 0, 2, 2, 2, 2, 2, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3, 0, 0, 1],
    [1, 0, 0, 0, 0, 3, 0, 0, 0, 0, 0, 0, 3, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 4, 4, 4, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 4, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

/// Procedural texture patterns for the demo level, `(x, y) -> ARGB` over a
/// 64x64 raster.
mod demo {
    use crate::colors::{pack_argb, pack_rgb, TRANSPARENT};

    fn noise(x: u32, y: u32) -> u8 {
        let h = x.wrapping_mul(374_761_393) ^ y.wrapping_mul(668_265_263);
        (h.wrapping_mul(1_274_126_177) >> 27) as u8
    }

    pub fn brick(x: u32, y: u32) -> u32 {
        let offset = if (y / 16) % 2 == 0 { 0 } else { 16 };
        if y % 16 == 0 || (x + offset) % 32 == 0 {
            pack_rgb(150, 150, 140)
        } else {
            pack_rgb(150 + noise(x, y), 50, 40)
        }
    }

    pub fn stone(x: u32, y: u32) -> u32 {
        let v = 100 + noise(x / 4, y / 4) * 2;
        pack_rgb(v, v, v + 8)
    }

    pub fn wood(x: u32, y: u32) -> u32 {
        let grain = ((x * 3 + y / 8) % 11) as u8 * 4;
        if x % 16 == 0 {
            pack_rgb(60, 35, 15)
        } else {
            pack_rgb(120 + grain, 75 + grain / 2, 30)
        }
    }

    pub fn moss(x: u32, y: u32) -> u32 {
        let n = noise(x, y);
        pack_rgb(40 + n, 110 + n * 2, 40)
    }

    fn inside_circle(x: u32, y: u32, cx: i64, cy: i64, r: i64) -> bool {
        let (dx, dy) = (x as i64 - cx, y as i64 - cy);
        dx * dx + dy * dy <= r * r
    }

    pub fn barrel(x: u32, y: u32) -> u32 {
        if !(16..48).contains(&x) || y < 28 {
            return TRANSPARENT;
        }
        if y % 10 == 0 {
            pack_rgb(70, 70, 70)
        } else {
            pack_rgb(110, 70 + (x % 8) as u8 * 3, 30)
        }
    }

    pub fn lamp(x: u32, y: u32) -> u32 {
        if inside_circle(x, y, 32, 12, 9) {
            pack_argb(0xFF, 255, 230, 120)
        } else if (31..33).contains(&x) && y > 12 {
            pack_rgb(50, 50, 50)
        } else {
            TRANSPARENT
        }
    }
}

#[derive(Debug, Deserialize)]
struct SceneFile {
    map: Vec<Vec<u8>>,
    camera: CameraFile,
    #[serde(default)]
    sprites: Vec<Sprite>,
    #[serde(default)]
    textures: TexturesFile,
    #[serde(default)]
    config: Option<RenderConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CameraFile {
    Basis(Camera),
    Angle {
        position: Vec2,
        angle: f64,
        #[serde(default = "default_fov")]
        fov: f64,
    },
}

fn default_fov() -> f64 {
    DEFAULT_FOV
}

#[derive(Debug, Deserialize)]
struct TexturesFile {
    #[serde(default = "default_texture_size")]
    size: u32,
    #[serde(default)]
    default: Option<u32>,
    #[serde(default)]
    entries: Vec<TextureEntry>,
}

impl Default for TexturesFile {
    fn default() -> Self {
        Self {
            size: DEFAULT_TEXTURE_SIZE,
            default: None,
            entries: Vec::new(),
        }
    }
}

fn default_texture_size() -> u32 {
    DEFAULT_TEXTURE_SIZE
}

#[derive(Debug, Deserialize)]
struct TextureEntry {
    id: u32,
    #[serde(flatten)]
    source: TextureSource,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum TextureSource {
    Path(PathBuf),
    /// Solid ARGB color.
    Color(u32),
}

impl SceneFile {
    fn into_scene(self, base_dir: &Path) -> Result<Scene, SceneError> {
        let grid = WorldGrid::from_rows(&self.map)?;
        if !grid.is_enclosed() {
            tracing::warn!(
                width = grid.width(),
                height = grid.height(),
                "map border is not solid; rays leaving it stop at the edge"
            );
        }

        let camera = match self.camera {
            CameraFile::Basis(camera) => camera,
            CameraFile::Angle {
                position,
                angle,
                fov,
            } => Camera::from_angle(position, angle, fov),
        };
        if !camera.position.is_finite() || camera.inverse_determinant().is_none() {
            return Err(SceneError::DegenerateCamera);
        }

        let textures = self.textures.into_atlas(base_dir)?;

        Ok(Scene {
            grid,
            camera,
            sprites: self.sprites,
            textures,
            config: self.config,
        })
    }
}

impl TexturesFile {
    fn into_atlas(self, base_dir: &Path) -> Result<TextureAtlas, SceneError> {
        let mut atlas = TextureAtlas::new(self.size);
        for TextureEntry { id, source } in self.entries {
            let texture = match source {
                TextureSource::Path(path) => Texture::from_file(base_dir.join(path)),
                TextureSource::Color(color) => Texture::solid(self.size, color),
            };
            texture
                .and_then(|texture| atlas.insert(id, texture))
                .map_err(|source| SceneError::Texture { id, source })?;
        }
        if let Some(id) = self.default {
            atlas.set_default(id);
        }
        Ok(atlas)
    }
}
