//! Square texture rasters and the id-indexed atlas walls and sprites draw from.

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

use crate::colors;

/// Edge length of the rasters the demo scenes use.
pub const DEFAULT_TEXTURE_SIZE: u32 = 64;

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("texture must be square, got {width}x{height}")]
    NotSquare { width: u32, height: u32 },
    #[error("texture must be {expected}x{expected}, got {found}x{found}")]
    SizeMismatch { expected: u32, found: u32 },
    #[error("{size}x{size} texture needs {expected} pixels, got {found}")]
    BadLength {
        size: u32,
        expected: usize,
        found: usize,
    },
    #[error("texture size must be non-zero")]
    Empty,
    #[error("{size}x{size} texture is too large")]
    TooLarge { size: u32 },
    #[error("failed to load image: {0}")]
    Image(#[from] image::ImageError),
}

/// A square `size x size` raster for wall and sprite mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    data: Vec<u32>, // Row-major pixels in ARGB format.
    size: u32,
}

/// Texel count of a `size x size` raster. Texel indices are computed in
/// `u32`, so the count must fit one.
fn texel_count(size: u32) -> Result<usize, TextureError> {
    if size == 0 {
        return Err(TextureError::Empty);
    }
    size
        .checked_mul(size)
        .map(|n| n as usize)
        .ok_or(TextureError::TooLarge { size })
}

impl Texture {
    pub fn from_pixels(size: u32, data: Vec<u32>) -> Result<Self, TextureError> {
        let expected = texel_count(size)?;
        if data.len() != expected {
            return Err(TextureError::BadLength {
                size,
                expected,
                found: data.len(),
            });
        }
        Ok(Self { data, size })
    }

    /// Builds a texture by evaluating `f(x, y)` for every texel.
    pub fn from_fn(size: u32, mut f: impl FnMut(u32, u32) -> u32) -> Result<Self, TextureError> {
        texel_count(size)?;
        let data = (0..size)
            .flat_map(|y| (0..size).map(move |x| (x, y)))
            .map(|(x, y)| f(x, y))
            .collect();
        Self::from_pixels(size, data)
    }

    pub fn solid(size: u32, color: u32) -> Result<Self, TextureError> {
        Self::from_pixels(size, vec![color; texel_count(size)?])
    }

    /// Load a texture from an image file (PNG, JPG, etc.). The image must be square.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let img = image::open(path)?.to_rgba8();
        let (width, height) = img.dimensions();
        if width != height {
            return Err(TextureError::NotSquare { width, height });
        }

        let data: Vec<u32> = img
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                colors::pack_argb(a, r, g, b)
            })
            .collect();

        Self::from_pixels(width, data)
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Texel at `(x, y)`, clamped to the raster.
    #[inline]
    pub fn texel(&self, x: u32, y: u32) -> u32 {
        let x = x.min(self.size - 1);
        let y = y.min(self.size - 1);
        self.data[(y * self.size + x) as usize]
    }

    pub fn pixels(&self) -> &[u32] {
        &self.data
    }
}

/// Fixed-size textures looked up by wall or sprite type id.
///
/// Every texture in an atlas has the same edge length. Lookups for an id with
/// no texture go to the designated default id, if one is set.
#[derive(Debug, Clone)]
pub struct TextureAtlas {
    textures: HashMap<u32, Texture>,
    size: u32,
    default_id: Option<u32>,
}

impl Default for TextureAtlas {
    fn default() -> Self {
        Self::new(DEFAULT_TEXTURE_SIZE)
    }
}

impl TextureAtlas {
    pub fn new(size: u32) -> Self {
        Self {
            textures: HashMap::new(),
            size,
            default_id: None,
        }
    }

    /// Adds or replaces the texture for `id`.
    pub fn insert(&mut self, id: u32, texture: Texture) -> Result<(), TextureError> {
        if texture.size() != self.size {
            return Err(TextureError::SizeMismatch {
                expected: self.size,
                found: texture.size(),
            });
        }
        self.textures.insert(id, texture);
        Ok(())
    }

    /// Sets the id whose texture stands in for missing ids.
    pub fn set_default(&mut self, id: u32) {
        self.default_id = Some(id);
    }

    pub fn with_default(mut self, id: u32) -> Self {
        self.set_default(id);
        self
    }

    pub fn default_id(&self) -> Option<u32> {
        self.default_id
    }

    /// Exact lookup, no fallback.
    pub fn get(&self, id: u32) -> Option<&Texture> {
        self.textures.get(&id)
    }

    /// Lookup with fallback to the default id. `None` only if neither exists.
    #[inline]
    pub fn resolve(&self, id: u32) -> Option<&Texture> {
        self.textures
            .get(&id)
            .or_else(|| self.default_id.and_then(|d| self.textures.get(&d)))
    }

    pub fn contains(&self, id: u32) -> bool {
        self.textures.contains_key(&id)
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors;

    #[test]
    fn from_fn_is_row_major() {
        let tex = Texture::from_fn(4, |x, y| y * 4 + x).unwrap();
        assert_eq!(tex.texel(1, 0), 1);
        assert_eq!(tex.texel(0, 1), 4);
        assert_eq!(tex.texel(3, 3), 15);
    }

    #[test]
    fn texel_clamps_to_edge() {
        let tex = Texture::from_fn(2, |x, y| y * 2 + x).unwrap();
        assert_eq!(tex.texel(9, 9), 3);
    }

    #[test]
    fn wrong_length_is_rejected() {
        assert!(matches!(
            Texture::from_pixels(2, vec![0; 3]),
            Err(TextureError::BadLength { expected: 4, found: 3, .. })
        ));
        assert!(matches!(Texture::solid(0, 0), Err(TextureError::Empty)));
    }

    #[test]
    fn oversized_texture_is_rejected() {
        assert!(matches!(
            Texture::solid(70_000, colors::WHITE),
            Err(TextureError::TooLarge { size: 70_000 })
        ));
        assert!(matches!(
            Texture::from_fn(u32::MAX, |_, _| 0),
            Err(TextureError::TooLarge { .. })
        ));
        assert!(matches!(
            Texture::from_pixels(65_536, Vec::new()),
            Err(TextureError::TooLarge { .. })
        ));
    }

    #[test]
    fn atlas_rejects_other_sizes() {
        let mut atlas = TextureAtlas::new(8);
        let err = atlas.insert(1, Texture::solid(4, colors::WHITE).unwrap());
        assert!(matches!(
            err,
            Err(TextureError::SizeMismatch {
                expected: 8,
                found: 4
            })
        ));
        assert!(atlas.is_empty());
    }

    #[test]
    fn missing_id_falls_back_to_default() {
        let mut atlas = TextureAtlas::new(2).with_default(1);
        atlas.insert(1, Texture::solid(2, colors::WHITE).unwrap()).unwrap();

        assert!(atlas.get(7).is_none());
        assert_eq!(atlas.resolve(7).map(|t| t.texel(0, 0)), Some(colors::WHITE));
    }

    #[test]
    fn no_default_resolves_to_none() {
        let atlas = TextureAtlas::new(2);
        assert!(atlas.resolve(3).is_none());
    }
}
