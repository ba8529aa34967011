//! Per-column wall depth.
//!
//! The wall pass writes one perpendicular distance per screen column; the
//! sprite pass then reads it to hide sprite columns behind nearer walls. Both
//! passes measure depth along the camera's view axis, so the values compare
//! directly.

/// One wall distance per screen column, indexed by column.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthBuffer {
    depths: Vec<f64>,
}

impl DepthBuffer {
    /// Creates a buffer for `width` columns with nothing in front of the camera.
    pub fn new(width: usize) -> Self {
        Self {
            depths: vec![f64::INFINITY; width],
        }
    }

    pub fn resize(&mut self, width: usize) {
        self.depths.clear();
        self.depths.resize(width, f64::INFINITY);
    }

    /// Resets every column to infinitely far.
    pub fn clear(&mut self) {
        self.depths.fill(f64::INFINITY);
    }

    /// Depth at `column`. Columns outside the buffer read as infinitely far.
    #[inline]
    pub fn get(&self, column: usize) -> f64 {
        self.depths.get(column).copied().unwrap_or(f64::INFINITY)
    }

    #[inline]
    pub fn set(&mut self, column: usize, depth: f64) {
        if let Some(slot) = self.depths.get_mut(column) {
            *slot = depth;
        }
    }

    pub fn len(&self) -> usize {
        self.depths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.depths
    }
}
