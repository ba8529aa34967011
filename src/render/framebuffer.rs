//! Frame buffer abstraction for 2D pixel access.
//!
//! Provides a bounds-checked view into a row-major color buffer.

use std::ops::Range;

/// A view into a color buffer.
///
/// Wraps a 1D slice with width/height metadata to enable safe 2D pixel access.
/// This is a borrowed view, not an owning type - it's meant to be created
/// temporarily when you need to pass the buffer + dimensions together.
pub struct FrameBuffer<'a> {
    color_buffer: &'a mut [u32],
    width: usize,
    height: usize,
}

impl<'a> FrameBuffer<'a> {
    /// Create a new FrameBuffer view from a buffer slice and dimensions.
    pub fn new(color_buffer: &'a mut [u32], width: usize, height: usize) -> Self {
        debug_assert_eq!(
            color_buffer.len(),
            width * height,
            "Color buffer size doesn't match dimensions"
        );
        Self {
            color_buffer,
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Set a pixel at (x, y). Silently ignores out-of-bounds coordinates.
    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < self.width && y < self.height {
            self.color_buffer[y * self.width + x] = color;
        }
    }

    /// Get the color at (x, y), or None if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.color_buffer[y * self.width + x])
        } else {
            None
        }
    }

    /// Fill whole rows with a single color. Rows past the bottom are skipped.
    pub fn fill_rows(&mut self, rows: Range<usize>, color: u32) {
        let start = rows.start.min(self.height) * self.width;
        let end = rows.end.min(self.height) * self.width;
        if start < end {
            self.color_buffer[start..end].fill(color);
        }
    }

    /// The raw rows, for row-parallel passes.
    pub fn rows_mut(&mut self) -> &mut [u32] {
        &mut *self.color_buffer
    }
}
