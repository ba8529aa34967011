//! Owned frame storage.
//!
//! Provides the [`Renderer`] struct which owns the color buffer and the
//! per-column depth buffer, and hands out borrowed views of them to the wall
//! and sprite passes.

use super::depth::DepthBuffer;
use super::framebuffer::FrameBuffer;
use crate::colors;

pub struct Renderer {
    color_buffer: Vec<u32>,
    depth_buffer: DepthBuffer,
    width: usize,
    height: usize,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            color_buffer: vec![colors::BLACK; width * height],
            depth_buffer: DepthBuffer::new(width),
            width,
            height,
        }
    }

    /// Reallocates both buffers for a new viewport. No-op if the size is unchanged.
    pub fn resize(&mut self, width: usize, height: usize) {
        if width == self.width && height == self.height {
            return;
        }
        tracing::debug!(width, height, "resizing frame buffers");
        self.color_buffer = vec![colors::BLACK; width * height];
        self.depth_buffer.resize(width);
        self.width = width;
        self.height = height;
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Fill the top half with `ceiling` and the bottom half with `floor`, and
    /// reset the depth buffer.
    pub fn clear(&mut self, ceiling: u32, floor: u32) {
        let horizon = self.height / 2;
        let mut fb = FrameBuffer::new(&mut self.color_buffer, self.width, self.height);
        fb.fill_rows(0..horizon, ceiling);
        fb.fill_rows(horizon..self.height, floor);
        self.depth_buffer.clear();
    }

    pub fn pixels(&self) -> &[u32] {
        &self.color_buffer
    }

    pub fn depth(&self) -> &DepthBuffer {
        &self.depth_buffer
    }

    pub fn depth_mut(&mut self) -> &mut DepthBuffer {
        &mut self.depth_buffer
    }

    /// The color buffer as bytes (ARGB8888, native endian).
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: u32 has no padding and a stricter alignment than u8; the
        // byte slice covers exactly the same allocation.
        unsafe {
            std::slice::from_raw_parts(
                self.color_buffer.as_ptr() as *const u8,
                self.color_buffer.len() * 4,
            )
        }
    }

    /// Get a mutable FrameBuffer view into the color buffer.
    pub fn as_framebuffer(&mut self) -> FrameBuffer<'_> {
        FrameBuffer::new(&mut self.color_buffer, self.width, self.height)
    }

    /// Borrow the color view and the depth buffer at the same time.
    pub fn split_mut(&mut self) -> (FrameBuffer<'_>, &mut DepthBuffer) {
        (
            FrameBuffer::new(&mut self.color_buffer, self.width, self.height),
            &mut self.depth_buffer,
        )
    }
}
