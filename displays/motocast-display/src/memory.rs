//! In-memory panel
//!
//! A `PanelSink` backed by a plain RGB565 buffer. Useful for rendering on the
//! host and for exercising the pipeline without hardware.

use alloc::vec;
use alloc::vec::Vec;

use crate::backend::{check_region, DisplayError, PanelSink};

/// RGB565 panel living in RAM
#[derive(Debug, Clone)]
pub struct MemoryPanel {
    width: u16,
    height: u16,
    pixels: Vec<u16>,
    ready: bool,
    blits: u32,
    /// Number of upcoming blits that fail with `Communication`
    failures_pending: u32,
}

impl MemoryPanel {
    /// Create a black panel
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
            ready: true,
            blits: 0,
            failures_pending: 0,
        }
    }

    /// Panel contents, row-major
    pub fn pixels(&self) -> &[u16] {
        &self.pixels
    }

    /// Pixel at (x, y), if on the panel
    pub fn pixel(&self, x: u16, y: u16) -> Option<u16> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Number of successful blits
    pub fn blit_count(&self) -> u32 {
        self.blits
    }

    /// Make the next `count` blits fail with [`DisplayError::Communication`]
    pub fn fail_next(&mut self, count: u32) {
        self.failures_pending = count;
    }

    /// Mark the panel ready or not ready
    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }
}

impl PanelSink for MemoryPanel {
    fn draw_bitmap(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        pixels: &[u16],
    ) -> Result<(), DisplayError> {
        if !self.ready {
            return Err(DisplayError::NotInitialized);
        }
        if self.failures_pending > 0 {
            self.failures_pending -= 1;
            return Err(DisplayError::Communication);
        }
        check_region(self.pixel_dimensions(), x, y, width, height, pixels)?;

        let stride = self.width as usize;
        let width = (width as usize).max(1);
        for (row, src) in pixels.chunks_exact(width).enumerate() {
            let start = (y as usize + row) * stride + x as usize;
            self.pixels[start..start + width].copy_from_slice(src);
        }

        self.blits += 1;
        Ok(())
    }

    fn pixel_dimensions(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    fn is_ready(&self) -> bool {
        self.ready
    }
}
