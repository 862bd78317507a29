//! RGB565 presentation buffer
//!
//! One framebuffer is allocated when the stream starts and every decoded
//! frame is converted into it. Nothing is allocated per frame.

use alloc::vec::Vec;

use crate::backend::{DisplayError, PanelSink};
use crate::color::yuv420_to_rgb565;
use crate::frame::{FrameError, Yuv420Frame};

/// Reusable RGB565 pixel buffer, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    width: u16,
    height: u16,
    pixels: Vec<u16>,
}

fn allocate(width: u16, height: u16) -> Result<Vec<u16>, FrameError> {
    Yuv420Frame::check_dimensions(width, height)?;
    let len = width as usize * height as usize;
    let mut pixels = Vec::new();
    pixels
        .try_reserve_exact(len)
        .map_err(|_| FrameError::OutOfMemory)?;
    pixels.resize(len, 0);
    Ok(pixels)
}

impl Framebuffer {
    /// Allocate a black framebuffer
    ///
    /// Dimensions must be non-zero and even, matching 4:2:0 frames.
    pub fn new(width: u16, height: u16) -> Result<Self, FrameError> {
        Ok(Self {
            width,
            height,
            pixels: allocate(width, height)?,
        })
    }

    /// Width in pixels
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u16 {
        self.height
    }

    /// (width, height) in pixels
    pub fn dimensions(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Pixel data
    pub fn pixels(&self) -> &[u16] {
        &self.pixels
    }

    /// Pixel at (x, y), if inside the buffer
    pub fn pixel(&self, x: u16, y: u16) -> Option<u16> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Fill every pixel with one color
    pub fn fill(&mut self, color: u16) {
        self.pixels.fill(color);
    }

    /// Reallocate for new dimensions
    ///
    /// On failure the current allocation and dimensions are kept.
    pub fn resize(&mut self, width: u16, height: u16) -> Result<(), FrameError> {
        if (width, height) == self.dimensions() {
            return Ok(());
        }
        self.pixels = allocate(width, height)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Convert a decoded frame into this buffer
    pub fn render(&mut self, frame: &Yuv420Frame<'_>) -> Result<(), FrameError> {
        if frame.dimensions() != self.dimensions() {
            return Err(FrameError::DimensionMismatch);
        }
        yuv420_to_rgb565(frame, &mut self.pixels)
    }

    /// Blit the whole buffer to a panel at origin (0, 0)
    pub fn blit<P: PanelSink + ?Sized>(&self, panel: &mut P) -> Result<(), DisplayError> {
        if !panel.is_ready() {
            return Err(DisplayError::NotInitialized);
        }
        panel.draw_bitmap(0, 0, self.width, self.height, &self.pixels)
    }
}
