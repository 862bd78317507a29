//! Panel sink trait
//!
//! Defines the interface for panels the decoded video is blitted to.

/// Panel errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with the panel driver
    Communication,
    /// Region lies outside the panel
    InvalidRegion,
    /// Panel not initialized
    NotInitialized,
    /// Pixel buffer length does not match the region
    BufferSize,
}

/// Write-only bitmap panel
///
/// Provides a hardware-agnostic blit for RGB565 panels. Implementations
/// handle bus specifics (parallel RGB, SPI, DSI) and decide themselves
/// whether to block or drop under back-pressure.
pub trait PanelSink {
    /// Copy an RGB565 bitmap into the panel
    ///
    /// - `x`, `y`: Top-left corner of the region in pixels
    /// - `width`, `height`: Region size in pixels
    /// - `pixels`: `width * height` pixels, row-major
    fn draw_bitmap(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        pixels: &[u16],
    ) -> Result<(), DisplayError>;

    /// Get pixel dimensions (width, height)
    fn pixel_dimensions(&self) -> (u16, u16);

    /// Check if the panel is ready to accept bitmaps
    fn is_ready(&self) -> bool {
        true
    }
}

/// Validate a blit region against a panel and its pixel buffer
pub fn check_region(
    panel: (u16, u16),
    x: u16,
    y: u16,
    width: u16,
    height: u16,
    pixels: &[u16],
) -> Result<(), DisplayError> {
    let (panel_w, panel_h) = panel;
    if x as u32 + width as u32 > panel_w as u32 || y as u32 + height as u32 > panel_h as u32 {
        return Err(DisplayError::InvalidRegion);
    }
    if pixels.len() != width as usize * height as usize {
        return Err(DisplayError::BufferSize);
    }
    Ok(())
}

impl<T: PanelSink + ?Sized> PanelSink for &mut T {
    fn draw_bitmap(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        pixels: &[u16],
    ) -> Result<(), DisplayError> {
        (**self).draw_bitmap(x, y, width, height, pixels)
    }

    fn pixel_dimensions(&self) -> (u16, u16) {
        (**self).pixel_dimensions()
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }
}
