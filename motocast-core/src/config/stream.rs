//! Stream configuration
//!
//! The negotiated stream resolution and limits. The receiver has no way to
//! renegotiate them mid-stream, see [`ResolutionPolicy`].

use motocast_protocol::DEFAULT_MAX_ACCESS_UNIT_LEN;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Current configuration format version
pub const CONFIG_VERSION: u8 = 1;

/// Default stream width in pixels
pub const DEFAULT_WIDTH: u16 = 320;

/// Default stream height in pixels
pub const DEFAULT_HEIGHT: u16 = 240;

/// Raw pixel format requested from the decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RawPixelFormat {
    /// 4:2:0 planar: Y plane, then U, then V
    #[default]
    I420,
}

/// What to do when a decoded frame does not match the configured resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ResolutionPolicy {
    /// Drop the frame and keep the configured resolution
    #[default]
    Reject,
    /// Reallocate the framebuffer for the new resolution
    Reallocate,
}

/// Reasons a configuration is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InvalidConfig {
    /// Width or height is zero
    ZeroDimensions,
    /// Width or height is odd
    OddDimensions,
    /// Maximum access unit length is zero
    ZeroMaxAccessUnit,
}

/// Stream configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StreamConfig {
    /// Config format version
    pub version: u8,
    /// Frame width in pixels
    pub width: u16,
    /// Frame height in pixels
    pub height: u16,
    /// Largest access unit accepted from the wire, in bytes
    pub max_access_unit_len: u32,
    /// Decoder output format
    pub pixel_format: RawPixelFormat,
    /// Handling of frames with a different resolution
    pub on_resolution_change: ResolutionPolicy,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            max_access_unit_len: DEFAULT_MAX_ACCESS_UNIT_LEN,
            pixel_format: RawPixelFormat::I420,
            on_resolution_change: ResolutionPolicy::Reject,
        }
    }
}

impl StreamConfig {
    /// Create a config for the given resolution with default limits
    pub fn with_resolution(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Check dimensions and limits
    pub fn validate(&self) -> Result<(), InvalidConfig> {
        if self.width == 0 || self.height == 0 {
            return Err(InvalidConfig::ZeroDimensions);
        }
        // 4:2:0 chroma planes need even dimensions
        if self.width % 2 != 0 || self.height % 2 != 0 {
            return Err(InvalidConfig::OddDimensions);
        }
        if self.max_access_unit_len == 0 {
            return Err(InvalidConfig::ZeroMaxAccessUnit);
        }
        Ok(())
    }

    /// Number of pixels in one frame
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = StreamConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!((config.width, config.height), (320, 240));
        assert_eq!(config.pixel_count(), 76_800);
    }

    #[test]
    fn test_rejects_odd_dimensions() {
        let config = StreamConfig::with_resolution(321, 240);
        assert_eq!(config.validate(), Err(InvalidConfig::OddDimensions));
    }

    #[test]
    fn test_rejects_zero_dimensions() {
        let config = StreamConfig::with_resolution(0, 240);
        assert_eq!(config.validate(), Err(InvalidConfig::ZeroDimensions));
    }

    #[test]
    fn test_rejects_zero_max_access_unit() {
        let config = StreamConfig {
            max_access_unit_len: 0,
            ..StreamConfig::default()
        };
        assert_eq!(config.validate(), Err(InvalidConfig::ZeroMaxAccessUnit));
    }
}
