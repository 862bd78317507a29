//! H.264 decoder trait
//!
//! The decoder itself is an opaque component. The pipeline only relies on
//! this call contract: a `process` call is handed the remaining bytes of an
//! access unit, reports how many it consumed, and may or may not produce a
//! frame. Decoders are free to buffer internally across calls.

use motocast_display::Yuv420Frame;

use crate::config::{RawPixelFormat, StreamConfig};

/// Errors reported by a decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecoderError {
    /// Decoder could not be created or opened
    Open,
    /// Bitstream could not be decoded (decoder-specific code)
    Bitstream(i32),
    /// Stream uses a feature the decoder does not support
    Unsupported,
}

/// Settings passed to [`VideoDecoder::open`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecoderConfig {
    /// Raw output format
    pub pixel_format: RawPixelFormat,
    /// Expected frame width
    pub width: u16,
    /// Expected frame height
    pub height: u16,
}

impl From<&StreamConfig> for DecoderConfig {
    fn from(config: &StreamConfig) -> Self {
        Self {
            pixel_format: config.pixel_format,
            width: config.width,
            height: config.height,
        }
    }
}

/// Outcome of one decoder call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeStep<'a> {
    /// Bytes of the input taken by the decoder, on success or error
    pub consumed: usize,
    /// Frame produced by this call, borrowed from decoder storage
    pub frame: Option<Yuv420Frame<'a>>,
    /// Error status of this call
    pub status: Result<(), DecoderError>,
}

impl<'a> DecodeStep<'a> {
    /// Bytes consumed, no frame yet
    pub fn pending(consumed: usize) -> Self {
        Self {
            consumed,
            frame: None,
            status: Ok(()),
        }
    }

    /// Bytes consumed and a frame produced
    pub fn frame(consumed: usize, frame: Yuv420Frame<'a>) -> Self {
        Self {
            consumed,
            frame: Some(frame),
            status: Ok(()),
        }
    }

    /// Bytes consumed with an error
    pub fn error(consumed: usize, error: DecoderError) -> Self {
        Self {
            consumed,
            frame: None,
            status: Err(error),
        }
    }
}

/// H.264 decoder driven by the pipeline
///
/// The frame returned from [`process`](VideoDecoder::process) borrows the
/// decoder, so it must be presented before the decoder is called again.
pub trait VideoDecoder {
    /// Prepare the decoder for a stream
    fn open(&mut self, config: &DecoderConfig) -> Result<(), DecoderError>;

    /// Decode from the start of `input`
    fn process(&mut self, input: &[u8]) -> DecodeStep<'_>;

    /// Release decoder resources
    fn close(&mut self);
}

impl<T: VideoDecoder + ?Sized> VideoDecoder for &mut T {
    fn open(&mut self, config: &DecoderConfig) -> Result<(), DecoderError> {
        (**self).open(config)
    }

    fn process(&mut self, input: &[u8]) -> DecodeStep<'_> {
        (**self).process(input)
    }

    fn close(&mut self) {
        (**self).close()
    }
}
