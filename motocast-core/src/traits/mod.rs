//! Collaborator traits
//!
//! These traits define the interface between the pipeline and the
//! external components it drives.

pub mod decoder;

pub use decoder::{DecodeStep, DecoderConfig, DecoderError, VideoDecoder};
pub use motocast_display::{DisplayError, PanelSink};
