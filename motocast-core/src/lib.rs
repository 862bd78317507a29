//! Board-agnostic core logic for the Motocast receiver
//!
//! This crate contains the stream pipeline that does not depend on a
//! specific transport, decoder or panel:
//!
//! - Decoder trait and the per-unit consume-loop
//! - Frame presentation into a single reused framebuffer
//! - Stream pipeline tying deframer, decoder and panel together
//! - Stream configuration and its TOML/postcard loaders
//!
//! The transport pushes raw chunks into [`StreamPipeline::push`]; everything
//! else happens synchronously inside that call.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod config;
pub mod pipeline;
pub mod traits;
pub mod video;

#[cfg(test)]
mod testing;

pub use config::{ResolutionPolicy, StreamConfig};
pub use pipeline::{Fault, PipelineError, PipelineStats, PushReport, StreamPipeline};
pub use traits::{DecodeStep, DecoderConfig, DecoderError, VideoDecoder};
