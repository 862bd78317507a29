//! Display side of the Motocast receiver
//!
//! This crate provides:
//! - `PanelSink` trait for write-only bitmap panels (RGB LCD, SPI TFT, etc.)
//! - `Yuv420Frame`, a borrowed view of a decoder's 4:2:0 planar output
//! - BT.601 YUV to RGB565 conversion
//! - `Framebuffer`, the reusable RGB565 presentation buffer
//! - `MemoryPanel`, an in-RAM panel for host rendering and tests
//!
//! # Architecture
//!
//! The decoder hands out planar YUV frames. They are converted into a single
//! `Framebuffer` that is reused for every frame, and the framebuffer is then
//! blitted to whatever implements `PanelSink`. Panels are treated as
//! synchronous sinks: a blit either completes or fails before the
//! framebuffer is overwritten again.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod backend;
pub mod color;
pub mod frame;
pub mod framebuffer;
pub mod memory;

// Re-export key types
pub use backend::{DisplayError, PanelSink};
pub use color::{yuv420_to_rgb565, yuv_to_rgb565};
pub use frame::{FrameError, Yuv420Frame};
pub use framebuffer::Framebuffer;
pub use memory::MemoryPanel;
