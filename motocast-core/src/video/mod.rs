//! Decode and presentation stages
//!
//! - [`decode`]: consume-loop driving the decoder over one access unit
//! - [`present`]: YUV to RGB565 conversion into the framebuffer and blit

pub mod decode;
pub mod present;

pub use decode::{decode, DecodeSession, DecodeSummary, MAX_FLUSH_STEPS, MAX_STALLED_STEPS};
pub use present::{PresentError, Presenter};
