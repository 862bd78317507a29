//! Receive → decode → present pipeline
//!
//! [`StreamPipeline`] owns every buffer of one stream: the in-flight packet,
//! the decoder, the framebuffer and the panel. All work for a chunk happens
//! synchronously inside [`StreamPipeline::push`] on the caller's context.

pub mod events;
pub mod machine;
pub mod stream;

pub use events::PipelineEvent;
pub use machine::PipelineState;
pub use stream::{
    Fault, PipelineError, PipelineStats, PushReport, StreamPipeline, MAX_REPORTED_FAULTS,
};
