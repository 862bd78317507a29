//! Frame presentation
//!
//! Converts each decoded frame into the single reused framebuffer and blits
//! it to the panel at origin (0, 0).

use motocast_display::{DisplayError, FrameError, Framebuffer, PanelSink, Yuv420Frame};

use crate::config::{ResolutionPolicy, StreamConfig};

/// Errors while presenting a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PresentError {
    /// Frame size differs from the stream resolution and the policy rejects it
    ResolutionMismatch {
        /// Configured (width, height)
        expected: (u16, u16),
        /// Decoded (width, height)
        found: (u16, u16),
    },
    /// Panel refused the blit
    Blit(DisplayError),
    /// Frame could not be converted
    Frame(FrameError),
    /// Framebuffer could not be (re)allocated
    OutOfMemory,
}

impl From<FrameError> for PresentError {
    fn from(e: FrameError) -> Self {
        match e {
            FrameError::OutOfMemory => PresentError::OutOfMemory,
            other => PresentError::Frame(other),
        }
    }
}

impl From<DisplayError> for PresentError {
    fn from(e: DisplayError) -> Self {
        PresentError::Blit(e)
    }
}

/// Owner of the presentation framebuffer
#[derive(Debug, Clone)]
pub struct Presenter {
    framebuffer: Framebuffer,
    policy: ResolutionPolicy,
}

impl Presenter {
    /// Allocate the framebuffer for the configured resolution
    pub fn new(config: &StreamConfig) -> Result<Self, PresentError> {
        Ok(Self {
            framebuffer: Framebuffer::new(config.width, config.height)?,
            policy: config.on_resolution_change,
        })
    }

    /// The presentation framebuffer
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// Convert `frame` and blit it to `panel`
    ///
    /// A failed blit leaves the converted frame in the framebuffer; the next
    /// frame overwrites it.
    pub fn present<P: PanelSink + ?Sized>(
        &mut self,
        frame: &Yuv420Frame<'_>,
        panel: &mut P,
    ) -> Result<(), PresentError> {
        let found = frame.dimensions();
        let expected = self.framebuffer.dimensions();
        if found != expected {
            match self.policy {
                ResolutionPolicy::Reject => {
                    return Err(PresentError::ResolutionMismatch { expected, found });
                }
                ResolutionPolicy::Reallocate => {
                    #[cfg(feature = "defmt")]
                    defmt::info!(
                        "resolution change {}x{} -> {}x{}",
                        expected.0,
                        expected.1,
                        found.0,
                        found.1
                    );
                    self.framebuffer.resize(found.0, found.1)?;
                }
            }
        }

        self.framebuffer.render(frame)?;
        self.framebuffer.blit(panel)?;
        Ok(())
    }
}
