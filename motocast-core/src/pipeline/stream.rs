//! Stream pipeline
//!
//! Feeds transport chunks through the deframer, decodes every completed
//! access unit and presents every frame the decoder yields. Only a failed
//! packet allocation is reported as an error; decoder errors, blit failures
//! and desyncs are counted, logged and recorded in the [`PushReport`].

use heapless::Vec;
use motocast_display::FrameError;
use motocast_protocol::{AccessUnit, BodyAllocator, PacketError, PendingPacket};

use super::events::PipelineEvent;
use super::machine::PipelineState;
use crate::config::{InvalidConfig, StreamConfig};
use crate::traits::{DecoderConfig, DecoderError, PanelSink, VideoDecoder};
use crate::video::{decode, PresentError, Presenter};

/// Faults kept per push report; further faults are only counted
pub const MAX_REPORTED_FAULTS: usize = 8;

/// Errors that stop a pipeline from being built or from continuing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PipelineError {
    /// Stream configuration failed validation
    InvalidConfig(InvalidConfig),
    /// Decoder refused to open
    DecoderOpen(DecoderError),
    /// A packet or framebuffer allocation failed
    ///
    /// Units completed earlier in the same chunk have been decoded and
    /// presented and are counted in [`PipelineStats`].
    OutOfMemory {
        /// Bytes requested
        requested: u32,
        /// Bytes of the chunk consumed before the failing unit's header (0 in `new`)
        consumed: usize,
    },
    /// Framebuffer could not be set up for the configured resolution
    Present(PresentError),
}

impl PipelineError {
    /// Map a presenter setup failure for `config`
    fn from_setup(config: &StreamConfig, e: PresentError) -> Self {
        match e {
            PresentError::OutOfMemory => PipelineError::OutOfMemory {
                requested: (config.pixel_count() * 2) as u32,
                consumed: 0,
            },
            PresentError::Frame(FrameError::ZeroDimensions) => {
                PipelineError::InvalidConfig(InvalidConfig::ZeroDimensions)
            }
            PresentError::Frame(FrameError::OddDimensions) => {
                PipelineError::InvalidConfig(InvalidConfig::OddDimensions)
            }
            other => PipelineError::Present(other),
        }
    }
}

impl From<InvalidConfig> for PipelineError {
    fn from(e: InvalidConfig) -> Self {
        PipelineError::InvalidConfig(e)
    }
}

/// Recoverable problems encountered while processing a chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fault {
    /// Framing lost; the rest of the chunk was dropped
    Desync(PacketError),
    /// Decoder reported an error for part of a unit
    Decoder(DecoderError),
    /// Decoder stopped consuming input; rest of the unit skipped
    Stalled {
        /// Bytes skipped
        abandoned: usize,
    },
    /// Frame dropped instead of shown
    Present(PresentError),
}

/// Result of one [`StreamPipeline::push`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PushReport {
    /// Bytes of the chunk consumed by the deframer
    pub consumed: usize,
    /// Bytes of the chunk discarded after a desync, rejected header included
    pub dropped: usize,
    /// Access units completed and decoded
    pub units: u32,
    /// Frames blitted to the panel
    pub frames_presented: u32,
    /// Whether framing was lost during this chunk
    pub desynced: bool,
    /// First faults encountered, in order
    pub faults: Vec<Fault, MAX_REPORTED_FAULTS>,
    /// Faults beyond [`MAX_REPORTED_FAULTS`]
    pub faults_dropped: u32,
}

impl PushReport {
    fn record(&mut self, fault: Fault) {
        if self.faults.push(fault).is_err() {
            self.faults_dropped += 1;
        }
    }

    /// Check if the chunk was processed without faults
    pub fn is_clean(&self) -> bool {
        self.faults.is_empty() && self.faults_dropped == 0
    }
}

/// Counters over the lifetime of a pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PipelineStats {
    /// Bytes pushed by the transport
    pub bytes_received: u64,
    /// Access units completed
    pub units_completed: u32,
    /// Decoder calls
    pub decoder_steps: u32,
    /// Decoder calls that reported an error
    pub decoder_errors: u32,
    /// Frames blitted to the panel
    pub frames_presented: u32,
    /// Frames dropped before the blit (resolution or format mismatch)
    pub frames_rejected: u32,
    /// Blits refused by the panel
    pub blit_failures: u32,
    /// Framing losses
    pub desyncs: u32,
}

/// One receive → decode → present stream
///
/// Constructed once at stream start. Independent pipelines share nothing,
/// so several streams can run side by side.
pub struct StreamPipeline<D: VideoDecoder, P: PanelSink> {
    config: StreamConfig,
    packet: PendingPacket,
    decoder: D,
    presenter: Presenter,
    panel: P,
    state: PipelineState,
    stats: PipelineStats,
}

impl<D: VideoDecoder, P: PanelSink> StreamPipeline<D, P> {
    /// Validate `config`, allocate the framebuffer and open the decoder
    pub fn new(config: StreamConfig, mut decoder: D, panel: P) -> Result<Self, PipelineError> {
        config.validate()?;

        let presenter = Presenter::new(&config)
            .map_err(|e| PipelineError::from_setup(&config, e))?;

        decoder
            .open(&DecoderConfig::from(&config))
            .map_err(PipelineError::DecoderOpen)?;

        #[cfg(feature = "defmt")]
        defmt::info!(
            "stream pipeline ready: {}x{}, max unit {} bytes",
            config.width,
            config.height,
            config.max_access_unit_len
        );

        Ok(Self {
            config,
            packet: PendingPacket::with_max_len(config.max_access_unit_len),
            decoder,
            presenter,
            panel,
            state: PipelineState::AwaitingHeader,
            stats: PipelineStats::default(),
        })
    }

    /// Stream configuration
    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// Current state
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Lifetime counters
    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    /// The in-flight packet
    pub fn packet(&self) -> &PendingPacket {
        &self.packet
    }

    /// The presenter and its framebuffer
    pub fn presenter(&self) -> &Presenter {
        &self.presenter
    }

    /// The decoder
    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// The panel
    pub fn panel(&self) -> &P {
        &self.panel
    }

    /// Mutable access to the panel
    pub fn panel_mut(&mut self) -> &mut P {
        &mut self.panel
    }

    /// Allocate access unit bodies with `allocate`
    ///
    /// Any partially received unit is discarded.
    pub fn set_body_allocator(&mut self, allocate: BodyAllocator) {
        self.packet = PendingPacket::with_max_len(self.config.max_access_unit_len)
            .with_allocator(allocate);
        self.apply(PipelineEvent::Reset);
    }

    /// Discard any partially received unit
    ///
    /// The wire format has no resynchronization marker, so after a desync
    /// the transport has to restart the stream on a unit boundary and call
    /// this first.
    pub fn reset(&mut self) {
        self.packet.reset();
        self.apply(PipelineEvent::Reset);
    }

    /// Process one chunk from the transport
    ///
    /// Every unit completed by the chunk is decoded and its frames presented
    /// before this returns. Only [`PipelineError::OutOfMemory`] is returned
    /// as an error; the packet is reset in that case and the rest of the
    /// chunk is dropped.
    pub fn push(&mut self, chunk: &[u8]) -> Result<PushReport, PipelineError> {
        debug_assert!(self.state.accepts_bytes());
        let mut report = PushReport::default();
        let mut rest = chunk;
        self.stats.bytes_received += chunk.len() as u64;

        #[cfg(feature = "defmt")]
        defmt::trace!("RX: {} bytes", chunk.len());

        while !rest.is_empty() {
            let had_header = self.packet.declared_len().is_some();

            match self.packet.feed(rest) {
                Ok(used) => {
                    report.consumed += used;
                    rest = &rest[used..];
                }
                Err(PacketError::OutOfMemory { requested }) => {
                    #[cfg(feature = "defmt")]
                    defmt::error!("no memory for {} byte access unit", requested);
                    self.apply(PipelineEvent::Desync);
                    return Err(PipelineError::OutOfMemory {
                        requested,
                        consumed: report.consumed,
                    });
                }
                Err(e) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("framing lost: {:?}, dropping {} bytes", e, rest.len());
                    self.stats.desyncs += 1;
                    report.desynced = true;
                    report.dropped = rest.len();
                    report.record(Fault::Desync(e));
                    self.apply(PipelineEvent::Desync);
                    break;
                }
            }

            if !had_header && self.packet.declared_len().is_some() {
                self.apply(PipelineEvent::HeaderComplete);
            }

            if let Some(unit) = self.packet.take() {
                self.apply(PipelineEvent::BodyComplete);
                self.stats.units_completed += 1;
                report.units += 1;
                self.decode_unit(unit, &mut report);
            }
        }

        Ok(report)
    }

    /// Run the consume-loop over one unit, presenting every frame
    fn decode_unit(&mut self, unit: AccessUnit, report: &mut PushReport) {
        #[cfg(feature = "defmt")]
        defmt::debug!("access unit complete: {} bytes", unit.len());

        self.apply(PipelineEvent::DecodeStarted);
        let mut session = decode(&mut self.decoder, unit);

        loop {
            let errors_before = session.summary().errors;
            let Some(output) = session.step() else {
                break;
            };

            if let Some(frame) = output {
                match self.presenter.present(&frame, &mut self.panel) {
                    Ok(()) => {
                        self.stats.frames_presented += 1;
                        report.frames_presented += 1;
                    }
                    Err(e) => {
                        match e {
                            PresentError::Blit(_) => {
                                #[cfg(feature = "defmt")]
                                defmt::warn!("blit failed: {:?}", e);
                                self.stats.blit_failures += 1;
                            }
                            _ => {
                                #[cfg(feature = "defmt")]
                                defmt::warn!("frame dropped: {:?}", e);
                                self.stats.frames_rejected += 1;
                            }
                        }
                        report.record(Fault::Present(e));
                    }
                }
            }

            let summary = session.summary();
            if summary.errors > errors_before {
                if let Some(e) = summary.last_error {
                    report.record(Fault::Decoder(e));
                }
            }
        }

        let summary = session.summary();
        self.stats.decoder_steps += summary.steps;
        self.stats.decoder_errors += summary.errors;
        if summary.abandoned_bytes > 0 {
            report.record(Fault::Stalled {
                abandoned: summary.abandoned_bytes,
            });
        }

        self.apply(PipelineEvent::UnitConsumed);
    }

    fn apply(&mut self, event: PipelineEvent) {
        #[cfg(feature = "defmt")]
        if event.is_recovery() {
            defmt::debug!("{:?} while {:?}", event, self.state);
        }
        self.state = self.state.transition(event);
    }

    /// Close the decoder and hand back the collaborators
    pub fn shutdown(mut self) -> (D, P) {
        self.decoder.close();
        (self.decoder, self.panel)
    }
}
