//! Decoder consume-loop
//!
//! One completed access unit is handed to the decoder through a shrinking
//! cursor. A single call may consume only part of the input, may produce a
//! frame or not, and may fail; the cursor always advances by what the decoder
//! reports as consumed, since those bytes are already in its internal state.

use motocast_display::Yuv420Frame;
use motocast_protocol::AccessUnit;

use crate::traits::{DecoderError, VideoDecoder};

/// Consecutive calls that neither consume input nor produce a frame before
/// the rest of the access unit is abandoned
pub const MAX_STALLED_STEPS: u8 = 4;

/// Consecutive calls that consume no input, frames or not, before the rest
/// of the access unit is abandoned
pub const MAX_FLUSH_STEPS: u8 = 16;

/// Counters for one decoded access unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecodeSummary {
    /// Decoder calls made
    pub steps: u32,
    /// Calls that reported an error
    pub errors: u32,
    /// Frames produced
    pub frames: u32,
    /// Bytes skipped because the decoder stopped consuming input
    pub abandoned_bytes: usize,
    /// Most recent decoder error
    pub last_error: Option<DecoderError>,
}

/// Decoding of a single access unit in progress
///
/// Frames are produced one decoder call at a time and borrow the decoder,
/// so each one must be used before the session is advanced. The access unit
/// is owned by the session and released once it is fully consumed.
pub struct DecodeSession<'d, D: ?Sized> {
    decoder: &'d mut D,
    unit: AccessUnit,
    offset: usize,
    stalled: u8,
    flushing: u8,
    summary: DecodeSummary,
}

/// Start decoding `unit`
///
/// The unit is moved into the session, so its bytes can only be decoded once.
pub fn decode<D: VideoDecoder + ?Sized>(decoder: &mut D, unit: AccessUnit) -> DecodeSession<'_, D> {
    DecodeSession {
        decoder,
        unit,
        offset: 0,
        stalled: 0,
        flushing: 0,
        summary: DecodeSummary::default(),
    }
}

impl<'d, D: VideoDecoder + ?Sized> DecodeSession<'d, D> {
    /// Bytes of the access unit not yet consumed
    pub fn remaining(&self) -> usize {
        self.unit.len() - self.offset
    }

    /// Whether the whole unit has been consumed
    pub fn is_finished(&self) -> bool {
        self.remaining() == 0
    }

    /// Counters so far
    pub fn summary(&self) -> DecodeSummary {
        self.summary
    }

    /// Make one decoder call
    ///
    /// Returns `None` once the access unit is exhausted, otherwise
    /// `Some(frame)` where `frame` is the output of this call, if any.
    pub fn step(&mut self) -> Option<Option<Yuv420Frame<'_>>> {
        let remaining = self.remaining();
        if remaining == 0 {
            // Release the unit buffer as soon as it is consumed
            self.unit = AccessUnit::default();
            self.offset = 0;
            return None;
        }

        let step = self.decoder.process(&self.unit.as_bytes()[self.offset..]);
        let consumed = step.consumed.min(remaining);
        self.summary.steps += 1;

        if let Err(e) = step.status {
            #[cfg(feature = "defmt")]
            defmt::warn!("decoder error at offset {}: {:?}", self.offset, e);
            self.summary.errors += 1;
            self.summary.last_error = Some(e);
        }
        self.offset += consumed;

        let frame = match step.status {
            Ok(()) => step.frame,
            Err(_) => None,
        };

        if consumed == 0 {
            self.flushing += 1;
            if frame.is_none() {
                self.stalled += 1;
            } else {
                self.stalled = 0;
            }
        } else {
            self.flushing = 0;
            self.stalled = 0;
        }
        if self.stalled >= MAX_STALLED_STEPS || self.flushing >= MAX_FLUSH_STEPS {
            Self::abandon(&self.unit, &mut self.offset, &mut self.summary);
        }

        if frame.is_some() {
            self.summary.frames += 1;
        }
        Some(frame)
    }

    // Takes disjoint fields so it can run while a frame still borrows the decoder
    fn abandon(unit: &AccessUnit, offset: &mut usize, summary: &mut DecodeSummary) {
        let abandoned = unit.len() - *offset;
        #[cfg(feature = "defmt")]
        defmt::warn!("decoder stalled, abandoning {} bytes", abandoned);
        summary.abandoned_bytes = abandoned;
        *offset = unit.len();
    }

    /// Drive the unit to completion, handing every frame to `on_frame`
    pub fn for_each_frame<F>(mut self, mut on_frame: F) -> DecodeSummary
    where
        F: FnMut(&Yuv420Frame<'_>),
    {
        while let Some(output) = self.step() {
            if let Some(frame) = output {
                on_frame(&frame);
            }
        }
        self.summary
    }

    /// Drive the unit to completion, discarding frames
    pub fn finish(self) -> DecodeSummary {
        self.for_each_frame(|_| {})
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedDecoder, Step};
    use alloc::vec;

    fn unit(len: usize) -> AccessUnit {
        AccessUnit::new((0..len).map(|i| i as u8).collect())
    }

    #[test]
    fn test_one_byte_per_call_runs_n_times() {
        let mut decoder = ScriptedDecoder::repeating(Step::Pending(1));

        let summary = decode(&mut decoder, unit(7)).finish();

        assert_eq!(decoder.calls(), 7);
        assert_eq!(summary.steps, 7);
        assert_eq!(summary.frames, 0);
        // Each call sees the cursor advanced by one
        assert_eq!(decoder.input_lens(), &[7, 6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_empty_unit_never_calls_decoder() {
        let mut decoder = ScriptedDecoder::repeating(Step::Pending(1));

        let summary = decode(&mut decoder, AccessUnit::default()).finish();

        assert_eq!(decoder.calls(), 0);
        assert_eq!(summary, DecodeSummary::default());
    }

    #[test]
    fn test_multiple_frames_per_unit() {
        let mut decoder = ScriptedDecoder::repeating(Step::Frame(3));

        let mut frames = 0;
        let summary = decode(&mut decoder, unit(9)).for_each_frame(|frame| {
            assert_eq!(frame.dimensions(), (2, 2));
            frames += 1;
        });

        assert_eq!(frames, 3);
        assert_eq!(summary.frames, 3);
    }

    #[test]
    fn test_errors_do_not_stop_the_loop() {
        let mut decoder = ScriptedDecoder::scripted(
            vec![Step::Error(2), Step::Pending(2), Step::Frame(2)],
            Step::Pending(1),
        );

        let mut frames = 0;
        let summary = decode(&mut decoder, unit(6)).for_each_frame(|_| frames += 1);

        assert_eq!(frames, 1);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.last_error, Some(DecoderError::Bitstream(-1)));
        assert_eq!(decoder.input_lens(), &[6, 4, 2]);
    }

    #[test]
    fn test_frame_reported_with_error_is_dropped() {
        let mut decoder =
            ScriptedDecoder::scripted(vec![Step::ErrorWithFrame(4)], Step::Pending(1));

        let mut frames = 0;
        let summary = decode(&mut decoder, unit(4)).for_each_frame(|_| frames += 1);

        assert_eq!(frames, 0);
        assert_eq!(summary.errors, 1);
    }

    #[test]
    fn test_overreported_consumption_is_clamped() {
        let mut decoder = ScriptedDecoder::repeating(Step::Pending(100));

        let summary = decode(&mut decoder, unit(10)).finish();

        assert_eq!(decoder.calls(), 1);
        assert_eq!(summary.abandoned_bytes, 0);
    }

    #[test]
    fn test_stalled_decoder_is_abandoned() {
        let mut decoder = ScriptedDecoder::scripted(vec![Step::Pending(2)], Step::Pending(0));

        let summary = decode(&mut decoder, unit(10)).finish();

        assert_eq!(decoder.calls(), 1 + MAX_STALLED_STEPS as usize);
        assert_eq!(summary.abandoned_bytes, 8);
    }

    #[test]
    fn test_zero_consumption_with_frame_is_progress() {
        // Flushing a buffered frame without taking input is allowed
        let mut decoder = ScriptedDecoder::scripted(
            vec![
                Step::Frame(0),
                Step::Frame(0),
                Step::Frame(0),
                Step::Frame(0),
            ],
            Step::Pending(5),
        );

        let summary = decode(&mut decoder, unit(5)).finish();

        assert_eq!(summary.frames, 4);
        assert_eq!(summary.abandoned_bytes, 0);
        assert_eq!(decoder.calls(), 5);
    }

    #[test]
    fn test_endless_flush_is_abandoned() {
        let mut decoder = ScriptedDecoder::repeating(Step::Frame(0));

        let mut frames = 0;
        let summary = decode(&mut decoder, unit(3)).for_each_frame(|_| frames += 1);

        assert_eq!(decoder.calls(), MAX_FLUSH_STEPS as usize);
        assert_eq!(frames, MAX_FLUSH_STEPS as u32);
        assert_eq!(summary.abandoned_bytes, 3);
    }

    #[test]
    fn test_consumption_resets_flush_bound() {
        // Interleaved flushes stay under the bound as long as input is taken
        let mut script = vec![Step::Frame(0); MAX_FLUSH_STEPS as usize - 1];
        script.push(Step::Pending(1));
        script.extend(vec![Step::Frame(0); MAX_FLUSH_STEPS as usize - 1]);
        let mut decoder = ScriptedDecoder::scripted(script, Step::Pending(1));

        let summary = decode(&mut decoder, unit(2)).finish();

        assert_eq!(summary.abandoned_bytes, 0);
        assert_eq!(summary.frames, 2 * (MAX_FLUSH_STEPS as u32 - 1));
        assert_eq!(decoder.calls(), 2 * MAX_FLUSH_STEPS as usize);
    }

    #[test]
    fn test_step_by_step() {
        let mut decoder = ScriptedDecoder::scripted(vec![Step::Pending(1)], Step::Frame(1));
        let mut session = decode(&mut decoder, unit(2));

        assert!(matches!(session.step(), Some(None)));
        assert_eq!(session.remaining(), 1);
        assert!(matches!(session.step(), Some(Some(_))));
        assert!(session.is_finished());
        assert!(session.step().is_none());
    }
}
