//! Test doubles for the decoder
//!
//! `ScriptedDecoder` replays a list of call outcomes, then repeats a fallback
//! outcome, and records what it was handed.

use alloc::vec;
use alloc::vec::Vec;

use motocast_display::Yuv420Frame;

use crate::traits::{DecodeStep, DecoderConfig, DecoderError, VideoDecoder};

/// Error code reported by scripted failures
pub const SCRIPTED_ERROR: DecoderError = DecoderError::Bitstream(-1);

/// Outcome of one scripted decoder call; the value is the bytes consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Pending(usize),
    Frame(usize),
    Error(usize),
    ErrorWithFrame(usize),
}

pub struct ScriptedDecoder {
    script: Vec<Step>,
    fallback: Step,
    calls: usize,
    inputs: Vec<Vec<u8>>,
    input_lens: Vec<usize>,
    width: u16,
    height: u16,
    frame: Vec<u8>,
    pub opened: Option<DecoderConfig>,
    pub closed: bool,
    pub fail_open: bool,
}

impl ScriptedDecoder {
    pub fn scripted(script: Vec<Step>, fallback: Step) -> Self {
        let mut decoder = Self {
            script,
            fallback,
            calls: 0,
            inputs: Vec::new(),
            input_lens: Vec::new(),
            width: 0,
            height: 0,
            frame: Vec::new(),
            opened: None,
            closed: false,
            fail_open: false,
        };
        decoder.set_solid_frame(2, 2, 235, 128, 128);
        decoder
    }

    pub fn repeating(step: Step) -> Self {
        Self::scripted(Vec::new(), step)
    }

    /// Emit uniformly colored frames of the given size
    pub fn with_solid_frame(mut self, width: u16, height: u16, y: u8, u: u8, v: u8) -> Self {
        self.set_solid_frame(width, height, y, u, v);
        self
    }

    pub fn set_solid_frame(&mut self, width: u16, height: u16, y: u8, u: u8, v: u8) {
        let luma = width as usize * height as usize;
        let mut frame = vec![y; luma];
        frame.extend(core::iter::repeat(u).take(luma / 4));
        frame.extend(core::iter::repeat(v).take(luma / 4));
        self.width = width;
        self.height = height;
        self.frame = frame;
    }

    pub fn calls(&self) -> usize {
        self.calls
    }

    pub fn input_lens(&self) -> &[usize] {
        &self.input_lens
    }

    pub fn inputs(&self) -> &[Vec<u8>] {
        &self.inputs
    }

    fn frame(&self) -> Yuv420Frame<'_> {
        Yuv420Frame::from_i420(self.width, self.height, &self.frame).unwrap()
    }
}

impl VideoDecoder for ScriptedDecoder {
    fn open(&mut self, config: &DecoderConfig) -> Result<(), DecoderError> {
        if self.fail_open {
            return Err(DecoderError::Open);
        }
        self.opened = Some(*config);
        Ok(())
    }

    fn process(&mut self, input: &[u8]) -> DecodeStep<'_> {
        let scripted = self.script.get(self.calls).copied();
        let step = scripted.unwrap_or(self.fallback);
        self.calls += 1;
        self.inputs.push(input.to_vec());
        self.input_lens.push(input.len());

        match step {
            Step::Pending(n) => DecodeStep::pending(n),
            Step::Frame(n) => DecodeStep::frame(n, self.frame()),
            Step::Error(n) => DecodeStep::error(n, SCRIPTED_ERROR),
            Step::ErrorWithFrame(n) => DecodeStep {
                consumed: n,
                frame: Some(self.frame()),
                status: Err(SCRIPTED_ERROR),
            },
        }
    }

    fn close(&mut self) {
        self.closed = true;
    }
}
