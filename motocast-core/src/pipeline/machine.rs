//! Pipeline state machine
//!
//! Tracks where the pipeline is in the
//! header → body → decode → header cycle. There is no terminal state; the
//! cycle repeats for the lifetime of the stream.

use super::events::PipelineEvent;

/// Pipeline states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PipelineState {
    /// Waiting for the four length bytes of the next unit
    #[default]
    AwaitingHeader,
    /// Length known, copying body bytes
    AccumulatingBody,
    /// Unit complete, not yet handed to the decoder
    ReadyToDecode,
    /// Decoder consume-loop running, emitting 0..N frames
    Decoding,
}

impl PipelineState {
    /// Check if this state accepts stream bytes
    pub fn accepts_bytes(&self) -> bool {
        matches!(
            self,
            PipelineState::AwaitingHeader | PipelineState::AccumulatingBody
        )
    }

    /// Process an event and return the next state
    pub fn transition(self, event: PipelineEvent) -> Self {
        use PipelineEvent::*;
        use PipelineState::*;

        match (self, event) {
            (AwaitingHeader, HeaderComplete) => AccumulatingBody,
            (AccumulatingBody, BodyComplete) => ReadyToDecode,
            (ReadyToDecode, DecodeStarted) => Decoding,
            (Decoding, UnitConsumed) => AwaitingHeader,

            // Recovery from anywhere
            (_, Desync) | (_, Reset) => AwaitingHeader,

            // Default: stay in current state
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        assert_eq!(PipelineState::default(), PipelineState::AwaitingHeader);
    }

    #[test]
    fn test_full_cycle() {
        let state = PipelineState::AwaitingHeader;

        let body = state.transition(PipelineEvent::HeaderComplete);
        assert_eq!(body, PipelineState::AccumulatingBody);

        let ready = body.transition(PipelineEvent::BodyComplete);
        assert_eq!(ready, PipelineState::ReadyToDecode);

        let decoding = ready.transition(PipelineEvent::DecodeStarted);
        assert_eq!(decoding, PipelineState::Decoding);

        let next = decoding.transition(PipelineEvent::UnitConsumed);
        assert_eq!(next, PipelineState::AwaitingHeader);
    }

    #[test]
    fn test_recovery_from_any_state() {
        let states = [
            PipelineState::AwaitingHeader,
            PipelineState::AccumulatingBody,
            PipelineState::ReadyToDecode,
            PipelineState::Decoding,
        ];

        for state in states {
            assert_eq!(
                state.transition(PipelineEvent::Desync),
                PipelineState::AwaitingHeader
            );
            assert_eq!(
                state.transition(PipelineEvent::Reset),
                PipelineState::AwaitingHeader
            );
        }
    }

    #[test]
    fn test_out_of_order_events_are_ignored() {
        let state = PipelineState::AwaitingHeader;
        assert_eq!(state.transition(PipelineEvent::BodyComplete), state);
        assert_eq!(state.transition(PipelineEvent::UnitConsumed), state);

        let decoding = PipelineState::Decoding;
        assert_eq!(decoding.transition(PipelineEvent::HeaderComplete), decoding);
    }

    #[test]
    fn test_accepts_bytes() {
        assert!(PipelineState::AwaitingHeader.accepts_bytes());
        assert!(PipelineState::AccumulatingBody.accepts_bytes());
        assert!(!PipelineState::ReadyToDecode.accepts_bytes());
        assert!(!PipelineState::Decoding.accepts_bytes());
    }

    #[test]
    fn test_recovery_events() {
        assert!(PipelineEvent::Desync.is_recovery());
        assert!(PipelineEvent::Reset.is_recovery());
        assert!(!PipelineEvent::UnitConsumed.is_recovery());
    }
}
