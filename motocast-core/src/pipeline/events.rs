//! Events that drive pipeline state transitions

/// Events raised while a chunk is processed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PipelineEvent {
    // Deframer events
    /// All four length bytes have been read
    HeaderComplete,
    /// Declared number of body bytes has been copied
    BodyComplete,

    // Decoder events
    /// Completed unit handed to the decoder
    DecodeStarted,
    /// Decoder consumed the whole unit and its buffer was released
    UnitConsumed,

    // Recovery events
    /// Framing lost (oversized length or failed allocation)
    Desync,
    /// External reset of the in-flight packet
    Reset,
}

impl PipelineEvent {
    /// Check if this event discards the in-flight packet
    pub fn is_recovery(&self) -> bool {
        matches!(self, PipelineEvent::Desync | PipelineEvent::Reset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovery_events() {
        assert!(PipelineEvent::Desync.is_recovery());
        assert!(PipelineEvent::Reset.is_recovery());
        assert!(!PipelineEvent::HeaderComplete.is_recovery());
        assert!(!PipelineEvent::UnitConsumed.is_recovery());
    }
}
