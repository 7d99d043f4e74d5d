//! Error types for reader bring-up and self-test.
//!
//! Everything here is fatal to the current attempt. Version mismatches and
//! self-test failures reproduce deterministically (wrong chip, broken
//! wiring, damaged silicon), so nothing is retried automatically; the
//! caller decides whether to start a fresh bring-up.

use latchkey_hardware::BusError;

use crate::bringup::BringUpState;

/// Errors during the reset / version-check sequence.
#[derive(Debug, thiserror::Error)]
pub enum BringUpError {
    /// The version register returned an unexpected value.
    #[error("Version check failed: got {got:#04x}, expected {expected:#04x}")]
    VersionMismatch { got: u8, expected: u8 },

    /// A bring-up step was attempted out of order.
    #[error("Invalid bring-up transition from {from} to {to}")]
    InvalidTransition {
        from: BringUpState,
        to: BringUpState,
    },

    /// The bus failed during a bring-up step.
    #[error("Bus error during bring-up: {0}")]
    Bus(#[from] BusError),
}

/// Errors during the chip self-test.
#[derive(Debug, thiserror::Error)]
pub enum SelfTestError {
    /// The self-test was requested before bring-up completed.
    #[error("Reader not ready for self-test (state: {state})")]
    NotReady { state: BringUpState },

    /// A setup step failed at the bus level.
    #[error("Self-test setup failed at step '{step}': {source}")]
    SetupFailed {
        step: &'static str,
        #[source]
        source: BusError,
    },

    /// The captured output diverged from the reference vector.
    #[error("Self-test output mismatch at byte {index}: got {got:#04x}, expected {expected:#04x}")]
    VectorMismatch { index: usize, got: u8, expected: u8 },
}

impl SelfTestError {
    /// Create a new setup-failure error for the given step.
    pub fn setup_failed(step: &'static str, source: BusError) -> Self {
        Self::SetupFailed { step, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_mismatch_display() {
        let error = BringUpError::VersionMismatch {
            got: 0x91,
            expected: 0x92,
        };
        assert_eq!(
            error.to_string(),
            "Version check failed: got 0x91, expected 0x92"
        );
    }

    #[test]
    fn test_vector_mismatch_display() {
        let error = SelfTestError::VectorMismatch {
            index: 17,
            got: 0xAA,
            expected: 0x3B,
        };
        assert_eq!(
            error.to_string(),
            "Self-test output mismatch at byte 17: got 0xaa, expected 0x3b"
        );
    }

    #[test]
    fn test_setup_failed_carries_source() {
        let error = SelfTestError::setup_failed("fifo flush", BusError::transfer_failed("NAK"));
        assert!(matches!(error, SelfTestError::SetupFailed { step: "fifo flush", .. }));
    }
}
