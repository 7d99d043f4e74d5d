//! Error types for bus and GPIO operations.
//!
//! Transport errors are terminal at this layer: a failed register
//! transaction leaves the chip in an undefined state, so nothing here
//! retries. Callers at the bring-up boundary decide whether to start over.

/// Result type alias for hardware operations.
pub type Result<T> = std::result::Result<T, BusError>;

/// Errors that can occur at the physical bus / GPIO level.
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    /// A bus transaction failed (synchronization loss, NAK, short clocking).
    #[error("Transfer failed: {message}")]
    TransferFailed { message: String },

    /// The peripheral is not connected or has been disconnected.
    #[error("Device disconnected: {device}")]
    Disconnected { device: String },

    /// A GPIO line could not be driven or read.
    #[error("Line fault on {line}: {message}")]
    LineFault { line: String, message: String },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BusError {
    /// Create a new transfer-failed error.
    pub fn transfer_failed(message: impl Into<String>) -> Self {
        Self::TransferFailed {
            message: message.into(),
        }
    }

    /// Create a new disconnected error.
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    /// Create a new line-fault error.
    pub fn line_fault(line: impl Into<String>, message: impl Into<String>) -> Self {
        Self::LineFault {
            line: line.into(),
            message: message.into(),
        }
    }
}
