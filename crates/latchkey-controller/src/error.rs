//! Error types for lock actuation and the controller loop.

use latchkey_hardware::BusError;

/// Errors driving the physical lock.
///
/// A drive failure means the line state is unknown; callers must treat the
/// lock as locked and surface the fault rather than assume the command
/// took effect.
#[derive(Debug, thiserror::Error)]
pub enum ActuatorError {
    /// The solenoid drive line could not be set.
    #[error("Failed to drive solenoid: {0}")]
    Drive(#[from] BusError),
}

/// Errors from the access-controller event loop.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    /// The actuator faulted while applying a decision.
    #[error("Actuator fault: {0}")]
    Actuator(#[from] ActuatorError),

    /// The presence channel is closed (controller stopped).
    #[error("Presence channel closed")]
    ChannelClosed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actuator_error_display() {
        let error = ActuatorError::Drive(BusError::line_fault("solenoid", "pin busy"));
        assert_eq!(
            error.to_string(),
            "Failed to drive solenoid: Line fault on solenoid: pin busy"
        );
    }

    #[test]
    fn test_controller_error_wraps_actuator() {
        let error: ControllerError =
            ActuatorError::Drive(BusError::line_fault("solenoid", "pin busy")).into();
        assert!(matches!(error, ControllerError::Actuator(_)));
    }
}
