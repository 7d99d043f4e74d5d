//! Solenoid lock actuation.
//!
//! The actuator is a pure effector: it tracks no state of its own and
//! drives the control line unconditionally. Driving a line to the level it
//! already holds is a hardware no-op, which is what makes lock and unlock
//! idempotent by construction. The decision engine owns the lock state.

#![allow(async_fn_in_trait)]

use tracing::debug;

use latchkey_hardware::OutputLine;

use crate::error::ActuatorError;

/// Lock actuator abstraction.
///
/// The seam between the decision engine and the physical lock; tests count
/// commands through it, production drives a [`SolenoidLock`].
pub trait LockActuator: Send + Sync {
    /// Drive the lock into the secured state.
    async fn lock(&mut self) -> Result<(), ActuatorError>;

    /// Release the lock.
    async fn unlock(&mut self) -> Result<(), ActuatorError>;
}

/// Solenoid lock on a GPIO drive line.
///
/// Wiring: the line held high keeps the bolt engaged (locked); driving it
/// low energizes the coil and releases the bolt.
#[derive(Debug)]
pub struct SolenoidLock<L: OutputLine> {
    line: L,
}

impl<L: OutputLine> SolenoidLock<L> {
    /// Take ownership of the drive line and force the locked state.
    ///
    /// The lock comes up secured no matter what level the line held
    /// before.
    pub async fn init(line: L) -> Result<Self, ActuatorError> {
        let mut lock = Self { line };
        lock.lock().await?;
        Ok(lock)
    }
}

impl<L: OutputLine> LockActuator for SolenoidLock<L> {
    async fn lock(&mut self) -> Result<(), ActuatorError> {
        debug!("driving solenoid locked");
        self.line.set_high().await?;
        Ok(())
    }

    async fn unlock(&mut self) -> Result<(), ActuatorError> {
        debug!("driving solenoid unlocked");
        self.line.set_low().await?;
        Ok(())
    }
}
