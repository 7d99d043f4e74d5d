//! Access-decision engine and lock actuation for the Latchkey controller.
//!
//! This crate owns the decision side of the system: presence events from
//! the reader's antenna slots flow through a bounded channel into a
//! single-consumer loop, which debounces them, maintains the token
//! presence bitmap, applies the quorum policy, and drives the solenoid.
//!
//! The lock is fail-safe: it is driven locked at startup, on every
//! below-quorum decision, on controller shutdown, and the recorded state
//! falls back to locked whenever the actuator faults.
//!
//! # Example
//!
//! ```
//! use latchkey_controller::{AccessController, SolenoidLock};
//! use latchkey_core::TokenSlot;
//! use latchkey_hardware::mock::MockLine;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (line, _handle) = MockLine::new("solenoid");
//!     let lock = SolenoidLock::init(line).await?;
//!
//!     let (controller, source) = AccessController::new(lock);
//!     let worker = tokio::spawn(controller.run());
//!
//!     source.report(TokenSlot::new(0)?, true).await?;
//!
//!     drop(source);
//!     worker.await??;
//!     Ok(())
//! }
//! ```

pub mod actuator;
pub mod controller;
pub mod engine;
pub mod error;

pub use actuator::{LockActuator, SolenoidLock};
pub use controller::{AccessController, ControllerConfig, PresenceSource};
pub use engine::{AccessDecisionEngine, Decision};
pub use error::{ActuatorError, ControllerError};
