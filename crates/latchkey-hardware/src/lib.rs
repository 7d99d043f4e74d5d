//! Hardware abstraction layer for the Latchkey lock controller.
//!
//! This crate defines the seam between the controller logic and the physical
//! peripherals: the SPI bus the reader chip hangs off, and the GPIO lines
//! that drive the chip's reset pin and the solenoid coil. Mock
//! implementations allow the full controller stack to run in development and
//! tests without a board attached.
//!
//! # Design
//!
//! - **Async-first**: all I/O operations are asynchronous using native
//!   `async fn` in traits (Edition 2024 RPITIT).
//! - **Thread-safe**: all traits require `Send + Sync` for use with Tokio.
//! - **Error-aware**: all operations return [`Result`] with transport-level
//!   failure detail; nothing below this layer retries.
//!
//! # Mock Implementations
//!
//! [`mock::MockReaderChip`] simulates the reader chip's register file, FIFO,
//! and command execution behind [`SpiTransport`], and
//! [`mock::MockLine`] records every level driven onto a GPIO line. Both come
//! with controller handles for fault injection, following the mock + handle
//! pattern used throughout the crate.
//!
//! Real backends (rppal SPI/GPIO on Raspberry Pi) are reserved behind the
//! `hardware-rppal` feature.

pub mod error;
pub mod mock;
pub mod traits;
pub mod types;

pub use error::{BusError, Result};
pub use traits::{OutputLine, SpiTransport};
pub use types::{LineLevel, TransportInfo};
