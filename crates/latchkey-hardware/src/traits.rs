//! Hardware device trait definitions.
//!
//! These traits establish the contract between the controller stack and the
//! physical peripherals: the SPI bus carrying the reader chip and the GPIO
//! lines driving the reset pin and the solenoid coil. They enable
//! substitution between mock implementations (development, tests) and real
//! board backends.
//!
//! All traits use native `async fn` methods (Edition 2024 RPITIT), so no
//! `async_trait` macro is involved.

#![allow(async_fn_in_trait)]

use crate::error::Result;
use crate::types::{LineLevel, TransportInfo};

/// Half-duplex SPI transport for register-addressed peripherals.
///
/// The single primitive is a combined write-then-read: the command bytes are
/// shifted out, then `n_rx` additional byte periods are clocked and their
/// response bytes returned. Both phases happen within one continuous chip
/// select — implementations must never release the bus between them, because
/// the chip has no concept of interleaved framing.
///
/// The transport carries raw bytes only. Register address framing is the
/// business of the layer above; a transport must not touch the payload.
///
/// # Examples
///
/// ```no_run
/// use latchkey_hardware::{SpiTransport, Result};
///
/// async fn probe<T: SpiTransport>(spi: &mut T) -> Result<u8> {
///     // one command byte out, one response byte clocked after it
///     let response = spi.write_then_read(&[0x6F], 1).await?;
///     Ok(response[0])
/// }
/// ```
pub trait SpiTransport: Send + Sync {
    /// Shift out `tx`, then clock `n_rx` further byte periods and return
    /// the bytes sampled during them.
    ///
    /// Implementations return exactly `n_rx` bytes on success.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The bus reports a synchronization or NAK failure
    /// - The peripheral is disconnected
    async fn write_then_read(&mut self, tx: &[u8], n_rx: usize) -> Result<Vec<u8>>;

    /// Get transport information.
    ///
    /// Returns metadata about the bus (name, clock rate) for logging and
    /// diagnostics.
    async fn info(&self) -> Result<TransportInfo>;
}

/// A digital output line (chip reset, solenoid drive).
///
/// Driving a line to the level it already holds is a hardware no-op, which
/// is what makes lock/unlock commands idempotent by construction.
///
/// # Examples
///
/// ```no_run
/// use latchkey_hardware::{LineLevel, OutputLine, Result};
///
/// async fn pulse_low<L: OutputLine>(line: &mut L) -> Result<()> {
///     line.set_low().await?;
///     // ... hold ...
///     line.set_high().await?;
///     Ok(())
/// }
/// ```
pub trait OutputLine: Send + Sync {
    /// Drive the line to the given level.
    ///
    /// # Errors
    ///
    /// Returns an error if the line cannot be driven.
    async fn set_level(&mut self, level: LineLevel) -> Result<()>;

    /// Drive the line high.
    async fn set_high(&mut self) -> Result<()> {
        self.set_level(LineLevel::High).await
    }

    /// Drive the line low.
    async fn set_low(&mut self) -> Result<()> {
        self.set_level(LineLevel::Low).await
    }
}
