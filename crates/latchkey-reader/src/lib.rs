//! Driver for the MFRC522 contactless reader chip over SPI.
//!
//! The driver covers chip bring-up and self-verification: register-addressed
//! bus transactions, the hardware/software reset sequence with version
//! check, and the CRC-coprocessor self-test validated against a fixed
//! 64-byte reference. Once a reader passes bring-up and self-test it can be
//! trusted as a presence source for the access controller; until then it
//! must not be.
//!
//! Tag-level protocols (anti-collision, selection, authentication) are not
//! this crate's business.
//!
//! # Bring-up flow
//!
//! ```no_run
//! use latchkey_hardware::mock::{MockLine, MockReaderChip};
//! use latchkey_reader::Mfrc522;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (chip, _chip_handle) = MockReaderChip::new();
//!     let (reset_line, _line_handle) = MockLine::new("reset");
//!
//!     let mut reader = Mfrc522::new(chip, reset_line);
//!     reader.bring_up().await?;
//!     reader.run_self_test().await?;
//!     // the reader may now feed presence events to the controller
//!     Ok(())
//! }
//! ```

pub mod bringup;
pub mod bus;
pub mod driver;
pub mod error;
pub mod registers;
pub mod selftest;

pub use bringup::{BringUpConfig, BringUpState};
pub use bus::RegisterBus;
pub use driver::Mfrc522;
pub use error::{BringUpError, SelfTestError};
pub use registers::{Command, Register};

pub use latchkey_core::constants::{SELF_TEST_REFERENCE, VERSION_EXPECTED};
