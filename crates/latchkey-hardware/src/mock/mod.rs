//! Mock hardware implementations for testing and development.
//!
//! These devices let the full controller stack run without a board
//! attached: [`MockReaderChip`] simulates the reader chip behind the SPI
//! transport, [`MockLine`] records GPIO drives. Each comes with a handle
//! for programmatic control and fault injection.

mod chip;
mod gpio;

pub use chip::{MockChipHandle, MockReaderChip};
pub use gpio::{MockLine, MockLineHandle};
