//! Core types and constants for the Latchkey lock controller.
//!
//! This crate defines the vocabulary shared by every other workspace member:
//! token slots, lock state, presence events, the quorum policy, and the
//! timing constants that govern reader bring-up and event debouncing.
//! It carries no hardware or protocol logic of its own.

pub mod constants;
pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
