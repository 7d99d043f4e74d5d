//! Mock GPIO output line.
//!
//! Records every level driven onto the line so tests can assert on reset
//! pulses and solenoid commands, including redundant drives (driving a
//! line to the level it already holds is recorded but is a hardware
//! no-op).

use std::sync::{Arc, Mutex};

use crate::error::{BusError, Result};
use crate::traits::OutputLine;
use crate::types::LineLevel;

#[derive(Debug)]
struct LineState {
    level: Option<LineLevel>,
    history: Vec<LineLevel>,
    fail_drives: bool,
}

/// Mock digital output line.
///
/// # Examples
///
/// ```
/// use latchkey_hardware::mock::MockLine;
/// use latchkey_hardware::{LineLevel, OutputLine};
///
/// #[tokio::main]
/// async fn main() -> latchkey_hardware::Result<()> {
///     let (mut line, handle) = MockLine::new("reset");
///
///     line.set_low().await?;
///     line.set_high().await?;
///
///     assert_eq!(handle.level(), Some(LineLevel::High));
///     assert_eq!(handle.history(), vec![LineLevel::Low, LineLevel::High]);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockLine {
    name: String,
    state: Arc<Mutex<LineState>>,
}

impl MockLine {
    /// Create a new mock line together with its observation handle.
    ///
    /// The line starts undriven; its level is `None` until the first drive.
    pub fn new(name: impl Into<String>) -> (Self, MockLineHandle) {
        let state = Arc::new(Mutex::new(LineState {
            level: None,
            history: Vec::new(),
            fail_drives: false,
        }));
        (
            Self {
                name: name.into(),
                state: Arc::clone(&state),
            },
            MockLineHandle { state },
        )
    }
}

impl OutputLine for MockLine {
    async fn set_level(&mut self, level: LineLevel) -> Result<()> {
        let mut state = self.state.lock().expect("line state poisoned");
        if state.fail_drives {
            return Err(BusError::line_fault(
                &self.name,
                "mock line configured to fail",
            ));
        }
        state.level = Some(level);
        state.history.push(level);
        Ok(())
    }
}

/// Handle for observing and controlling a [`MockLine`].
#[derive(Debug, Clone)]
pub struct MockLineHandle {
    state: Arc<Mutex<LineState>>,
}

impl MockLineHandle {
    /// The level the line currently holds, or `None` if never driven.
    pub fn level(&self) -> Option<LineLevel> {
        self.state.lock().expect("line state poisoned").level
    }

    /// Every level driven onto the line, in order.
    pub fn history(&self) -> Vec<LineLevel> {
        self.state.lock().expect("line state poisoned").history.clone()
    }

    /// Make every subsequent drive fail with a line fault.
    pub fn fail_drives(&self, fail: bool) {
        self.state.lock().expect("line state poisoned").fail_drives = fail;
    }
}
