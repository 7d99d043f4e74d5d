//! Latchkey demonstration binary.
//!
//! Runs the full controller stack on mock hardware: reader bring-up and
//! self-test, then a scripted two-token scenario through the access
//! controller. Useful for exercising the stack end to end without a board,
//! and as a wiring reference for real backends.
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use std::time::Duration;

use anyhow::Context;
use tokio::time::sleep;
use tracing::info;
use tracing_subscriber::EnvFilter;

use latchkey_controller::{AccessController, SolenoidLock};
use latchkey_core::TokenSlot;
use latchkey_hardware::mock::{MockLine, MockReaderChip};
use latchkey_reader::Mfrc522;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!(version = latchkey_core::VERSION, "latchkey starting");

    // reader bring-up and self-test on the simulated chip
    let (chip, _chip_handle) = MockReaderChip::new();
    let (reset_line, _reset_handle) = MockLine::new("reset");
    let mut reader = Mfrc522::new(chip, reset_line);
    reader.bring_up().await.context("reader bring-up failed")?;
    reader
        .run_self_test()
        .await
        .context("reader self-test failed")?;

    // controller on the simulated solenoid
    let (solenoid_line, solenoid_handle) = MockLine::new("solenoid");
    let lock = SolenoidLock::init(solenoid_line)
        .await
        .context("solenoid initialization failed")?;
    let (controller, source) = AccessController::new(lock);
    let worker = tokio::spawn(controller.run());

    // scripted scenario: two tokens arrive, one leaves
    let token_a = TokenSlot::new(0)?;
    let token_b = TokenSlot::new(1)?;

    source.report(token_a, true).await?;
    sleep(Duration::from_millis(250)).await;
    source.report(token_b, true).await?;
    sleep(Duration::from_millis(250)).await;
    source.report(token_b, false).await?;

    drop(source);
    worker.await?.context("controller stopped on a fault")?;

    info!(
        drives = solenoid_handle.history().len(),
        final_level = ?solenoid_handle.level(),
        "scenario complete"
    );
    Ok(())
}
