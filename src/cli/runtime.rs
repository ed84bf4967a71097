use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use log::debug;

/// Grace period for blocking probes still running after output is written
pub const SHUTDOWN_GRACE: Duration = Duration::from_millis(250);

/// Runs a command future on a fresh multi-threaded runtime
///
/// Probes on the blocking pool cannot be aborted at the overall deadline.
/// Teardown waits at most `grace` for them, so a probe stuck on the OS does
/// not hold the process open once the command has finished.
pub fn block_on_with_grace<F: Future>(future: F, grace: Duration) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;

    let output = runtime.block_on(future);

    debug!("Shutting down runtime with {}ms grace", grace.as_millis());
    runtime.shutdown_timeout(grace);

    Ok(output)
}
