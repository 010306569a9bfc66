//! Ctrl-C handling.

use dqpaint_core::CancelFlag;
use std::thread;
use tracing::{debug, warn};

/// Raise `cancel` when the process receives Ctrl-C.
///
/// The listener runs on a small single-threaded runtime in a background
/// thread; the painter keeps running synchronously on the caller's thread
/// and notices the flag at its next batch boundary.
pub fn cancel_on_interrupt(cancel: CancelFlag) -> std::io::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    thread::Builder::new()
        .name("dqpaint-interrupt".to_string())
        .spawn(move || {
            runtime.block_on(async {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => {
                        warn!("Interrupt received, stopping at the next batch");
                        cancel.cancel();
                    }
                    Err(e) => debug!("Interrupt listener stopped: {}", e),
                }
            });
        })?;

    debug!("Interrupt handler installed");
    Ok(())
}
