//! Cooperative exit signal, checked once per loop iteration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::Result;

/// Shared flag, clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct ExitFlag {
    requested: Arc<AtomicBool>,
}

impl ExitFlag {
    pub fn new() -> ExitFlag {
        Default::default()
    }

    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Spawn a watcher thread that requests exit on Ctrl-C.
    pub fn install_ctrl_c(&self) -> Result<()> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_io()
            .build()?;
        let flag = self.clone();
        std::thread::Builder::new()
            .name("ctrl-c".to_owned())
            .spawn(move || {
                if let Err(err) = runtime.block_on(tokio::signal::ctrl_c()) {
                    log::error!("unable to listen for ctrl-c: {err}");
                    return;
                }
                log::info!("ctrl-c received, stopping after the current frame, again to quit now");
                flag.request();

                // The handler stays installed, so a display stuck in show needs a hard exit.
                if runtime.block_on(tokio::signal::ctrl_c()).is_ok() {
                    log::warn!("second ctrl-c, exiting immediately");
                    std::process::exit(130);
                }
            })?;
        Ok(())
    }
}
