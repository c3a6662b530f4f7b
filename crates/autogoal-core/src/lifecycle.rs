//! Start/stop/shutdown signaling between the agent and its host

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

/// Cloneable handle for cancelling a running agent
///
/// `stop()` only flips a flag. The loop checks it at the top of each
/// iteration, so any in-flight gateway call or delay finishes first.
#[derive(Debug, Clone)]
pub struct AgentHandle {
    running: Arc<AtomicBool>,
}

impl AgentHandle {
    pub(crate) fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Request a cooperative stop
    pub fn stop(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            debug!("Stop requested");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Host callback marking the end of the agent's visible activity
///
/// Runs at most once; later invocations are ignored.
pub struct ShutdownCallback {
    callback: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl ShutdownCallback {
    pub fn new(callback: impl FnOnce() + Send + 'static) -> Self {
        Self {
            callback: Mutex::new(Some(Box::new(callback))),
        }
    }

    /// Notify a `oneshot` receiver when the agent shuts down
    pub fn notify(tx: tokio::sync::oneshot::Sender<()>) -> Self {
        Self::new(move || {
            let _ = tx.send(());
        })
    }

    pub fn invoke(&self) {
        let callback = self
            .callback
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        match callback {
            Some(callback) => callback(),
            None => warn!("Shutdown callback invoked more than once; ignoring"),
        }
    }

    pub fn is_spent(&self) -> bool {
        self.callback
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_none()
    }
}

impl std::fmt::Debug for ShutdownCallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShutdownCallback")
            .field("spent", &self.is_spent())
            .finish()
    }
}
