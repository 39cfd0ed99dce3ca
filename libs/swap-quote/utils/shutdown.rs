//! Ctrl+C handling for headless binaries

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::signal;
use tokio::sync::Notify;
use tracing::info;

/// Shared shutdown state: a running flag plus a notifier for tasks that
/// want to await the signal instead of polling the flag
#[derive(Clone)]
pub struct ShutdownManager {
    running: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl ShutdownManager {
    /// Create a new shutdown manager with running state
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
            notify: Arc::new(Notify::new()),
        }
    }

    /// Spawn a Ctrl+C signal handler that triggers shutdown
    pub fn spawn_signal_handler(&self) {
        let manager = self.clone();
        tokio::spawn(async move {
            if signal::ctrl_c().await.is_ok() {
                info!("Received shutdown signal (Ctrl+C)");
                manager.trigger();
            }
        });
    }

    /// Request shutdown
    pub fn trigger(&self) {
        self.running.store(false, Ordering::Release);
        self.notify.notify_waiters();
    }

    /// Check if the process should continue running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Resolve once shutdown has been requested
    pub async fn wait(&self) {
        let notified = self.notify.notified();
        if !self.is_running() {
            return;
        }
        notified.await;
    }
}

impl Default for ShutdownManager {
    fn default() -> Self {
        Self::new()
    }
}
