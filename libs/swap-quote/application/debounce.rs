//! Debounced value propagation
//!
//! A [`Debouncer`] owns at most one pending timer. Every new raw value aborts
//! the pending timer and schedules a fresh one; the debounced output only
//! moves once the raw value has been stable for the full wait.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::trace;

pub struct Debouncer<T> {
    wait: Duration,
    latest: T,
    output: Arc<watch::Sender<T>>,
    timer: Option<JoinHandle<()>>,
}

impl<T> Debouncer<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Create a debouncer whose output starts at `initial`
    pub fn new(initial: T, wait: Duration) -> Self {
        let (tx, _rx) = watch::channel(initial.clone());
        Self {
            wait,
            latest: initial,
            output: Arc::new(tx),
            timer: None,
        }
    }

    /// Receiver of the debounced value
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.output.subscribe()
    }

    pub fn wait(&self) -> Duration {
        self.wait
    }

    /// Current debounced value
    pub fn value(&self) -> T {
        self.output.borrow().clone()
    }

    /// Feed a new raw value. Must be called from within a tokio runtime.
    pub fn set(&mut self, value: T) {
        if value == self.latest {
            return;
        }
        self.latest = value.clone();
        self.cancel();

        let output = Arc::clone(&self.output);
        let wait = self.wait;
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(wait).await;
            output.send_if_modified(|current| {
                if *current == value {
                    return false;
                }
                *current = value;
                true
            });
        }));
        trace!("Debounce timer scheduled ({:?})", wait);
    }

    /// Abort the pending timer, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.timer.take() {
            handle.abort();
        }
    }

    /// Whether a scheduled update has not fired yet
    pub fn is_pending(&self) -> bool {
        self.timer.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.timer.take() {
            handle.abort();
        }
    }
}
