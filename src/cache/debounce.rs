//! Trailing-edge debouncer.
//!
//! Collapses bursts of refresh triggers (several uploads finishing back to
//! back, repeated pull-to-refresh gestures) into a single invocation that
//! carries the arguments of the last call.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use super::lock::lock_guard;

const SOURCE: &str = "cache::debounce";

type Action<T> = Arc<dyn Fn(T) -> BoxFuture<'static, ()> + Send + Sync>;

/// Wraps an async action so repeated calls within the delay collapse into a
/// single trailing invocation.
///
/// Dropping the debouncer cancels any pending invocation.
pub struct Debouncer<T> {
    delay: Duration,
    action: Action<T>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F, Fut>(delay: Duration, action: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            delay,
            action: Arc::new(move |value| Box::pin(action(value))),
            pending: Mutex::new(None),
        }
    }

    /// Schedule the action with `value`, cancelling any invocation still
    /// waiting out its delay.
    pub fn call(&self, value: T) {
        let action = Arc::clone(&self.action);
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            sleep(delay).await;
            action(value).await;
        });

        if let Some(previous) = lock_guard(&self.pending, SOURCE, "call").replace(handle) {
            previous.abort();
        }
    }

    /// Abort a pending invocation, if any.
    pub fn cancel(&self) {
        if let Some(handle) = lock_guard(&self.pending, SOURCE, "cancel").take() {
            handle.abort();
        }
    }

    /// Whether an invocation is still waiting out its delay.
    pub fn is_pending(&self) -> bool {
        lock_guard(&self.pending, SOURCE, "is_pending")
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = lock_guard(&self.pending, SOURCE, "drop").take() {
            handle.abort();
        }
    }
}
