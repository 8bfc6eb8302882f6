//! Empty-gallery revalidation scheduler.
//!
//! A freshly created event has a gallery with no uploads yet; the consuming
//! view has nothing to trigger a refresh from. The scheduler re-runs a
//! callback on a fixed interval for such events, and is stopped as soon as
//! the first non-empty listing arrives. Once content exists, only explicit
//! refresh triggers update the view.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

use crate::domain::EventCode;

use super::lock::lock_guard;

const SOURCE: &str = "cache::poller";

/// Per-event repeating timers, at most one per event code.
///
/// Dropping the scheduler aborts every remaining timer.
pub struct PollScheduler {
    interval: Duration,
    timers: Mutex<HashMap<EventCode, JoinHandle<()>>>,
}

impl PollScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            timers: Mutex::new(HashMap::new()),
        }
    }

    /// Begin polling for an event, replacing any timer already registered
    /// for the same code. The callback first fires one full interval after
    /// this call, then on every interval tick.
    pub fn start<F, Fut>(&self, event: &EventCode, callback: F)
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let interval = self.interval;
        let handle = tokio::spawn(async move {
            let mut ticker = time::interval_at(time::Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                callback().await;
            }
        });

        if let Some(previous) = lock_guard(&self.timers, SOURCE, "start").insert(event.clone(), handle)
        {
            previous.abort();
            debug!(event = %event, "replaced active poll timer");
        } else {
            debug!(event = %event, interval_secs = interval.as_secs(), "poll timer started");
        }
    }

    /// Cancel the timer for an event. Idempotent when none exists.
    pub fn stop(&self, event: &EventCode) {
        if let Some(handle) = lock_guard(&self.timers, SOURCE, "stop").remove(event) {
            handle.abort();
            debug!(event = %event, "poll timer stopped");
        }
    }

    /// Cancel every active timer (component teardown).
    pub fn stop_all(&self) {
        let mut timers = lock_guard(&self.timers, SOURCE, "stop_all");
        for (_, handle) in timers.drain() {
            handle.abort();
        }
    }

    /// Whether a timer is currently registered for the event.
    pub fn is_polling(&self, event: &EventCode) -> bool {
        lock_guard(&self.timers, SOURCE, "is_polling").contains_key(event)
    }

    /// Number of active timers.
    pub fn active_count(&self) -> usize {
        lock_guard(&self.timers, SOURCE, "active_count").len()
    }
}

impl Drop for PollScheduler {
    fn drop(&mut self) {
        self.stop_all();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::time::advance;

    use super::*;

    fn code(input: &str) -> EventCode {
        EventCode::parse(input).expect("event code")
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    fn counting_callback(hits: &Arc<AtomicUsize>) -> impl Fn() -> futures::future::Ready<()> + Send + 'static
    {
        let hits = Arc::clone(hits);
        move || {
            hits.fetch_add(1, Ordering::SeqCst);
            futures::future::ready(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn callback_fires_on_each_interval() {
        let scheduler = PollScheduler::new(Duration::from_secs(15));
        let hits = Arc::new(AtomicUsize::new(0));
        let event = code("evt1");

        scheduler.start(&event, counting_callback(&hits));
        settle().await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        advance(Duration::from_secs(15)).await;
        settle().await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        advance(Duration::from_secs(15)).await;
        settle().await;
        advance(Duration::from_secs(15)).await;
        settle().await;
        assert_eq!(hits.load(Ordering::SeqCst), 3);

        scheduler.stop(&event);
    }

    #[tokio::test(start_paused = true)]
    async fn second_start_replaces_the_first_timer() {
        let scheduler = PollScheduler::new(Duration::from_secs(15));
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let event = code("evt1");

        scheduler.start(&event, counting_callback(&first));
        scheduler.start(&event, counting_callback(&second));
        assert_eq!(scheduler.active_count(), 1);
        settle().await;

        advance(Duration::from_secs(15)).await;
        settle().await;

        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);

        scheduler.stop_all();
    }

    #[tokio::test(start_paused = true)]
    async fn stop_prevents_any_further_callbacks() {
        let scheduler = PollScheduler::new(Duration::from_secs(15));
        let hits = Arc::new(AtomicUsize::new(0));
        let event = code("evt1");

        scheduler.start(&event, counting_callback(&hits));
        settle().await;
        advance(Duration::from_secs(15)).await;
        settle().await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        scheduler.stop(&event);
        assert!(!scheduler.is_polling(&event));

        advance(Duration::from_secs(120)).await;
        settle().await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_is_idempotent_without_a_timer() {
        let scheduler = PollScheduler::new(Duration::from_secs(15));
        scheduler.stop(&code("evt1"));
        assert_eq!(scheduler.active_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_all_cancels_every_timer() {
        let scheduler = PollScheduler::new(Duration::from_secs(15));
        let hits = Arc::new(AtomicUsize::new(0));

        scheduler.start(&code("evt1"), counting_callback(&hits));
        scheduler.start(&code("evt2"), counting_callback(&hits));
        assert_eq!(scheduler.active_count(), 2);

        scheduler.stop_all();
        assert_eq!(scheduler.active_count(), 0);

        advance(Duration::from_secs(60)).await;
        settle().await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
