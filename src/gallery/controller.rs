//! Gallery controller: stale-while-revalidate over an injectable fetcher.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use dashmap::DashMap;
use dashmap::mapref::one::Ref;
use metrics::counter;
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::cache::{CacheConfig, Debouncer, ListingStore, PollScheduler};
use crate::domain::{EventCode, Listing};
use crate::util::format_bytes;

use super::fetch::{FetchError, ListingFetcher};
use super::view::{GalleryPhase, GalleryView};

pub(crate) const METRIC_FETCH_FAILURE: &str = "rinfresco_fetch_failure_total";
pub(crate) const METRIC_FETCH_DISCARDED: &str = "rinfresco_fetch_discarded_total";

/// Per-event controller state: the published view, the monotonic fetch
/// sequence, and the refresh debouncer.
struct GallerySlot {
    view: watch::Sender<GalleryView>,
    issued: AtomicU64,
    refresh: Debouncer<EventCode>,
}

/// Drives the read path for every opened event gallery.
///
/// An explicit, constructor-created service: multiple independent instances
/// may exist (tests create one per case) and nothing is process-global.
/// Responses racing between a foreground and a background fetch for the same
/// event are resolved with a per-event sequence number; a response that was
/// superseded by a newer request is discarded instead of written.
pub struct GalleryController<F: ListingFetcher + 'static> {
    fetcher: Arc<F>,
    store: Arc<ListingStore>,
    poller: PollScheduler,
    config: CacheConfig,
    slots: DashMap<EventCode, GallerySlot>,
    weak: Weak<Self>,
}

impl<F: ListingFetcher + 'static> GalleryController<F> {
    pub fn new(fetcher: Arc<F>, store: Arc<ListingStore>, config: CacheConfig) -> Arc<Self> {
        Arc::new_cyclic(|weak| Self {
            fetcher,
            store,
            poller: PollScheduler::new(config.poll_interval()),
            config,
            slots: DashMap::new(),
            weak: weak.clone(),
        })
    }

    /// Subscribe to the view state for an event. The receiver starts at
    /// `Loading` until [`open`](Self::open) has run.
    pub fn subscribe(&self, event: &EventCode) -> watch::Receiver<GalleryView> {
        self.slot(event).view.subscribe()
    }

    /// Run the gallery read path for an event.
    ///
    /// A fresh cache entry renders immediately and schedules a silent
    /// background revalidation; a miss blocks on a foreground fetch, whose
    /// failure is surfaced through the view and returned to the caller.
    pub async fn open(&self, event: &EventCode) -> Result<(), FetchError> {
        if let Some(listing) = self.store.get(event) {
            debug!(event = %event, files = listing.len(), "serving cached listing");
            self.apply_listing(event, &listing);
            self.schedule_background_refresh(event.clone());
            return Ok(());
        }

        self.publish(event, GalleryView::loading());
        self.fetch_foreground(event).await
    }

    /// Request a foreground refetch, coalesced through the debouncer.
    pub fn refresh(&self, event: &EventCode) {
        let sender = self.sender(event);
        sender.send_if_modified(|view| {
            if view.phase == GalleryPhase::Ready && !view.listing.is_empty() {
                view.phase = GalleryPhase::Refreshing;
                return true;
            }
            false
        });

        self.slot(event).refresh.call(event.clone());
    }

    /// Invalidate the cached listing and schedule a debounced refetch.
    /// Called by the surrounding application after a successful upload.
    pub fn upload_completed(&self, event: &EventCode) {
        self.store.invalidate(event);
        self.refresh(event);
    }

    /// Tear down the per-event state when its view unmounts: the poll timer
    /// and any pending debounced refresh are cancelled, and the watch
    /// channel closes. A fetch already in flight resolves as superseded and
    /// its response is dropped.
    pub fn close(&self, event: &EventCode) {
        self.poller.stop(event);
        if let Some((_, slot)) = self.slots.remove(event) {
            slot.refresh.cancel();
        }
    }

    /// Full session reset: every timer stopped, every slot dropped, the
    /// listing store cleared.
    pub fn reset(&self) {
        self.poller.stop_all();
        for entry in self.slots.iter() {
            entry.value().refresh.cancel();
        }
        self.slots.clear();
        self.store.clear();
    }

    /// Whether the empty-gallery poller is armed for an event.
    pub fn is_polling(&self, event: &EventCode) -> bool {
        self.poller.is_polling(event)
    }

    // ========================================================================
    // Fetch paths
    // ========================================================================

    async fn fetch_foreground(&self, event: &EventCode) -> Result<(), FetchError> {
        let seq = self.next_seq(event);
        match self.fetcher.fetch(event).await {
            Ok(listing) => {
                if !self.is_latest(event, seq) {
                    counter!(METRIC_FETCH_DISCARDED).increment(1);
                    debug!(event = %event, seq, "discarding superseded listing response");
                    return Ok(());
                }
                self.store.set(event, listing.clone());
                debug!(
                    event = %event,
                    files = listing.len(),
                    size = %format_bytes(listing.total_bytes()),
                    "listing fetched"
                );
                self.apply_listing(event, &listing);
                Ok(())
            }
            Err(error) => {
                counter!(METRIC_FETCH_FAILURE).increment(1);
                if self.is_latest(event, seq) {
                    self.surface_failure(event, &error);
                }
                Err(error)
            }
        }
    }

    async fn fetch_background(&self, event: &EventCode) {
        if self.slots.get(event).is_none() {
            debug!(event = %event, "skipping background refresh for a closed gallery");
            return;
        }

        let seq = self.next_seq(event);
        match self.fetcher.fetch(event).await {
            Ok(listing) => {
                if !self.is_latest(event, seq) {
                    counter!(METRIC_FETCH_DISCARDED).increment(1);
                    debug!(event = %event, seq, "discarding superseded listing response");
                    return;
                }
                self.store.set(event, listing.clone());
                self.apply_listing(event, &listing);
            }
            Err(error) => {
                counter!(METRIC_FETCH_FAILURE).increment(1);
                warn!(
                    event = %event,
                    error = %error,
                    "background refresh failed; keeping displayed listing"
                );
            }
        }
    }

    async fn refresh_now(&self, event: &EventCode) {
        if let Err(error) = self.fetch_foreground(event).await {
            warn!(event = %event, error = %error, "debounced refresh failed");
        }
    }

    fn schedule_background_refresh(&self, event: EventCode) {
        let weak = self.weak.clone();
        let delay = self.config.background_refresh_delay();
        tokio::spawn(async move {
            sleep(delay).await;
            if let Some(controller) = weak.upgrade() {
                controller.fetch_background(&event).await;
            }
        });
    }

    // ========================================================================
    // View and poller management
    // ========================================================================

    /// Publish the listing as `Ready` and arm or disarm the empty-gallery
    /// poller depending on whether content exists yet.
    fn apply_listing(&self, event: &EventCode, listing: &Listing) {
        self.publish(event, GalleryView::ready(listing.clone()));
        if listing.is_empty() {
            self.arm_poller(event);
        } else {
            self.poller.stop(event);
        }
    }

    fn arm_poller(&self, event: &EventCode) {
        if self.poller.is_polling(event) {
            return;
        }
        let weak = self.weak.clone();
        let poll_event = event.clone();
        self.poller.start(event, move || {
            let weak = weak.clone();
            let event = poll_event.clone();
            async move {
                if let Some(controller) = weak.upgrade() {
                    controller.fetch_background(&event).await;
                }
            }
        });
    }

    /// Publish a view update, suppressed when the content is unchanged.
    fn publish(&self, event: &EventCode, next: GalleryView) {
        let sender = self.sender(event);
        sender.send_if_modified(move |current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
    }

    /// A foreground failure keeps whatever content is on screen and attaches
    /// a transient notice; with nothing to show it becomes the error phase.
    fn surface_failure(&self, event: &EventCode, error: &FetchError) {
        let sender = self.sender(event);
        sender.send_modify(|view| {
            if view.listing.is_empty() {
                *view = GalleryView::error(error.to_string());
            } else {
                view.phase = GalleryPhase::Ready;
                view.notice = Some(error.to_string());
            }
        });
    }

    // ========================================================================
    // Slot bookkeeping
    // ========================================================================

    fn slot(&self, event: &EventCode) -> Ref<'_, EventCode, GallerySlot> {
        if let Some(slot) = self.slots.get(event) {
            return slot;
        }
        let slot = self.new_slot();
        self.slots.entry(event.clone()).or_insert(slot).downgrade()
    }

    fn new_slot(&self) -> GallerySlot {
        let (view, _) = watch::channel(GalleryView::loading());
        let weak = self.weak.clone();
        let refresh = Debouncer::new(self.config.debounce_delay(), move |event: EventCode| {
            let weak = weak.clone();
            async move {
                if let Some(controller) = weak.upgrade() {
                    controller.refresh_now(&event).await;
                }
            }
        });

        GallerySlot {
            view,
            issued: AtomicU64::new(0),
            refresh,
        }
    }

    fn sender(&self, event: &EventCode) -> watch::Sender<GalleryView> {
        self.slot(event).view.clone()
    }

    fn next_seq(&self, event: &EventCode) -> u64 {
        self.slot(event).issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// A response is applied only when its request is still the newest one
    /// issued for the event. A gallery closed while the request was in
    /// flight no longer has a slot; its response counts as superseded.
    fn is_latest(&self, event: &EventCode, seq: u64) -> bool {
        self.slots
            .get(event)
            .is_some_and(|slot| slot.issued.load(Ordering::SeqCst) == seq)
    }
}
