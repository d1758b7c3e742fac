use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::api::{ApiError, VideoApi, VideoPage, VideoSummary};

/**
    Delay between polls while the backend reports an empty page that still has a cursor.
*/
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Where the source stands relative to its buffered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceState {
    /// At least one video is waiting to be taken.
    HasBuffered,
    /// Nothing buffered, but more pages exist.
    AwaitingRefill,
    /// Nothing buffered and nothing left to fetch. Terminal.
    Exhausted,
}

#[derive(Debug, Default)]
struct Buffer {
    videos: VecDeque<VideoSummary>,
    after: Option<String>,
    count: u64,
    /// Set when the backend answers 404: nothing is listable anymore.
    closed: bool,
    refilling: bool,
    /// The last page was empty but had a cursor; wait before polling again.
    backoff_pending: bool,
    taken: u64,
    pages_fetched: u64,
}

impl Buffer {
    fn state(&self) -> SourceState {
        if !self.videos.is_empty() {
            SourceState::HasBuffered
        } else if self.closed || self.after.is_none() {
            SourceState::Exhausted
        } else {
            SourceState::AwaitingRefill
        }
    }

    fn replace(&mut self, page: VideoPage) {
        self.backoff_pending = page.is_transient_empty();
        self.videos = page.videos.into();
        self.after = page.after;
        self.count = page.count;
        self.pages_fetched += 1;
    }
}

/**
    Shared, buffered window over the paginated video listing.

    All slot players draw from one source. Takes are single structural
    mutations, and at most one refill is in flight at a time: whoever
    finds the buffer empty first pages the backend, everyone else waits
    for that refill instead of starting their own.
*/
pub struct VideoSource<A> {
    api: Arc<A>,
    buffer: Mutex<Buffer>,
    refill_done: Notify,
    poll_interval: Duration,
}

impl<A: VideoApi> VideoSource<A> {
    pub fn new(api: Arc<A>, first_page: VideoPage, poll_interval: Duration) -> Self {
        let mut buffer = Buffer::default();
        buffer.replace(first_page);
        Self {
            api,
            buffer: Mutex::new(buffer),
            refill_done: Notify::new(),
            poll_interval,
        }
    }

    /**
        Fetch the first page and build a source around it.

        Failures other than the backend's "nothing to list" 404 propagate.
    */
    pub async fn bootstrap(api: Arc<A>, poll_interval: Duration) -> Result<Self, ApiError> {
        match api.fetch_video_page(None, None).await {
            Ok(page) => {
                tracing::info!(
                    videos = page.videos.len(),
                    more = !page.is_terminal(),
                    "fetched first page"
                );
                Ok(Self::new(api, page, poll_interval))
            }
            Err(e) if e.is_not_found() => {
                tracing::info!("backend has no videos to list");
                let source = Self::new(api, VideoPage::default(), poll_interval);
                source.buffer.lock().closed = true;
                Ok(source)
            }
            Err(e) => Err(e),
        }
    }

    pub fn state(&self) -> SourceState {
        self.buffer.lock().state()
    }

    /// Number of videos taken so far, across all consumers.
    pub fn taken(&self) -> u64 {
        self.buffer.lock().taken
    }

    /// Number of pages loaded into the buffer, the first page included.
    pub fn pages_fetched(&self) -> u64 {
        self.buffer.lock().pages_fetched
    }

    /**
        Dequeue the next buffered video.

        Never fetches; an empty buffer just yields `None`.
    */
    pub fn take_next(&self) -> Option<VideoSummary> {
        let mut buffer = self.buffer.lock();
        let video = buffer.videos.pop_front()?;
        buffer.taken += 1;
        Some(video)
    }

    /**
        Refill the buffer while it is awaiting a refill.

        Returns once the buffer holds a video or the source is exhausted.
        If another caller is already refilling, this waits for that refill
        and re-checks rather than paging the backend a second time.
    */
    pub async fn refill(&self) -> Result<(), ApiError> {
        let _guard = loop {
            // Register before checking so a refill finishing in between is not missed.
            let notified = self.refill_done.notified();
            {
                let mut buffer = self.buffer.lock();
                if buffer.state() != SourceState::AwaitingRefill {
                    return Ok(());
                }
                if !buffer.refilling {
                    buffer.refilling = true;
                    break RefillGuard { source: self };
                }
            }
            tracing::debug!("waiting for in-flight refill");
            notified.await;
        };

        self.poll_until_available().await
    }

    /**
        Take the next video, refilling as needed.

        `Ok(None)` means the source is exhausted and will never yield again.
    */
    pub async fn next(&self) -> Result<Option<VideoSummary>, ApiError> {
        loop {
            if let Some(video) = self.take_next() {
                return Ok(Some(video));
            }
            match self.state() {
                SourceState::Exhausted => return Ok(None),
                SourceState::HasBuffered | SourceState::AwaitingRefill => self.refill().await?,
            }
        }
    }

    async fn poll_until_available(&self) -> Result<(), ApiError> {
        loop {
            let (after, count, backoff) = {
                let mut buffer = self.buffer.lock();
                if buffer.state() != SourceState::AwaitingRefill {
                    return Ok(());
                }
                let backoff = std::mem::take(&mut buffer.backoff_pending);
                (buffer.after.clone(), buffer.count, backoff)
            };

            if backoff {
                tracing::debug!(
                    delay_ms = self.poll_interval.as_millis() as u64,
                    "page empty but more pending, polling again"
                );
                tokio::time::sleep(self.poll_interval).await;
            }

            match self.api.fetch_video_page(after.as_deref(), Some(count)).await {
                Ok(page) => {
                    tracing::debug!(
                        videos = page.videos.len(),
                        after = page.after.as_deref().unwrap_or("<end>"),
                        "fetched page"
                    );
                    self.buffer.lock().replace(page);
                }
                Err(e) if e.is_not_found() => {
                    tracing::info!("listing reports no more videos");
                    self.buffer.lock().closed = true;
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "refill failed");
                    return Err(e);
                }
            }
        }
    }
}

/// Releases the refill flag and wakes waiters, also when a refill is dropped midway.
struct RefillGuard<'a, A> {
    source: &'a VideoSource<A>,
}

impl<A> Drop for RefillGuard<'_, A> {
    fn drop(&mut self) {
        self.source.buffer.lock().refilling = false;
        self.source.refill_done.notify_waiters();
    }
}
