use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;

use crate::api::{ApiError, VideoApi};
use crate::display::Surface;
use crate::slot::{SlotError, SlotPlayer, SlotReport};
use crate::source::VideoSource;

/// Name of the `index`th display region, counting from zero.
pub fn region_name(index: usize) -> String {
    format!("box-{}", index + 1)
}

/**
    Application context: the API client and the video source every slot shares.

    Constructed once at startup; slot players borrow from it for their whole run.
*/
pub struct App<A> {
    api: Arc<A>,
    source: Arc<VideoSource<A>>,
}

impl<A: VideoApi> App<A> {
    /// Fetch the first page. Any failure here aborts startup.
    pub async fn start(api: Arc<A>, poll_interval: Duration) -> Result<Self, ApiError> {
        let source = VideoSource::bootstrap(Arc::clone(&api), poll_interval).await?;
        Ok(Self {
            api,
            source: Arc::new(source),
        })
    }

    pub fn source(&self) -> &VideoSource<A> {
        &self.source
    }

    /**
        Run one slot player per display until every slot has stopped.

        Slots interleave on the current task; results come back in display order.
    */
    pub async fn run<D: Surface>(&self, displays: Vec<D>) -> Vec<Result<SlotReport, SlotError>> {
        let slots = displays.into_iter().map(|display| {
            SlotPlayer::new(Arc::clone(&self.api), Arc::clone(&self.source), display).run()
        });
        join_all(slots).await
    }
}
