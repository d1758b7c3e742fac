use std::sync::Arc;

use thiserror::Error;

use crate::api::{ApiError, VideoApi, VideoSummary};
use crate::display::{DisplayError, Surface};
use crate::source::VideoSource;

use super::session::PlaybackSession;

/// Why a slot stopped before its source ran dry.
#[derive(Debug, Error)]
pub enum SlotError {
    #[error("video source failed: {0}")]
    Source(#[from] ApiError),

    #[error("display failed: {0}")]
    Display(#[from] DisplayError),
}

/// Summary of a slot that ran until its source was exhausted.
#[derive(Debug, Clone)]
pub struct SlotReport {
    pub region: String,
    pub played: u64,
    pub skipped: u64,
    /// The last video shown. Its server record is left in place.
    pub last: Option<VideoSummary>,
}

/// Result of preparing the region for the next video.
enum Cycle {
    Loaded,
    Exhausted,
}

/**
    Keeps one display region filled with video from the shared source.

    Every cycle replaces the region's element, takes videos until one
    resolves to a playback URL, and waits for it to finish. Videos whose
    URL cannot be resolved are deleted and skipped. A video that played is
    deleted one cycle later, once its successor occupies the region, so a
    record is never removed while its own video is still on screen and the
    last video of an exhausted source keeps its record.
*/
pub struct SlotPlayer<A, D> {
    api: Arc<A>,
    source: Arc<VideoSource<A>>,
    display: D,
    session: PlaybackSession,
}

impl<A: VideoApi, D: Surface> SlotPlayer<A, D> {
    pub fn new(api: Arc<A>, source: Arc<VideoSource<A>>, display: D) -> Self {
        let session = PlaybackSession::new(display.region());
        Self {
            api,
            source,
            display,
            session,
        }
    }

    /**
        Run until the source is exhausted.

        Returns an error when paging the source fails or the display itself
        breaks; neither is retried here.
    */
    pub async fn run(mut self) -> Result<SlotReport, SlotError> {
        let region = self.session.region.clone();
        tracing::info!(slot = %region, "slot started");

        loop {
            match self.advance().await? {
                Cycle::Loaded => self.watch().await?,
                Cycle::Exhausted => break,
            }
        }

        self.display.clear();
        tracing::info!(
            slot = %region,
            played = self.session.played,
            skipped = self.session.skipped,
            "source exhausted, slot finished"
        );

        Ok(SlotReport {
            region,
            played: self.session.played,
            skipped: self.session.skipped,
            last: self.session.current.take(),
        })
    }

    /**
        Replace the region's element and load the next playable video.

        The previous video's record is deleted only after the new source is
        loaded.
    */
    async fn advance(&mut self) -> Result<Cycle, SlotError> {
        self.display.clear();
        self.display.attach();

        loop {
            let Some(video) = self.source.next().await? else {
                return Ok(Cycle::Exhausted);
            };

            let url = match self.api.fetch_playback_url(&video.guid).await {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!(
                        slot = %self.session.region,
                        guid = %video.guid,
                        name = %video.name,
                        error = %e,
                        "playback URL unavailable, discarding video"
                    );
                    self.api.delete_video(&video.name, true).await?;
                    self.session.record_skip();
                    continue;
                }
            };

            self.display.load(&url)?;
            tracing::info!(slot = %self.session.region, name = %video.name, %url, "loaded video");

            if let Some(previous) = self.session.supersede(video) {
                self.api.delete_video(&previous.name, true).await?;
            }
            return Ok(Cycle::Loaded);
        }
    }

    /**
        Start the loaded video once it is ready and wait for it to end.

        A media failure ends the video early; the slot carries on.
    */
    async fn watch(&mut self) -> Result<(), SlotError> {
        let result = async {
            self.display.ready().await?;
            self.display.play().await?;
            self.display.ended().await
        }
        .await;

        match result {
            Ok(()) => Ok(()),
            Err(e) if e.is_media() => {
                tracing::warn!(
                    slot = %self.session.region,
                    source = self.display.source().map(|url| url.as_str()).unwrap_or("-"),
                    error = %e,
                    "playback failed, moving on"
                );
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
