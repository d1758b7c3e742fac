use crate::api::VideoSummary;

/**
    Per-slot playback bookkeeping.

    Owned by exactly one slot player. `current` is the video the region is
    showing; it is the one deleted once a successor takes its place.
*/
#[derive(Debug, Clone, Default)]
pub struct PlaybackSession {
    pub region: String,
    pub current: Option<VideoSummary>,
    /// Videos that reached the display.
    pub played: u64,
    /// Videos dropped because their playback URL could not be resolved.
    pub skipped: u64,
}

impl PlaybackSession {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            ..Default::default()
        }
    }

    /// Make `video` current, handing back the video it supersedes.
    pub fn supersede(&mut self, video: VideoSummary) -> Option<VideoSummary> {
        self.played += 1;
        self.current.replace(video)
    }

    pub fn record_skip(&mut self) {
        self.skipped += 1;
    }
}
