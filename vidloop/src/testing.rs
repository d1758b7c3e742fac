//! Scripted stand-ins for the backend, shared by unit tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use reqwest::StatusCode;
use tokio::time::Instant;
use url::Url;

use crate::api::{ApiError, VideoApi, VideoPage, VideoSummary};
use crate::display::{DisplayError, Surface};

#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    Page {
        after: Option<String>,
        count: Option<u64>,
        at: Instant,
    },
    PlaybackUrl(String),
    Delete(String),
}

/// Video whose guid and name are both `name`.
pub fn video(name: &str) -> VideoSummary {
    VideoSummary {
        guid: name.to_string(),
        name: name.to_string(),
        url: None,
    }
}

pub fn page(names: &[&str], after: Option<&str>) -> VideoPage {
    VideoPage {
        videos: names.iter().map(|n| video(n)).collect(),
        after: after.map(str::to_string),
        count: names.len() as u64,
    }
}

fn status_error(url: &str, status: u16) -> ApiError {
    ApiError::Status {
        url: url.to_string(),
        status: StatusCode::from_u16(status).unwrap(),
    }
}

/**
    Backend that answers from a script and records every call.

    Pages are served in push order; once the script runs out the listing
    answers with a terminal empty page. Playback URLs default to
    `http://x/<guid>.mp4` unless overridden.
*/
pub struct FakeApi {
    pages: Mutex<VecDeque<Result<VideoPage, u16>>>,
    playback: Mutex<HashMap<String, Result<String, u16>>>,
    calls: Mutex<Vec<ApiCall>>,
    latency: Duration,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            pages: Mutex::new(VecDeque::new()),
            playback: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            latency: Duration::ZERO,
        }
    }

    /// Every call suspends for `latency` before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn push_page(&self, page: VideoPage) {
        self.pages.lock().push_back(Ok(page));
    }

    pub fn push_error(&self, status: u16) {
        self.pages.lock().push_back(Err(status));
    }

    pub fn fail_playback(&self, guid: &str, status: u16) {
        self.playback.lock().insert(guid.to_string(), Err(status));
    }

    pub fn set_playback(&self, guid: &str, url: &str) {
        self.playback
            .lock()
            .insert(guid.to_string(), Ok(url.to_string()));
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().clone()
    }

    pub fn page_cursors(&self) -> Vec<Option<String>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ApiCall::Page { after, .. } => Some(after),
                _ => None,
            })
            .collect()
    }

    pub fn playback_requests(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ApiCall::PlaybackUrl(guid) => Some(guid),
                _ => None,
            })
            .collect()
    }

    pub fn deletes(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ApiCall::Delete(name) => Some(name),
                _ => None,
            })
            .collect()
    }

    async fn suspend(&self) {
        if self.latency.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl VideoApi for FakeApi {
    async fn fetch_video_page(
        &self,
        after: Option<&str>,
        count: Option<u64>,
    ) -> Result<VideoPage, ApiError> {
        self.calls.lock().push(ApiCall::Page {
            after: after.map(str::to_string),
            count,
            at: Instant::now(),
        });
        self.suspend().await;

        let next = self.pages.lock().pop_front();
        match next {
            Some(Ok(page)) => Ok(page),
            Some(Err(status)) => Err(status_error("videos/", status)),
            None => Ok(VideoPage::default()),
        }
    }

    async fn fetch_playback_url(&self, guid: &str) -> Result<Url, ApiError> {
        self.calls.lock().push(ApiCall::PlaybackUrl(guid.to_string()));
        self.suspend().await;

        let scripted = self.playback.lock().get(guid).cloned();
        match scripted {
            Some(Ok(url)) => Ok(Url::parse(&url).unwrap()),
            Some(Err(status)) => Err(status_error(guid, status)),
            None => Ok(Url::parse(&format!("http://x/{}.mp4", guid)).unwrap()),
        }
    }

    async fn delete(&self, name: &str) -> Result<(), ApiError> {
        self.calls.lock().push(ApiCall::Delete(name.to_string()));
        self.suspend().await;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayEvent {
    Cleared,
    Attached,
    Loaded(String),
    Played(String),
    Ended(String),
}

/**
    Display that records what happens to it.

    Playback completes as soon as `ended` is polled, unless the source was
    marked as broken media.
*/
pub struct FakeDisplay {
    region: String,
    attached: bool,
    source: Option<Url>,
    events: Arc<Mutex<Vec<DisplayEvent>>>,
    broken_media: HashSet<String>,
    broken_backend: bool,
}

impl FakeDisplay {
    pub fn new(region: &str) -> Self {
        Self {
            region: region.to_string(),
            attached: false,
            source: None,
            events: Arc::new(Mutex::new(Vec::new())),
            broken_media: HashSet::new(),
            broken_backend: false,
        }
    }

    pub fn fail_media(mut self, url: &str) -> Self {
        self.broken_media.insert(url.to_string());
        self
    }

    pub fn fail_backend(mut self) -> Self {
        self.broken_backend = true;
        self
    }

    /// Handle to the event log that outlives the display.
    pub fn events(&self) -> Arc<Mutex<Vec<DisplayEvent>>> {
        Arc::clone(&self.events)
    }

    fn record(&self, event: DisplayEvent) {
        self.events.lock().push(event);
    }

    fn current(&self) -> String {
        self.source.as_ref().map(Url::to_string).unwrap_or_default()
    }
}

/// Sources loaded into a display, in order.
pub fn loaded(events: &Mutex<Vec<DisplayEvent>>) -> Vec<String> {
    events
        .lock()
        .iter()
        .filter_map(|event| match event {
            DisplayEvent::Loaded(url) => Some(url.clone()),
            _ => None,
        })
        .collect()
}

impl Surface for FakeDisplay {
    fn region(&self) -> &str {
        &self.region
    }

    fn clear(&mut self) {
        self.attached = false;
        self.source = None;
        self.record(DisplayEvent::Cleared);
    }

    fn attach(&mut self) {
        self.attached = true;
        self.record(DisplayEvent::Attached);
    }

    fn load(&mut self, url: &Url) -> Result<(), DisplayError> {
        if !self.attached {
            return Err(DisplayError::Detached(self.region.clone()));
        }
        self.source = Some(url.clone());
        self.record(DisplayEvent::Loaded(url.to_string()));
        Ok(())
    }

    fn source(&self) -> Option<&Url> {
        self.source.as_ref()
    }

    async fn ready(&mut self) -> Result<(), DisplayError> {
        tokio::task::yield_now().await;
        Ok(())
    }

    async fn play(&mut self) -> Result<(), DisplayError> {
        if self.broken_backend {
            return Err(DisplayError::Spawn {
                program: "fake".to_string(),
                source: std::io::Error::other("no player"),
            });
        }
        self.record(DisplayEvent::Played(self.current()));
        Ok(())
    }

    async fn ended(&mut self) -> Result<(), DisplayError> {
        tokio::task::yield_now().await;
        let current = self.current();
        if self.broken_media.contains(&current) {
            return Err(DisplayError::Media(format!("cannot decode {}", current)));
        }
        self.record(DisplayEvent::Ended(current));
        Ok(())
    }
}
