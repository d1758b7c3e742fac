use std::time::Duration;

use url::Url;

use super::{DisplayError, Surface};

/**
    Display that plays nothing.

    Logs each source it is given and reports playback as complete after a
    fixed duration. Useful for exercising a backend without a media player.
*/
pub struct DryRunDisplay {
    region: String,
    duration: Duration,
    attached: bool,
    source: Option<Url>,
}

impl DryRunDisplay {
    pub fn new(region: impl Into<String>, duration: Duration) -> Self {
        Self {
            region: region.into(),
            duration,
            attached: false,
            source: None,
        }
    }
}

impl Surface for DryRunDisplay {
    fn region(&self) -> &str {
        &self.region
    }

    fn clear(&mut self) {
        self.attached = false;
        self.source = None;
    }

    fn attach(&mut self) {
        self.attached = true;
    }

    fn load(&mut self, url: &Url) -> Result<(), DisplayError> {
        if !self.attached {
            return Err(DisplayError::Detached(self.region.clone()));
        }
        self.source = Some(url.clone());
        Ok(())
    }

    fn source(&self) -> Option<&Url> {
        self.source.as_ref()
    }

    async fn ready(&mut self) -> Result<(), DisplayError> {
        match self.source {
            Some(_) => Ok(()),
            None => Err(DisplayError::NoSource(self.region.clone())),
        }
    }

    async fn play(&mut self) -> Result<(), DisplayError> {
        if let Some(ref url) = self.source {
            tracing::info!(region = %self.region, %url, "dry run: playing");
        }
        Ok(())
    }

    async fn ended(&mut self) -> Result<(), DisplayError> {
        tokio::time::sleep(self.duration).await;
        Ok(())
    }
}
