mod client;
mod error;
mod types;

pub use client::{ApiClient, ApiConfig, http_client};
pub use error::ApiError;
pub use types::{VideoPage, VideoSummary};

use url::Url;

/**
    Capability the paginator and slot players need from the backend.

    `ApiClient` is the HTTP implementation; tests script their own.
*/
pub trait VideoApi {
    /// Fetch one page of the listing. `None` for `after` requests the first page.
    async fn fetch_video_page(
        &self,
        after: Option<&str>,
        count: Option<u64>,
    ) -> Result<VideoPage, ApiError>;

    /// Resolve the playable media URL for a listed video.
    async fn fetch_playback_url(&self, guid: &str) -> Result<Url, ApiError>;

    /// Delete a video's server record.
    async fn delete(&self, name: &str) -> Result<(), ApiError>;

    /**
        Delete a video's server record, optionally swallowing the failure.

        Suppressed failures are logged and reported as success.
    */
    async fn delete_video(&self, name: &str, suppress_error: bool) -> Result<(), ApiError> {
        match self.delete(name).await {
            Ok(()) => Ok(()),
            Err(e) if suppress_error => {
                tracing::warn!(name, error = %e, "ignoring failed delete");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
