use serde::{Deserialize, Serialize};

/// Reference to a single listed video.
///
/// `guid` resolves the playback URL, `name` is the key the backend deletes by.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VideoSummary {
    pub guid: String,
    pub name: String,
    /// Original post URL, when the backend includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// One page of the cursor-paginated video listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct VideoPage {
    #[serde(default)]
    pub videos: Vec<VideoSummary>,
    /// Cursor for the next page. `None` marks the terminal page.
    #[serde(default)]
    pub after: Option<String>,
    #[serde(default)]
    pub count: u64,
}

impl VideoPage {
    /// A page with no cursor: nothing further exists.
    pub fn is_terminal(&self) -> bool {
        self.after.is_none()
    }

    /**
        An empty page that still carries a cursor.

        The backend ingests videos asynchronously, so this means
        "not yet available", never "done".
    */
    pub fn is_transient_empty(&self) -> bool {
        self.videos.is_empty() && self.after.is_some()
    }
}
