use thiserror::Error;

/**
    Errors from a display region.

    `Media` errors concern the loaded video only; everything else means
    the region itself cannot play anything.
*/
#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("media failed: {0}")]
    Media(String),

    #[error("failed to start player '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no media element attached to region '{0}'")]
    Detached(String),

    #[error("no source loaded in region '{0}'")]
    NoSource(String),
}

impl DisplayError {
    pub fn is_media(&self) -> bool {
        matches!(self, DisplayError::Media(_))
    }
}
