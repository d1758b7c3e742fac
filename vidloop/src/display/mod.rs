mod command;
mod dry_run;
mod error;

pub use command::{CommandDisplay, PlayerCommand};
pub use dry_run::DryRunDisplay;
pub use error::DisplayError;

use url::Url;

/**
    One display region and the media element currently attached to it.

    Slot players drive this through a fixed sequence per video: `clear`,
    `attach`, `load`, then await `ready`, `play` and `ended`. The awaitable
    steps stand in for media element lifecycle events. Players spawned per
    video, a dry-run logger, and test doubles all implement it.
*/
pub trait Surface {
    /// Identifier of the region, used in logs.
    fn region(&self) -> &str;

    /// Detach and discard the attached element, if any.
    fn clear(&mut self);

    /// Attach a fresh element without a source. The region is never empty while URLs resolve.
    fn attach(&mut self);

    /// Assign a media source to the attached element.
    fn load(&mut self, url: &Url) -> Result<(), DisplayError>;

    /// The source of the attached element, if one was loaded.
    fn source(&self) -> Option<&Url>;

    /// Resolves once the loaded media can start.
    async fn ready(&mut self) -> Result<(), DisplayError>;

    /// Start playback.
    async fn play(&mut self) -> Result<(), DisplayError>;

    /// Resolves once playback has completed.
    async fn ended(&mut self) -> Result<(), DisplayError>;
}
