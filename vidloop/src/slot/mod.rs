mod player;
mod session;

pub use player::{SlotError, SlotPlayer, SlotReport};
pub use session::PlaybackSession;
