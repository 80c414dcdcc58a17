mod capability;
mod config;
mod controls;
mod session;
mod state;
mod video_id;

#[cfg(test)]
mod testing;

use thiserror::Error;

pub use capability::{
    Capability, InstanceId, PlaybackState, PlayerEvent, PlayerInstance, PlayerOptions,
};
pub use config::SessionConfig;
pub use controls::{PlaybackControls, Speed};
pub use session::{Lifecycle, Player, Session};
pub use state::{format_time, PlayerState, PLAYBACK_RATES};
pub use video_id::{resolve, ParseResult, VideoId};

/// Reason a raw input was rejected by [`resolve`].
///
/// The `Display` output is meant to be shown to the user as is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Please enter a URL or video ID")]
    Empty,
    #[error("Invalid URL or video ID. Please check your input and try again.")]
    Invalid,
}
