use crate::VideoId;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-unique tag of one external player instance.
///
/// Hosts attach it to every event they forward so that callbacks from a
/// superseded instance can be told apart from the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstanceId(u64);

impl InstanceId {
    pub(crate) fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(0);
        InstanceId(NEXT_ID.fetch_add(1, Ordering::SeqCst))
    }
}

/// Embed options passed along with every player creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerOptions {
    /// Show the provider's built-in controls.
    pub controls: bool,
    /// Show the provider's branding overlay.
    pub branding: bool,
    /// Suggest related videos when playback ends.
    pub related: bool,
}

impl PlayerOptions {
    /// The options as embed parameters (`controls`, `modestbranding`, `rel`).
    pub fn player_vars(&self) -> [(&'static str, u8); 3] {
        [
            ("controls", self.controls as u8),
            ("modestbranding", !self.branding as u8),
            ("rel", self.related as u8),
        ]
    }
}

/// Playback state reported by the external player on state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaybackState {
    Unstarted,
    Ended,
    Playing,
    Paused,
    Buffering,
    Cued,
}

impl PlaybackState {
    /// Maps the provider's numeric state code.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(PlaybackState::Unstarted),
            0 => Some(PlaybackState::Ended),
            1 => Some(PlaybackState::Playing),
            2 => Some(PlaybackState::Paused),
            3 => Some(PlaybackState::Buffering),
            5 => Some(PlaybackState::Cued),
            _ => None,
        }
    }

    /// Get the provider's numeric state code.
    pub fn code(self) -> i32 {
        match self {
            PlaybackState::Unstarted => -1,
            PlaybackState::Ended => 0,
            PlaybackState::Playing => 1,
            PlaybackState::Paused => 2,
            PlaybackState::Buffering => 3,
            PlaybackState::Cued => 5,
        }
    }
}

/// Callback from an external player instance, forwarded by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    /// The instance finished initializing.
    Ready,
    /// The instance changed playback state.
    StateChange(PlaybackState),
}

/// A live external player.
///
/// Calls are fire-and-forget: results show up later through getters or
/// [`PlayerEvent`]s.
pub trait PlayerInstance {
    fn play(&mut self);
    fn pause(&mut self);
    fn seek_to(&mut self, seconds: f64, allow_seek_ahead: bool);
    fn mute(&mut self);
    fn unmute(&mut self);
    fn is_muted(&self) -> bool;
    fn volume(&self) -> u8;
    fn set_volume(&mut self, volume: u8);
    fn playback_rate(&self) -> f64;
    fn set_playback_rate(&mut self, rate: f64);
    fn current_time(&self) -> f64;
    fn duration(&self) -> f64;
    /// Releases the instance. Called exactly once per instance.
    fn destroy(&mut self);
}

/// The host's video widget library, injected into [`Player`](crate::Player).
pub trait Capability {
    /// Where instances get mounted (e.g. a DOM node handle).
    type Container;
    type Instance: PlayerInstance;

    /// Whether the widget library finished loading and can create players.
    fn is_bootstrapped(&self) -> bool;

    /// Creates a player for `video` inside `container`.
    ///
    /// Only called once [`is_bootstrapped`](Capability::is_bootstrapped)
    /// returned `true`. Events of the new instance must be forwarded tagged
    /// with `instance`.
    fn create_player(
        &mut self,
        container: &Self::Container,
        video: &VideoId,
        options: &PlayerOptions,
        instance: InstanceId,
    ) -> Self::Instance;
}
