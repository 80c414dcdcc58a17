use serde::{Deserialize, Serialize};

/// Speed multiples offered by the controls panel.
pub const PLAYBACK_RATES: [f64; 8] = [0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 1.75, 2.0];

/// Local mirror of the external player's observable attributes.
///
/// Everything but `ready` is only meaningful while `ready` is true.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub ready: bool,
    pub muted: bool,
    /// `0..=100`
    pub volume: u8,
    pub playback_rate: f64,
    /// Seconds.
    pub current_time: f64,
    /// Seconds. Live sources report zero.
    pub duration: f64,
}

/// State shown while no player has reported readiness.
pub(crate) const IDLE: PlayerState = PlayerState {
    ready: false,
    muted: false,
    volume: 100,
    playback_rate: 1.0,
    current_time: 0.0,
    duration: 0.0,
};

impl Default for PlayerState {
    fn default() -> Self {
        IDLE
    }
}

impl PlayerState {
    /// The volume as it should be displayed: zero while muted.
    pub fn displayed_volume(&self) -> u8 {
        if self.muted {
            0
        } else {
            self.volume
        }
    }
}

/// Reported times may be negative or NaN while the player is still buffering.
pub(crate) fn sanitize_seconds(seconds: f64) -> f64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    }
}

/// Formats seconds as `m:ss`.
pub fn format_time(seconds: f64) -> String {
    let seconds = sanitize_seconds(seconds) as u64;
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
