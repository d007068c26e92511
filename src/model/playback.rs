//! Playback snapshots and progress derivation

use std::time::Duration;

/// Last known transport snapshot reported by the playback session
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct PlaybackSnapshot {
    pub position: Duration,
    pub duration: Option<Duration>,
    pub is_playing: bool,
}

/// Fraction of the track played, always within `[0, 1]`.
///
/// Unknown or zero durations yield `0` rather than dividing by zero.
pub fn progress_fraction(position: Duration, duration: Option<Duration>) -> f32 {
    match duration {
        Some(duration) if !duration.is_zero() => {
            (position.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0) as f32
        }
        _ => 0.0,
    }
}
