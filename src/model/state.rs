//! Media-screen state

use std::time::Duration;

use super::types::Screen;

/// Immutable snapshot rendered by the presentation layer.
///
/// `progress` is always within `[0, 1]`. `elapsed` and `length` back the
/// time label next to the progress bar.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct MediaState {
    pub is_playing: bool,
    pub progress: f32,
    pub elapsed: Duration,
    pub length: Option<Duration>,
    pub screen: Screen,
}
