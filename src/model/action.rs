//! Actions the media screen can dispatch

use super::playback::PlaybackSnapshot;
use super::types::Screen;

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    /// The user toggled transport.
    ClickPlayPause,
    /// A snapshot pushed by the playback session.
    PlaybackStateUpdated(PlaybackSnapshot),
    /// Request to move to another screen.
    Navigate(Screen),
}
