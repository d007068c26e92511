//! Pure reducer for the media screen

use super::action::Action;
use super::playback::progress_fraction;
use super::state::MediaState;

pub fn reduce(state: &MediaState, action: Action) -> MediaState {
    match action {
        // Transport effects live in the transport interceptor; the state only
        // changes once the session reports back.
        Action::ClickPlayPause => state.clone(),
        Action::PlaybackStateUpdated(snapshot) => MediaState {
            is_playing: snapshot.is_playing,
            progress: progress_fraction(snapshot.position, snapshot.duration),
            elapsed: snapshot.position,
            length: snapshot.duration,
            ..state.clone()
        },
        Action::Navigate(screen) => MediaState {
            screen,
            ..state.clone()
        },
    }
}
