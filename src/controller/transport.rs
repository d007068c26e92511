//! Interceptors wired into the media-screen store

use crate::model::{Action, MediaState};
use crate::store::{self, BoxedMiddleware, Dispatcher};

use super::state::SessionEvent;

/// Forward play/pause clicks to the playback session.
///
/// The media state does not change on a click. It follows once the session
/// reports its new state through the bridge.
pub fn transport_controls(session: Dispatcher<SessionEvent>) -> BoxedMiddleware<MediaState, Action> {
    store::pre_reducer(move |state: &MediaState, action: &Action| match action {
        Action::ClickPlayPause => {
            let event = if state.is_playing {
                SessionEvent::Pause
            } else {
                SessionEvent::Play
            };
            tracing::info!(?event, "Play/pause clicked");
            session.dispatch(event);
        }
        Action::PlaybackStateUpdated(_) | Action::Navigate(_) => {}
    })
}

/// Veto navigation to the screen already shown.
pub fn navigation_guard() -> BoxedMiddleware<MediaState, Action> {
    store::middleware(|state: &MediaState, action: Action, next| match action {
        Action::Navigate(target) if target == state.screen => {
            tracing::debug!(screen = target.title(), "Already on screen, navigation vetoed");
            Ok(state.clone())
        }
        Action::Navigate(target) => {
            tracing::info!(from = state.screen.title(), to = target.title(), "Navigating");
            next(action)
        }
        Action::ClickPlayPause | Action::PlaybackStateUpdated(_) => next(action),
    })
}
