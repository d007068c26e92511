//! Session state listener feeding the media-screen store

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::model::{Action, PlaybackSnapshot};
use crate::store::WeakDispatcher;

use super::state::SessionState;

/// Push a `PlaybackStateUpdated` into the media store whenever the session's
/// playback snapshot changes. Stops once either store has shut down.
pub fn forward_playback_updates(
    mut session: watch::Receiver<SessionState>,
    media: WeakDispatcher<Action>,
) -> JoinHandle<()> {
    tracing::info!("Starting playback update bridge");

    tokio::spawn(async move {
        let mut last: Option<PlaybackSnapshot> = None;
        loop {
            let snapshot = session.borrow_and_update().snapshot();
            if last != Some(snapshot) {
                tracing::trace!(?snapshot, "Forwarding playback snapshot");
                if !media.dispatch(Action::PlaybackStateUpdated(snapshot)) {
                    break;
                }
                last = Some(snapshot);
            }

            if session.changed().await.is_err() {
                break;
            }
        }
        tracing::debug!("Playback update bridge shutting down");
    })
}
