//! Controller module - Playback session and application wiring
//!
//! This module owns the playback session, wires it to the media-screen store,
//! and maps user input to actions and simulated system signals.
//! It is organized into submodules by responsibility:
//!
//! - `state`: Session state, events and the pure session reducer
//! - `tasks`: Cancellable ticker, one-shot timer and async result tasks
//! - `focus`: Audio focus arbitration
//! - `effects`: Post-reducer interceptor performing session side effects
//! - `session`: The session store and its handle
//! - `transport`: Media-store interceptors (transport, navigation guard)
//! - `bridge`: Session state listener feeding the media store
//! - `input`: Key event handling

mod state;
mod tasks;
mod focus;
mod effects;
mod session;
mod transport;
mod bridge;
mod input;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use crate::audio::SimulatedBackend;
use crate::config::AppConfig;
use crate::model::{self, Action, MediaState};
use crate::store::{self, Dispatcher, Store};

use session::PlaybackSession;
pub use state::{SessionState, SessionStatus};

#[derive(Clone)]
pub struct AppController {
    pub(crate) media: Dispatcher<Action>,
    media_state: watch::Receiver<MediaState>,
    pub(crate) session: PlaybackSession,
    /// Handles used to inject system signals the way the platform would.
    pub(crate) signals: SimulatedBackend,
    should_quit: Arc<AtomicBool>,
}

impl AppController {
    /// Start the playback session on the simulated platform and the media
    /// store in front of it.
    pub fn start(config: &AppConfig) -> Self {
        let signals = SimulatedBackend::new(&config.simulation);
        let (session, _session_task) = PlaybackSession::start(&config.session, signals.collaborators());

        let (media, inbox) = store::channel();
        let media_store = Store::new(
            MediaState::default(),
            model::reduce,
            vec![
                store::logging("media"),
                transport::navigation_guard(),
                transport::transport_controls(session.dispatcher()),
            ],
        );
        let (media_state, _media_task) = media_store.spawn(inbox);
        bridge::forward_playback_updates(session.subscribe(), media.downgrade());

        Self {
            media,
            media_state,
            session,
            signals,
            should_quit: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn media_state(&self) -> MediaState {
        self.media_state.borrow().clone()
    }

    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit.load(Ordering::SeqCst)
    }

    pub(crate) fn quit(&self) {
        tracing::info!("Quit requested");
        self.should_quit.store(true, Ordering::SeqCst);
    }

    #[cfg(test)]
    pub(crate) fn subscribe_media(&self) -> watch::Receiver<MediaState> {
        self.media_state.clone()
    }
}
