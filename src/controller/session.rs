//! Playback session - the session store and its handle

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::audio::Collaborators;
use crate::config::SessionConfig;
use crate::store::{self, BoxedMiddleware, Dispatcher, Store};

use super::effects::SessionEffects;
use super::state::{self, SessionEvent, SessionState};

/// Handle to a running playback session.
///
/// All transport requests and system signals become [`SessionEvent`]s on one
/// serialized store, so the session reacts to them strictly in arrival order.
#[derive(Clone)]
pub struct PlaybackSession {
    events: Dispatcher<SessionEvent>,
    state: watch::Receiver<SessionState>,
}

impl PlaybackSession {
    pub fn start(config: &SessionConfig, collaborators: Collaborators) -> (Self, JoinHandle<()>) {
        let (events, inbox) = store::channel();
        let effects: BoxedMiddleware<SessionState, SessionEvent> =
            Box::new(SessionEffects::new(config.clone(), collaborators, events.downgrade()));

        let session = Store::new(
            SessionState::default(),
            state::reduce,
            vec![store::logging("session"), effects],
        );
        let (state, task) = session.spawn(inbox);
        tracing::info!(source = %config.source, "Playback session started");

        (Self { events, state }, task)
    }

    #[cfg(test)]
    pub fn play(&self) {
        self.events.dispatch(SessionEvent::Play);
    }

    #[cfg(test)]
    pub fn pause(&self) {
        self.events.dispatch(SessionEvent::Pause);
    }

    pub fn stop(&self) {
        self.events.dispatch(SessionEvent::Stop);
    }

    pub fn dispatcher(&self) -> Dispatcher<SessionEvent> {
        self.events.clone()
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.clone()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::audio::{FocusChange, SimulatedBackend};
    use crate::config::SimulationConfig;
    use crate::controller::state::{FocusStatus, PlayerStatus, SessionStatus};
    use std::time::Duration;
    use tokio::time::{timeout, Instant};

    pub(crate) fn backend(track_secs: u64, grant_focus: bool) -> SimulatedBackend {
        SimulatedBackend::new(&SimulationConfig {
            track_length: Duration::from_secs(track_secs),
            prepare_latency: Duration::from_millis(100),
            grant_focus,
        })
    }

    pub(crate) fn start(backend: &SimulatedBackend) -> PlaybackSession {
        let (session, _task) = PlaybackSession::start(&SessionConfig::default(), backend.collaborators());
        session
    }

    pub(crate) async fn settle(
        state: &mut watch::Receiver<SessionState>,
        condition: impl FnMut(&SessionState) -> bool,
    ) -> SessionState {
        timeout(Duration::from_secs(600), state.wait_for(condition))
            .await
            .expect("session did not settle in time")
            .expect("session store stopped")
            .clone()
    }

    async fn playing(backend: &SimulatedBackend) -> (PlaybackSession, watch::Receiver<SessionState>) {
        let session = start(backend);
        let mut state = session.subscribe();
        session.play();
        settle(&mut state, SessionState::is_playing).await;
        (session, state)
    }

    #[tokio::test(start_paused = true)]
    async fn play_acquires_focus_prepares_and_starts() {
        let backend = backend(60, true);
        let (_session, state) = playing(&backend).await;

        let current = state.borrow().clone();
        assert_eq!(current.focus, FocusStatus::Held);
        assert_eq!(current.duration, Some(Duration::from_secs(60)));
        assert_eq!(backend.focus.requests(), 1);
        assert_eq!(backend.player.calls(), vec!["prepare", "start"]);
        assert!(backend.interruptions.is_registered());
        assert!(backend.presence.is_active());
        assert!(backend.presence.is_foreground());
    }

    #[tokio::test(start_paused = true)]
    async fn pause_releases_the_noisy_listener_and_keeps_focus() {
        let backend = backend(60, true);
        let (session, mut state) = playing(&backend).await;

        session.pause();
        let paused = settle(&mut state, |s| s.status == SessionStatus::Paused).await;

        assert_eq!(paused.focus, FocusStatus::Held);
        assert_eq!(backend.player.count("pause"), 1);
        assert_eq!(backend.interruptions.registrations(), 1);
        assert_eq!(backend.interruptions.unregistrations(), 1);
        assert!(!backend.presence.is_foreground());
        assert!(backend.presence.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn resuming_asks_for_focus_again() {
        let backend = backend(60, true);
        let (session, mut state) = playing(&backend).await;

        session.pause();
        settle(&mut state, |s| s.status == SessionStatus::Paused).await;
        session.play();
        settle(&mut state, SessionState::is_playing).await;

        assert_eq!(backend.focus.requests(), 2);
        assert_eq!(backend.player.count("prepare"), 1);
        assert_eq!(backend.player.count("start"), 2);
        assert_eq!(backend.interruptions.registrations(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn progress_is_polled_while_playing() {
        let backend = backend(60, true);
        let (_session, mut state) = playing(&backend).await;

        let ticked = settle(&mut state, |s| s.position >= Duration::from_secs(3)).await;

        assert!(ticked.is_playing());
        assert!(ticked.position <= Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn permanent_loss_stops_after_the_grace_period() {
        let backend = backend(600, true);
        let (_session, mut state) = playing(&backend).await;

        let lost_at = Instant::now();
        backend.focus.emit(FocusChange::LostPermanent);
        let paused = settle(&mut state, |s| s.status == SessionStatus::Paused).await;
        assert!(paused.stop_pending);

        let stopped = settle(&mut state, |s| s.status == SessionStatus::Stopped).await;

        assert!(lost_at.elapsed() >= Duration::from_secs(30));
        assert_eq!(stopped.focus, FocusStatus::Released);
        assert_eq!(backend.focus.abandons(), 1);
        assert_eq!(backend.player.count("stop"), 1);
        assert!(!backend.presence.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn regaining_focus_within_the_grace_period_cancels_the_stop() {
        let backend = backend(600, true);
        let (_session, mut state) = playing(&backend).await;

        backend.focus.emit(FocusChange::LostPermanent);
        settle(&mut state, |s| s.status == SessionStatus::Paused).await;
        tokio::time::sleep(Duration::from_secs(29)).await;

        backend.focus.emit(FocusChange::Gained);
        settle(&mut state, SessionState::is_playing).await;
        tokio::time::sleep(Duration::from_secs(60)).await;

        let current = state.borrow().clone();
        assert_eq!(current.status, SessionStatus::Playing);
        assert!(!current.stop_pending);
        assert_eq!(backend.player.count("stop"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn resuming_after_permanent_loss_outlives_the_grace_period() {
        let backend = backend(600, true);
        let (session, mut state) = playing(&backend).await;

        backend.focus.emit(FocusChange::LostPermanent);
        settle(&mut state, |s| s.status == SessionStatus::Paused).await;
        tokio::time::sleep(Duration::from_secs(5)).await;

        session.play();
        let resumed = settle(&mut state, SessionState::is_playing).await;
        assert!(!resumed.stop_pending);
        tokio::time::sleep(Duration::from_secs(40)).await;

        assert_eq!(session.state().status, SessionStatus::Playing);
        assert_eq!(backend.player.count("stop"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_loss_pauses_and_gain_resumes() {
        let backend = backend(600, true);
        let (_session, mut state) = playing(&backend).await;

        backend.focus.emit(FocusChange::LostTransientCanDuck);
        let paused = settle(&mut state, |s| s.status == SessionStatus::Paused).await;
        assert_eq!(paused.focus, FocusStatus::Suspended);
        assert!(!paused.stop_pending);

        backend.focus.emit(FocusChange::Gained);
        settle(&mut state, SessionState::is_playing).await;
        assert_eq!(backend.player.count("start"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn denied_focus_never_starts_the_player() {
        let backend = backend(60, false);
        let session = start(&backend);
        let mut state = session.subscribe();

        session.play();
        settle(&mut state, |s| s.player == PlayerStatus::Ready).await;
        tokio::time::sleep(Duration::from_secs(5)).await;

        let current = session.state();
        assert_eq!(current.status, SessionStatus::Idle);
        assert_eq!(current.focus, FocusStatus::Released);
        assert_eq!(current.position, Duration::ZERO);
        assert_eq!(backend.player.count("start"), 0);
        assert_eq!(backend.focus.abandons(), 0);
        assert!(!backend.interruptions.is_registered());
    }

    #[tokio::test(start_paused = true)]
    async fn preparation_failure_is_reported_and_recoverable() {
        let backend = backend(60, true);
        backend.player.set_unreachable(true);
        let session = start(&backend);
        let mut state = session.subscribe();

        session.play();
        let failed = settle(&mut state, |s| s.last_error.is_some()).await;

        assert_eq!(failed.status, SessionStatus::Idle);
        assert_eq!(failed.focus, FocusStatus::Released);
        assert_eq!(backend.player.count("start"), 0);
        assert_eq!(backend.focus.abandons(), 1);

        backend.player.set_unreachable(false);
        session.play();
        let recovered = settle(&mut state, SessionState::is_playing).await;
        assert_eq!(recovered.last_error, None);
    }

    #[tokio::test(start_paused = true)]
    async fn noisy_output_pauses_playback() {
        let backend = backend(60, true);
        let (_session, mut state) = playing(&backend).await;

        backend.interruptions.trigger();
        settle(&mut state, |s| s.status == SessionStatus::Paused).await;

        assert!(!backend.interruptions.is_registered());
        assert_eq!(backend.player.count("pause"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn completion_stops_at_the_end_of_the_track() {
        let backend = backend(5, true);
        let (_session, mut state) = playing(&backend).await;

        let done = settle(&mut state, |s| s.status == SessionStatus::Stopped).await;

        assert_eq!(done.position, Duration::from_secs(5));
        assert!(!done.is_playing());
        assert_eq!(backend.player.count("stop"), 1);
        assert!(!backend.interruptions.is_registered());
        assert!(!backend.presence.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_while_preparing_discards_the_late_outcome() {
        let backend = backend(60, true);
        let session = start(&backend);
        let mut state = session.subscribe();

        session.play();
        session.stop();
        settle(&mut state, |s| s.status == SessionStatus::Stopped).await;
        tokio::time::sleep(Duration::from_secs(5)).await;

        let current = session.state();
        assert_eq!(current.status, SessionStatus::Stopped);
        assert_eq!(current.player, PlayerStatus::Unprepared);
        assert_eq!(backend.player.count("start"), 0);
    }
}
