//! Simulated platform collaborators
//!
//! The player keeps time with the tokio clock, so paused-clock tests can drive
//! whole playback scenarios. Every collaborator records what the session asked
//! of it; the demo uses the same handles to inject system signals.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use anyhow::{bail, Result};
use futures::future::{self, BoxFuture, FutureExt};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::{
    AudioFocus, Callback, Collaborators, FocusChange, FocusListener, FocusRequestResult,
    InterruptionSource, MediaPlayer, SessionPresence,
};
use crate::config::SimulationConfig;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Default)]
struct PlayerClock {
    prepared: bool,
    offset: Duration,
    started_at: Option<Instant>,
    on_completion: Option<Callback>,
    completion: Option<JoinHandle<()>>,
}

impl PlayerClock {
    fn position(&self, length: Duration) -> Duration {
        let running = self.started_at.map(|at| at.elapsed()).unwrap_or_default();
        (self.offset + running).min(length)
    }

    fn halt(&mut self, length: Duration) {
        self.offset = self.position(length);
        self.started_at = None;
        if let Some(completion) = self.completion.take() {
            completion.abort();
        }
    }
}

/// A player that "plays" a track of fixed length against the tokio clock
pub struct SimulatedPlayer {
    length: Duration,
    prepare_latency: Duration,
    clock: Arc<Mutex<PlayerClock>>,
    unreachable: AtomicBool,
    calls: Mutex<Vec<&'static str>>,
}

impl SimulatedPlayer {
    pub fn new(length: Duration, prepare_latency: Duration) -> Self {
        Self {
            length,
            prepare_latency,
            clock: Arc::new(Mutex::new(PlayerClock::default())),
            unreachable: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Make subsequent `prepare` calls fail as if the source could not be reached.
    #[cfg(test)]
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    #[cfg(test)]
    pub fn calls(&self) -> Vec<&'static str> {
        lock(&self.calls).clone()
    }

    #[cfg(test)]
    pub fn count(&self, call: &str) -> usize {
        lock(&self.calls).iter().filter(|c| **c == call).count()
    }

    fn record(&self, call: &'static str) {
        lock(&self.calls).push(call);
    }
}

impl MediaPlayer for SimulatedPlayer {
    fn prepare(&self, source: &str) -> BoxFuture<'static, Result<Option<Duration>>> {
        self.record("prepare");
        let clock = self.clock.clone();
        let latency = self.prepare_latency;
        let length = self.length;
        let unreachable = self.unreachable.load(Ordering::SeqCst) || source.trim().is_empty();
        let source = source.to_string();

        async move {
            tokio::time::sleep(latency).await;
            if unreachable {
                bail!("source unreachable: {source:?}");
            }
            let mut clock = lock(&clock);
            clock.prepared = true;
            clock.offset = Duration::ZERO;
            Ok(Some(length))
        }
        .boxed()
    }

    fn start(&self) {
        self.record("start");
        let mut clock = lock(&self.clock);
        if !clock.prepared {
            tracing::warn!("start() called on an unprepared player");
            return;
        }
        if clock.started_at.is_some() {
            return;
        }

        clock.started_at = Some(Instant::now());
        let remaining = self.length.saturating_sub(clock.offset);
        if let Some(listener) = clock.on_completion.clone() {
            clock.completion = Some(tokio::spawn(async move {
                tokio::time::sleep(remaining).await;
                tracing::debug!("Simulated track reached its end");
                listener();
            }));
        }
    }

    fn pause(&self) {
        self.record("pause");
        lock(&self.clock).halt(self.length);
    }

    fn stop(&self) {
        self.record("stop");
        let mut clock = lock(&self.clock);
        clock.halt(self.length);
        clock.prepared = false;
        clock.offset = Duration::ZERO;
    }

    fn current_position(&self) -> Duration {
        lock(&self.clock).position(self.length)
    }

    fn duration(&self) -> Option<Duration> {
        lock(&self.clock).prepared.then_some(self.length)
    }

    fn set_completion_listener(&self, listener: Callback) {
        lock(&self.clock).on_completion = Some(listener);
    }
}

/// System audio focus with a configurable grant policy
pub struct SimulatedAudioFocus {
    grant: AtomicBool,
    holder: Mutex<Option<FocusListener>>,
    requests: AtomicUsize,
    abandons: AtomicUsize,
}

impl SimulatedAudioFocus {
    pub fn new(grant: bool) -> Self {
        Self {
            grant: AtomicBool::new(grant),
            holder: Mutex::new(None),
            requests: AtomicUsize::new(0),
            abandons: AtomicUsize::new(0),
        }
    }

    pub fn grants(&self) -> bool {
        self.grant.load(Ordering::SeqCst)
    }

    pub fn set_grant(&self, grant: bool) {
        self.grant.store(grant, Ordering::SeqCst);
    }

    /// Deliver a focus change to the current holder, as another app would cause.
    pub fn emit(&self, change: FocusChange) {
        let holder = lock(&self.holder).clone();
        match holder {
            Some(listener) => listener(change),
            None => tracing::debug!(?change, "Focus change with no holder"),
        }
    }

    #[cfg(test)]
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    #[cfg(test)]
    pub fn abandons(&self) -> usize {
        self.abandons.load(Ordering::SeqCst)
    }
}

impl AudioFocus for SimulatedAudioFocus {
    fn request(&self, listener: FocusListener) -> BoxFuture<'static, FocusRequestResult> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let result = if self.grant.load(Ordering::SeqCst) {
            *lock(&self.holder) = Some(listener);
            FocusRequestResult::Granted
        } else {
            FocusRequestResult::Denied
        };
        future::ready(result).boxed()
    }

    fn abandon(&self) {
        self.abandons.fetch_add(1, Ordering::SeqCst);
        lock(&self.holder).take();
    }
}

/// Noisy-output signal source
#[derive(Default)]
pub struct SimulatedInterruptions {
    receiver: Mutex<Option<Callback>>,
    registrations: AtomicUsize,
    unregistrations: AtomicUsize,
}

impl SimulatedInterruptions {
    /// Simulate the output device being unplugged.
    pub fn trigger(&self) {
        let receiver = lock(&self.receiver).clone();
        match receiver {
            Some(on_noisy) => on_noisy(),
            None => tracing::debug!("Output removed while nobody was listening"),
        }
    }

    #[cfg(test)]
    pub fn is_registered(&self) -> bool {
        lock(&self.receiver).is_some()
    }

    #[cfg(test)]
    pub fn registrations(&self) -> usize {
        self.registrations.load(Ordering::SeqCst)
    }

    #[cfg(test)]
    pub fn unregistrations(&self) -> usize {
        self.unregistrations.load(Ordering::SeqCst)
    }
}

impl InterruptionSource for SimulatedInterruptions {
    fn register(&self, on_noisy: Callback) {
        self.registrations.fetch_add(1, Ordering::SeqCst);
        if lock(&self.receiver).replace(on_noisy).is_some() {
            tracing::warn!("Noisy receiver registered twice");
        }
    }

    fn unregister(&self) {
        self.unregistrations.fetch_add(1, Ordering::SeqCst);
        if lock(&self.receiver).take().is_none() {
            tracing::warn!("Noisy receiver unregistered while not registered");
        }
    }
}

/// Presence that only records and logs what a real foreground service would show
#[derive(Default)]
pub struct LoggingPresence {
    active: AtomicBool,
    foreground: AtomicBool,
}

impl LoggingPresence {
    #[cfg(test)]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    #[cfg(test)]
    pub fn is_foreground(&self) -> bool {
        self.foreground.load(Ordering::SeqCst)
    }
}

impl SessionPresence for LoggingPresence {
    fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::SeqCst);
        tracing::info!(active, "Media session activation changed");
    }

    fn start_foreground(&self) {
        self.foreground.store(true, Ordering::SeqCst);
        tracing::info!("Entered foreground with playback notification");
    }

    fn stop_foreground(&self) {
        self.foreground.store(false, Ordering::SeqCst);
        tracing::info!("Left foreground, notification kept");
    }
}

/// All simulated collaborators, with concrete handles kept for introspection
#[derive(Clone)]
pub struct SimulatedBackend {
    pub player: Arc<SimulatedPlayer>,
    pub focus: Arc<SimulatedAudioFocus>,
    pub interruptions: Arc<SimulatedInterruptions>,
    pub presence: Arc<LoggingPresence>,
}

impl SimulatedBackend {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            player: Arc::new(SimulatedPlayer::new(config.track_length, config.prepare_latency)),
            focus: Arc::new(SimulatedAudioFocus::new(config.grant_focus)),
            interruptions: Arc::new(SimulatedInterruptions::default()),
            presence: Arc::new(LoggingPresence::default()),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            player: self.player.clone(),
            focus: self.focus.clone(),
            interruptions: self.interruptions.clone(),
            presence: self.presence.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn player_advances_only_while_started() {
        let player = SimulatedPlayer::new(Duration::from_secs(60), Duration::from_millis(100));

        let duration = player.prepare("file:///song.mp3").await.unwrap();
        assert_eq!(duration, Some(Duration::from_secs(60)));

        player.start();
        tokio::time::sleep(Duration::from_secs(10)).await;
        player.pause();
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(player.current_position(), Duration::from_secs(10));
        assert_eq!(player.calls(), vec!["prepare", "start", "pause"]);
    }

    #[tokio::test(start_paused = true)]
    async fn player_reports_completion_at_the_end_of_the_track() {
        let player = SimulatedPlayer::new(Duration::from_secs(3), Duration::ZERO);
        let completed = Arc::new(AtomicUsize::new(0));
        let counter = completed.clone();
        player.set_completion_listener(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        player.prepare("file:///song.mp3").await.unwrap();
        player.start();
        tokio::time::sleep(Duration::from_secs(4)).await;

        assert_eq!(completed.load(Ordering::SeqCst), 1);
        assert_eq!(player.current_position(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn unreachable_source_fails_preparation() {
        let player = SimulatedPlayer::new(Duration::from_secs(60), Duration::ZERO);
        player.set_unreachable(true);

        assert!(player.prepare("https://nowhere.invalid/a.mp3").await.is_err());
        assert_eq!(player.duration(), None);
    }

    #[tokio::test]
    async fn focus_changes_reach_only_the_current_holder() {
        let focus = SimulatedAudioFocus::new(true);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let record = seen.clone();

        let result = focus
            .request(Arc::new(move |change: FocusChange| lock(&record).push(change)))
            .await;
        focus.emit(FocusChange::LostTransient);
        focus.abandon();
        focus.emit(FocusChange::Gained);

        assert_eq!(result, FocusRequestResult::Granted);
        assert_eq!(*lock(&seen), vec![FocusChange::LostTransient]);
    }
}
