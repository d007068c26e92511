//! Playback session state, events and the pure session reducer

use std::time::Duration;

use crate::audio::{FocusChange, FocusRequestResult};
use crate::model::PlaybackSnapshot;

/// Transport status of the session
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// No active session.
    #[default]
    Idle,
    /// Play requested, waiting for focus and/or the player to become ready.
    Preparing,
    Playing,
    Paused,
    Stopped,
}

/// Where the session stands with the shared audio output
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FocusStatus {
    #[default]
    Released,
    Pending,
    Held,
    /// Temporarily taken by someone else; the system will hand it back.
    Suspended,
    /// Permanently taken by someone else.
    Lost,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PlayerStatus {
    #[default]
    Unprepared,
    Preparing,
    Ready,
}

/// Everything that can happen to a playback session
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    Play,
    Pause,
    Stop,
    FocusResolved(FocusRequestResult),
    FocusChanged(FocusChange),
    /// The output device was removed.
    BecomingNoisy,
    PlayerPrepared { duration: Option<Duration> },
    PrepareFailed(String),
    /// Playback reached the end of the source on its own.
    Completed,
    Progress { position: Duration, duration: Option<Duration> },
    /// The grace period armed as `generation` ran out.
    DelayedStopElapsed { generation: u64 },
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct SessionState {
    pub status: SessionStatus,
    pub focus: FocusStatus,
    pub player: PlayerStatus,
    /// Whether playback should begin once focus and player are both ready.
    pub wants_play: bool,
    /// A permanent focus loss armed the delayed stop.
    pub stop_pending: bool,
    /// Bumped each time the delayed stop is armed. Expiries from an earlier
    /// arming are ignored.
    pub stop_generation: u64,
    pub position: Duration,
    pub duration: Option<Duration>,
    pub last_error: Option<String>,
}

impl SessionState {
    pub fn is_playing(&self) -> bool {
        self.status == SessionStatus::Playing
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            position: self.position,
            duration: self.duration,
            is_playing: self.is_playing(),
        }
    }

    /// Status to settle on when not playing and not stopped.
    fn resting_status(&self) -> SessionStatus {
        match self.player {
            PlayerStatus::Ready => SessionStatus::Paused,
            PlayerStatus::Unprepared | PlayerStatus::Preparing => SessionStatus::Idle,
        }
    }

    fn begin_playing_if_ready(&mut self) {
        if self.wants_play && self.focus == FocusStatus::Held && self.player == PlayerStatus::Ready {
            self.status = SessionStatus::Playing;
            self.last_error = None;
        }
    }

    fn request_play(&mut self) {
        if self.status == SessionStatus::Playing {
            return;
        }
        self.wants_play = true;
        // Focus is asked for anew on every start. An already pending request
        // stays the only one in flight.
        self.focus = FocusStatus::Pending;
        if self.player == PlayerStatus::Unprepared {
            self.player = PlayerStatus::Preparing;
        }
        self.status = SessionStatus::Preparing;
    }

    fn pause(&mut self) {
        self.wants_play = false;
        match self.status {
            SessionStatus::Playing => self.status = SessionStatus::Paused,
            SessionStatus::Preparing => self.status = self.resting_status(),
            SessionStatus::Idle | SessionStatus::Paused | SessionStatus::Stopped => {}
        }
    }

    fn arm_stop(&mut self) {
        if self.status == SessionStatus::Stopped || self.stop_pending {
            return;
        }
        self.stop_pending = true;
        self.stop_generation = self.stop_generation.wrapping_add(1);
    }

    fn stop(&mut self) {
        self.status = SessionStatus::Stopped;
        self.focus = FocusStatus::Released;
        self.player = PlayerStatus::Unprepared;
        self.wants_play = false;
        self.stop_pending = false;
        self.position = Duration::ZERO;
    }
}

/// Pure session transition. Signals that no longer apply to the current state
/// (stale focus results, late preparation outcomes, ticks after the session
/// stopped) are ignored.
pub fn reduce(state: &SessionState, event: SessionEvent) -> SessionState {
    let mut next = state.clone();

    match event {
        SessionEvent::Play => next.request_play(),
        SessionEvent::Pause | SessionEvent::BecomingNoisy => next.pause(),
        SessionEvent::Stop => next.stop(),

        SessionEvent::FocusResolved(result) => {
            if state.focus != FocusStatus::Pending {
                return next;
            }
            match result {
                FocusRequestResult::Granted => {
                    // A fresh grant is a regain; the armed stop no longer applies.
                    next.focus = FocusStatus::Held;
                    next.stop_pending = false;
                    next.begin_playing_if_ready();
                }
                FocusRequestResult::Denied => {
                    next.focus = FocusStatus::Released;
                    next.pause();
                }
            }
        }

        SessionEvent::FocusChanged(change) => match change {
            FocusChange::Gained => {
                next.stop_pending = false;
                match state.status {
                    SessionStatus::Playing => next.focus = FocusStatus::Held,
                    SessionStatus::Paused | SessionStatus::Preparing => next.request_play(),
                    SessionStatus::Idle | SessionStatus::Stopped => {}
                }
            }
            FocusChange::LostPermanent => {
                next.focus = FocusStatus::Lost;
                next.pause();
                next.arm_stop();
            }
            // Ducking is not implemented; both transient losses pause.
            FocusChange::LostTransient | FocusChange::LostTransientCanDuck => {
                if matches!(state.focus, FocusStatus::Held | FocusStatus::Pending) {
                    next.focus = FocusStatus::Suspended;
                }
                next.pause();
            }
        },

        SessionEvent::PlayerPrepared { duration } => {
            if state.player != PlayerStatus::Preparing {
                return next;
            }
            next.player = PlayerStatus::Ready;
            next.duration = duration;
            next.begin_playing_if_ready();
        }

        SessionEvent::PrepareFailed(reason) => {
            if state.player != PlayerStatus::Preparing {
                return next;
            }
            next.player = PlayerStatus::Unprepared;
            next.last_error = Some(reason);
            next.focus = FocusStatus::Released;
            next.pause();
        }

        SessionEvent::Completed => {
            if matches!(state.status, SessionStatus::Idle | SessionStatus::Stopped) {
                return next;
            }
            let end = state.duration.unwrap_or(state.position);
            next.stop();
            next.position = end;
        }

        SessionEvent::Progress { position, duration } => {
            if matches!(state.status, SessionStatus::Idle | SessionStatus::Stopped) {
                return next;
            }
            next.position = position;
            next.duration = duration;
        }

        SessionEvent::DelayedStopElapsed { generation } => {
            if state.stop_pending && generation == state.stop_generation {
                next.stop();
            }
        }
    }

    next
}
