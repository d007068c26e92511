//! Session side effects
//!
//! The session reducer only decides what the session should be. This
//! interceptor looks at each committed transition (previous state, reduced
//! state, triggering event) and performs the matching collaborator calls:
//! starting and pausing the player, balancing the noisy-output listener,
//! foreground presence, the progress ticker and the delayed stop.

use std::sync::Arc;

use crate::audio::{Collaborators, FocusRequestResult, InterruptionSource, MediaPlayer, SessionPresence};
use crate::config::SessionConfig;
use crate::store::{DispatchError, Middleware, Next, WeakDispatcher};

use super::focus::FocusArbitrator;
use super::state::{FocusStatus, PlayerStatus, SessionEvent, SessionState, SessionStatus};
use super::tasks::{self, ScheduledTask};

pub struct SessionEffects {
    config: SessionConfig,
    player: Arc<dyn MediaPlayer>,
    interruptions: Arc<dyn InterruptionSource>,
    presence: Arc<dyn SessionPresence>,
    arbitrator: FocusArbitrator,
    events: WeakDispatcher<SessionEvent>,
    ticker: ScheduledTask,
    delayed_stop: ScheduledTask,
    preparation: ScheduledTask,
    noisy_registered: bool,
}

impl SessionEffects {
    pub fn new(config: SessionConfig, collaborators: Collaborators, events: WeakDispatcher<SessionEvent>) -> Self {
        let completion = events.clone();
        collaborators.player.set_completion_listener(Arc::new(move || {
            completion.dispatch(SessionEvent::Completed);
        }));

        Self {
            config,
            player: collaborators.player,
            interruptions: collaborators.interruptions,
            presence: collaborators.presence,
            arbitrator: FocusArbitrator::new(collaborators.focus, events.clone()),
            events,
            ticker: ScheduledTask::new("progress-ticker"),
            delayed_stop: ScheduledTask::new("delayed-stop"),
            preparation: ScheduledTask::new("prepare"),
            noisy_registered: false,
        }
    }

    fn apply(&mut self, previous: &SessionState, latest: &SessionState, trigger: &SessionEvent) {
        if previous.focus != FocusStatus::Pending && latest.focus == FocusStatus::Pending {
            self.arbitrator.request();
        }

        if previous.player != PlayerStatus::Preparing && latest.player == PlayerStatus::Preparing {
            self.prepare();
        }

        let was_playing = previous.is_playing();
        let is_playing = latest.is_playing();
        if !was_playing && is_playing {
            self.enter_playing();
        } else if was_playing && !is_playing {
            self.leave_playing();
        }

        if previous.status != latest.status {
            match latest.status {
                SessionStatus::Paused if was_playing => self.player.pause(),
                SessionStatus::Stopped => self.enter_stopped(),
                _ => {}
            }
        }

        let denied = matches!(trigger, SessionEvent::FocusResolved(FocusRequestResult::Denied));
        if latest.status != SessionStatus::Stopped
            && previous.focus != FocusStatus::Released
            && latest.focus == FocusStatus::Released
            && !denied
        {
            self.arbitrator.abandon();
        }

        if !previous.stop_pending && latest.stop_pending {
            self.arm_delayed_stop(latest.stop_generation);
        } else if previous.stop_pending && !latest.stop_pending && self.delayed_stop.cancel() {
            tracing::info!("Delayed stop cancelled");
        }

        if previous.status != latest.status {
            tracing::info!(from = ?previous.status, to = ?latest.status, trigger = ?trigger, "Session transition");
            if matches!(latest.status, SessionStatus::Playing | SessionStatus::Paused) {
                self.report_progress();
            }
        }
    }

    fn prepare(&mut self) {
        let source = self.config.source.clone();
        tracing::info!(source = %source, "Preparing player");
        let events = self.events.clone();
        self.preparation.replace(tasks::resolve(self.player.prepare(&source), move |outcome| {
            crate::log_outcome!("prepare", outcome);
            let event = match outcome {
                Ok(duration) => SessionEvent::PlayerPrepared { duration },
                Err(e) => SessionEvent::PrepareFailed(format!("{e:#}")),
            };
            events.dispatch(event);
        }));
    }

    fn enter_playing(&mut self) {
        self.presence.set_active(true);
        self.player.start();
        self.register_noisy();
        self.presence.start_foreground();

        let player = self.player.clone();
        let events = self.events.clone();
        self.ticker.replace(tasks::every(self.config.tick_interval, move || {
            events.dispatch(SessionEvent::Progress {
                position: player.current_position(),
                duration: player.duration(),
            })
        }));
    }

    fn leave_playing(&mut self) {
        self.ticker.cancel();
        self.unregister_noisy();
        self.presence.stop_foreground();
    }

    fn enter_stopped(&mut self) {
        self.ticker.cancel();
        self.preparation.cancel();
        self.delayed_stop.cancel();
        self.arbitrator.abandon();
        self.unregister_noisy();
        self.presence.set_active(false);
        self.player.stop();
        self.presence.stop_foreground();
    }

    fn arm_delayed_stop(&mut self, generation: u64) {
        let grace = self.config.stop_grace;
        tracing::info!(grace_secs = grace.as_secs(), generation, "Focus lost, stop armed");
        let events = self.events.clone();
        self.delayed_stop.replace(tasks::after(grace, move || {
            events.dispatch(SessionEvent::DelayedStopElapsed { generation });
        }));
    }

    fn register_noisy(&mut self) {
        if self.noisy_registered {
            return;
        }
        let events = self.events.clone();
        self.interruptions.register(Arc::new(move || {
            tracing::info!("Audio output becoming noisy");
            events.dispatch(SessionEvent::BecomingNoisy);
        }));
        self.noisy_registered = true;
    }

    fn unregister_noisy(&mut self) {
        if self.noisy_registered {
            self.interruptions.unregister();
            self.noisy_registered = false;
        }
    }

    fn report_progress(&self) {
        self.events.dispatch(SessionEvent::Progress {
            position: self.player.current_position(),
            duration: self.player.duration(),
        });
    }
}

impl Middleware<SessionState, SessionEvent> for SessionEffects {
    fn handle(
        &mut self,
        state: &SessionState,
        event: SessionEvent,
        next: Next<'_, SessionState, SessionEvent>,
    ) -> Result<SessionState, DispatchError> {
        let trigger = event.clone();
        let latest = next(event)?;
        self.apply(state, &latest, &trigger);
        Ok(latest)
    }
}
