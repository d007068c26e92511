//! Audio focus arbitration
//!
//! Turns the system's focus API into session events. Both the request outcome
//! and later focus changes are dispatched into the session store instead of
//! touching session state from the callback.

use std::sync::Arc;

use crate::audio::{AudioFocus, FocusChange, FocusListener};
use crate::store::WeakDispatcher;

use super::state::SessionEvent;
use super::tasks::{self, ScheduledTask};

pub struct FocusArbitrator {
    focus: Arc<dyn AudioFocus>,
    events: WeakDispatcher<SessionEvent>,
    pending: ScheduledTask,
}

impl FocusArbitrator {
    pub fn new(focus: Arc<dyn AudioFocus>, events: WeakDispatcher<SessionEvent>) -> Self {
        Self {
            focus,
            events,
            pending: ScheduledTask::new("focus-request"),
        }
    }

    /// Ask for focus. The outcome arrives later as `SessionEvent::FocusResolved`.
    pub fn request(&mut self) {
        tracing::debug!("Requesting audio focus");
        let listener: FocusListener = {
            let events = self.events.clone();
            Arc::new(move |change: FocusChange| {
                tracing::info!(?change, "Audio focus changed");
                events.dispatch(SessionEvent::FocusChanged(change));
            })
        };

        let events = self.events.clone();
        self.pending.replace(tasks::resolve(self.focus.request(listener), move |result| {
            tracing::info!(?result, "Audio focus request resolved");
            events.dispatch(SessionEvent::FocusResolved(result));
        }));
    }

    /// Give focus back, dropping any request still in flight.
    pub fn abandon(&mut self) {
        if self.pending.cancel() {
            tracing::debug!("Dropped in-flight focus request");
        }
        self.focus.abandon();
        tracing::debug!("Audio focus abandoned");
    }
}
