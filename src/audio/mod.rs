//! Audio module - Collaborator interfaces consumed by the playback session
//!
//! The session never touches the platform directly. It drives a player,
//! arbitrates the shared audio output, listens for the output device going
//! away, and toggles its foreground presence through the traits below.
//!
//! - `simulated`: In-process implementations driven by the tokio clock

mod simulated;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use futures::future::BoxFuture;

pub use simulated::SimulatedBackend;
#[cfg(test)]
pub use simulated::SimulatedAudioFocus;

pub type Callback = Arc<dyn Fn() + Send + Sync>;
pub type FocusListener = Arc<dyn Fn(FocusChange) + Send + Sync>;

/// Asynchronous change of audio focus delivered by the system
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusChange {
    Gained,
    LostPermanent,
    LostTransient,
    LostTransientCanDuck,
}

/// Outcome of a focus request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusRequestResult {
    Granted,
    Denied,
}

pub trait MediaPlayer: Send + Sync {
    /// Prepare `source` for playback, resolving to the track duration if known.
    fn prepare(&self, source: &str) -> BoxFuture<'static, Result<Option<Duration>>>;
    fn start(&self);
    fn pause(&self);
    fn stop(&self);
    fn current_position(&self) -> Duration;
    fn duration(&self) -> Option<Duration>;
    /// Invoked when playback reaches the end on its own.
    fn set_completion_listener(&self, listener: Callback);
}

pub trait AudioFocus: Send + Sync {
    /// Ask for the shared audio output. `listener` receives later changes for
    /// as long as the grant is held.
    fn request(&self, listener: FocusListener) -> BoxFuture<'static, FocusRequestResult>;
    fn abandon(&self);
}

/// Notifies when audio is about to become noisy (output device removed).
pub trait InterruptionSource: Send + Sync {
    fn register(&self, on_noisy: Callback);
    fn unregister(&self);
}

/// Foreground presence and session activation toggled around playback.
pub trait SessionPresence: Send + Sync {
    fn set_active(&self, active: bool);
    fn start_foreground(&self);
    fn stop_foreground(&self);
}

/// The external capabilities a playback session is built from
#[derive(Clone)]
pub struct Collaborators {
    pub player: Arc<dyn MediaPlayer>,
    pub focus: Arc<dyn AudioFocus>,
    pub interruptions: Arc<dyn InterruptionSource>,
    pub presence: Arc<dyn SessionPresence>,
}
