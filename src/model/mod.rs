//! Model module - Actions, state and the pure media-screen reducer
//!
//! This module contains the data flowing through the media screen's store.
//! It is organized into submodules by responsibility:
//!
//! - `types`: Screen identifiers
//! - `playback`: Playback snapshots pushed by the session
//! - `action`: The closed action vocabulary of the media screen
//! - `state`: The immutable media-screen state
//! - `reducer`: Pure `(MediaState, Action) -> MediaState` transition

mod types;
mod playback;
mod action;
mod state;
mod reducer;

pub use types::Screen;

pub use playback::PlaybackSnapshot;

pub use action::Action;

pub use state::MediaState;

pub use reducer::reduce;
