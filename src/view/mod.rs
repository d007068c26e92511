//! View module - UI rendering
//!
//! This module handles all UI rendering for the demo using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared formatting helpers
//! - `layout`: Top bar and screen sidebar
//! - `content`: Body of the current screen
//! - `progress`: Progress gauge with transport status
//! - `overlays`: Playback error notification

mod utils;
mod layout;
mod content;
mod progress;
mod overlays;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::controller::SessionState;
use crate::model::MediaState;

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, media: &MediaState, session: &SessionState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Screen title + session status
                Constraint::Min(0),    // Sidebar + screen body
                Constraint::Length(3), // Progress gauge
            ])
            .split(frame.area());

        layout::render_top_bar(frame, chunks[0], media, session);

        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(25), // Screens
                Constraint::Percentage(75), // Screen body
            ])
            .split(chunks[1]);

        layout::render_sidebar(frame, main_chunks[0], media.screen);
        content::render_screen(frame, main_chunks[1], media, session);

        progress::render_progress_bar(frame, chunks[2], media);

        if let Some(error) = session.last_error.as_deref() {
            overlays::render_error_notification(frame, error);
        }
    }
}
