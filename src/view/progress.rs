//! Progress bar rendering

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Gauge},
    Frame,
};

use crate::model::MediaState;
use super::utils::format_elapsed;

pub fn render_progress_bar(frame: &mut Frame, area: Rect, media: &MediaState) {
    let status_text = if media.is_playing {
        " ▶ Playing "
    } else {
        " ⏸  Paused "
    };
    let controls_info = " Space: play/pause | s: stop ";

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(status_text)
                .title_bottom(Line::from(controls_info).right_aligned()),
        )
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(f64::from(media.progress).clamp(0.0, 1.0))
        .label(format_elapsed(media.elapsed, media.length));

    frame.render_widget(gauge, area);
}
