//! Screen body rendering

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use ratatui::widgets::Padding;

use crate::controller::SessionState;
use crate::model::{MediaState, Screen};
use super::utils::format_elapsed;

pub fn render_screen(frame: &mut Frame, area: Rect, media: &MediaState, session: &SessionState) {
    let lines = match media.screen {
        Screen::Home => vec![
            Line::from("Press 2 to open the player."),
            Line::from(""),
            Line::from(Span::styled(
                "Playback keeps running while you move between screens.",
                Style::default().fg(Color::DarkGray),
            )),
        ],
        Screen::Media => media_lines(media, session),
        Screen::Profile => vec![
            Line::from("Nothing to configure here yet."),
            Line::from(""),
            Line::from(Span::styled(
                "Overrides are read from MEDIA_REDUX_* environment variables.",
                Style::default().fg(Color::DarkGray),
            )),
        ],
    };

    let body = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", media.screen.title()))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(body, area);
}

fn media_lines(media: &MediaState, session: &SessionState) -> Vec<Line<'static>> {
    let hint = Style::default().fg(Color::DarkGray);
    vec![
        Line::from(format!("Status:   {:?}", session.status)),
        Line::from(format!("Focus:    {:?}", session.focus)),
        Line::from(format!("Position: {}", format_elapsed(media.elapsed, media.length))),
        Line::from(if session.stop_pending {
            Span::styled("Focus lost, stopping soon unless it comes back", Style::default().fg(Color::Yellow))
        } else {
            Span::raw("")
        }),
        Line::from(""),
        Line::from(Span::styled("Space/Enter  play or pause", hint)),
        Line::from(Span::styled("s            stop", hint)),
        Line::from(Span::styled("n            unplug headphones", hint)),
        Line::from(Span::styled("l / t / d    lose focus (permanent, transient, duck)", hint)),
        Line::from(Span::styled("g            regain focus", hint)),
        Line::from(Span::styled("f            toggle whether focus is granted", hint)),
        Line::from(Span::styled("1 2 3        switch screen, q quit", hint)),
    ]
}
