//! Layout rendering (top bar, screen sidebar)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use ratatui::widgets::Padding;

use crate::controller::{SessionState, SessionStatus};
use crate::model::{MediaState, Screen};

const SCREENS: [Screen; 3] = [Screen::Home, Screen::Media, Screen::Profile];

pub fn render_top_bar(frame: &mut Frame, area: Rect, media: &MediaState, session: &SessionState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Screen title
            Constraint::Length(24), // Session status
        ])
        .split(area);

    let title = Paragraph::new(media.screen.title())
        .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" media-redux ")
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(title, chunks[0]);

    let status = Paragraph::new(format!("{:?}", session.status))
        .style(Style::default().fg(status_color(session.status)))
        .block(Block::default().borders(Borders::ALL).title(" Session "));
    frame.render_widget(status, chunks[1]);
}

pub fn render_sidebar(frame: &mut Frame, area: Rect, current: Screen) {
    let items: Vec<ListItem> = SCREENS
        .iter()
        .enumerate()
        .map(|(i, screen)| {
            let style = if *screen == current {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(format!(" {}  {}", i + 1, screen.title())).style(style)
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(" Screens "));
    frame.render_widget(list, area);
}

fn status_color(status: SessionStatus) -> Color {
    match status {
        SessionStatus::Playing => Color::Green,
        SessionStatus::Preparing => Color::Yellow,
        SessionStatus::Paused => Color::Cyan,
        SessionStatus::Idle | SessionStatus::Stopped => Color::DarkGray,
    }
}
