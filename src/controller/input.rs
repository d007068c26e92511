//! Key event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::audio::FocusChange;
use crate::model::{Action, Screen};
use super::AppController;

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        // Only handle key press events, not release or repeat
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        match key.code {
            KeyCode::Char(' ') | KeyCode::Enter => self.media.dispatch_and_wait(Action::ClickPlayPause).await?,
            KeyCode::Char('s') => self.session.stop(),

            KeyCode::Char('1') => self.navigate(Screen::Home).await?,
            KeyCode::Char('2') => self.navigate(Screen::Media).await?,
            KeyCode::Char('3') => self.navigate(Screen::Profile).await?,

            // Simulated system signals
            KeyCode::Char('n') => self.signals.interruptions.trigger(),
            KeyCode::Char('l') => self.signals.focus.emit(FocusChange::LostPermanent),
            KeyCode::Char('t') => self.signals.focus.emit(FocusChange::LostTransient),
            KeyCode::Char('d') => self.signals.focus.emit(FocusChange::LostTransientCanDuck),
            KeyCode::Char('g') => self.signals.focus.emit(FocusChange::Gained),
            KeyCode::Char('f') => {
                let grant = !self.signals.focus.grants();
                self.signals.focus.set_grant(grant);
                tracing::info!(grant, "Focus grant policy toggled");
            }

            KeyCode::Char('q') | KeyCode::Esc => self.quit(),
            _ => {}
        }

        Ok(())
    }

    async fn navigate(&self, screen: Screen) -> Result<()> {
        self.media.dispatch_and_wait(Action::Navigate(screen)).await?;
        Ok(())
    }
}
