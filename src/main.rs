mod audio;
mod config;
mod controller;
mod logging;
mod model;
mod store;
mod view;

use std::io;
use anyhow::Result;
use std::time::Duration;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use config::AppConfig;
use controller::AppController;
use view::AppView;

#[tokio::main]
async fn main() -> Result<()> {
    let _log_guard = match logging::init_logging() {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: Failed to initialize logging: {}", e);
            None
        }
    };

    tracing::info!("=== media-redux starting ===");

    let config = AppConfig::from_env()?;
    tracing::info!(
        source = %config.session.source,
        tick_ms = config.session.tick_interval.as_millis() as u64,
        stop_grace_secs = config.session.stop_grace.as_secs(),
        grant_focus = config.simulation.grant_focus,
        "Configuration loaded"
    );

    let controller = AppController::start(&config);

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, controller).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("media-redux shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    controller: AppController,
) -> io::Result<()> {
    loop {
        let media = controller.media_state();
        let session = controller.session_state();

        terminal.draw(|f| {
            AppView::render(f, &media, &session);
        })?;

        // Short poll keeps the gauge moving between key presses
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Err(e) = controller.handle_key_event(key).await {
                    tracing::warn!(error = %e, "Key handling failed");
                }
            }
        }

        if controller.should_quit() {
            break;
        }
    }

    Ok(())
}
