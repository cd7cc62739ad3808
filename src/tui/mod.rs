//! Terminal user interface built on ratatui

mod app;
mod components;
mod events;
mod keys;
mod styles;
mod utils;

pub use app::App;
pub use events::EventHandler;

use crate::config::Config;
use crate::content::ContentClient;
use anyhow::Result;
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::sync::Arc;
use tracing::info;

pub type Backend = CrosstermBackend<io::Stdout>;
pub type Frame<'a> = ratatui::Frame<'a>;

/// Initialize the terminal for TUI mode
pub fn init_terminal() -> Result<Terminal<Backend>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
pub fn restore_terminal(terminal: &mut Terminal<Backend>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Main TUI entry point
pub async fn run(config: &Config, client: Arc<dyn ContentClient>) -> Result<()> {
    let mut terminal = init_terminal()?;
    let mut event_handler = EventHandler::new();
    let mut app = App::new(config, client, event_handler.sender());

    let result = run_app(&mut terminal, &mut app, &mut event_handler).await;

    app.shutdown();
    restore_terminal(&mut terminal)?;
    info!("Browser closed");
    result
}

/// Main application loop
async fn run_app(terminal: &mut Terminal<Backend>, app: &mut App, event_handler: &mut EventHandler) -> Result<()> {
    app.start();

    loop {
        terminal.draw(|frame| app.render(frame))?;

        if let Some(event) = event_handler.next().await {
            if app.handle_event(event)? {
                break;
            }
        }
    }
    Ok(())
}
