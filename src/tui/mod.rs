mod app;
mod help_text;
pub mod terminal_compat;
pub mod theme;
mod ui;
pub mod worker;

pub use app::{App, AppMode, AppOptions, Focus};
pub use terminal_compat::{ColorMode, TerminalCapabilities};
pub use theme::{Theme, ThemeName};

use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use std::time::Duration;

/// How long to wait for input before redrawing (status expiry, finished fetches)
const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Run the TUI application.
///
/// This function handles the main event loop for the interactive terminal interface.
/// Each pass commits finished fetches, draws, then waits briefly for a key.
///
/// # Arguments
///
/// * `terminal` - A mutable reference to a ratatui terminal
/// * `app` - The App instance to run
///
/// # Returns
///
/// Returns `Ok(())` on successful exit, or an error if something goes wrong.
pub fn run(terminal: &mut DefaultTerminal, app: App) -> Result<()> {
    let mut app = app;

    loop {
        app.poll_fetches();
        terminal.draw(|frame| ui::render(frame, &mut app))?;

        if app.should_quit {
            tracing::info!("quitting");
            return Ok(());
        }

        // Poll for events with timeout so background results and status expiry show up
        if !event::poll(EVENT_POLL_INTERVAL)? {
            continue;
        }

        // Resize needs no handling: the next draw picks up the new size
        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key(key);
        }
    }
}
