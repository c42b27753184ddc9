//! TUI (Terminal User Interface) for the keyboard configurator
//!
//! Full-screen window with a sidebar of views, profile tabs per view and a
//! clickable key grid.

pub mod app;
pub mod input;
pub mod keyboard_layout;
pub mod picker;
pub mod render;

pub use app::{Action, App, AppError};

use crate::config::AppConfig;
use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use render::ScreenLayout;
use std::io::{self, stdout, Write};
use tracing::{info, warn};

/// Run the configurator until the user quits
pub fn run(config: AppConfig) -> Result<()> {
    let mut app = App::new(config).context("Failed to build the main window")?;

    install_panic_hook();
    let guard = TerminalGuard::enter().context("Failed to set up the terminal")?;
    let result = event_loop(&mut app);
    // the terminal is back to normal before any loop error is reported
    drop(guard);

    info!("Configurator closed");
    result
}

/// Raw mode, alternate screen and mouse capture, undone on drop
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        // from here on a failed step still restores through Drop
        let guard = TerminalGuard;
        stdout().execute(EnterAlternateScreen)?;
        stdout().execute(EnableMouseCapture)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = restore_terminal(&mut stdout()) {
            warn!("Failed to restore terminal: {}", e);
        }
    }
}

/// Undo every terminal mode change. All steps run even if one fails; the
/// first error is returned.
fn restore_terminal<W: Write>(out: &mut W) -> io::Result<()> {
    let raw = disable_raw_mode();
    let screen = out.execute(LeaveAlternateScreen).map(|_| ());
    let mouse = out.execute(DisableMouseCapture).map(|_| ());
    raw.and(screen).and(mouse)
}

/// Restore the terminal before the panic message is printed
fn install_panic_hook() {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal(&mut stdout());
        hook(info);
    }));
}

fn event_loop(app: &mut App) -> Result<()> {
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    while !app.should_quit {
        let size = terminal.size()?;
        let area = Rect::new(0, 0, size.width, size.height);
        let grid = ScreenLayout::compute(area, app).grid;
        app.set_viewport(grid.width, grid.height);

        terminal.draw(|f| render::render(f, app))?;

        let event = event::read().context("Failed to read terminal event")?;
        input::handle_event(app, event, area);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Writer that rejects every write and counts the attempts
    struct BrokenWriter {
        attempts: usize,
    }

    impl Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            self.attempts += 1;
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_restore_leaves_screen_and_mouse_capture() {
        let mut out = Vec::new();
        restore_terminal(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\x1b[?1049l"));
        assert!(text.contains("\x1b[?1000l"));
    }

    #[test]
    fn test_restore_runs_every_step_on_error() {
        let mut out = BrokenWriter { attempts: 0 };
        assert!(restore_terminal(&mut out).is_err());
        // both the screen and the mouse step were tried
        assert!(out.attempts >= 2);
    }
}
