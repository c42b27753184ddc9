//! Key grid widget
//!
//! Draws the active profile's keys as bordered cells at their grid
//! geometry, shifted by the app's scroll offset. Keys that do not fit the
//! viewport completely are skipped, and the same rule drives mouse
//! hit-testing so a click can only land on a key that is drawn.

use crate::tui::app::App;
use crate::tui::render::rgb;
use kbconf_keyboard::{KeyControl, KeyId, RgbColor};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

/// Screen rectangle of a key, if it is fully inside `area`
pub fn key_screen_rect(app: &App, area: Rect, key: KeyId) -> Option<Rect> {
    let rect = app.geometry().rect(key)?;
    let (sx, sy) = app.scroll();
    if rect.x < sx || rect.y < sy {
        return None;
    }
    let (x, y) = (rect.x - sx, rect.y - sy);
    if x + rect.width > area.width || y + rect.height > area.height {
        return None;
    }
    Some(Rect::new(area.x + x, area.y + y, rect.width, rect.height))
}

/// Key drawn at a screen cell
pub fn key_at(app: &App, area: Rect, column: u16, row: u16) -> Option<KeyId> {
    if column < area.x || row < area.y {
        return None;
    }
    let (sx, sy) = app.scroll();
    let key = app
        .geometry()
        .key_at(column - area.x + sx, row - area.y + sy)?;
    let screen = key_screen_rect(app, area, key)?;
    (column < screen.x + screen.width && row < screen.y + screen.height).then_some(key)
}

/// Render every visible key of the current grid
pub fn render_keyboard_layout(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.config.theme;

    for control in app.current_grid().iter() {
        let Some(key_rect) = key_screen_rect(app, area, control.id()) else {
            continue;
        };

        let fill = key_fill(app, control);
        let text = if fill.is_dark() {
            theme.key_text
        } else {
            RgbColor::BLACK
        };

        let is_cursor = app.cursor() == Some(control.id());
        let border_style = if is_cursor {
            Style::default()
                .fg(rgb(theme.accent))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(rgb(theme.border))
        };

        let inner_width = usize::from(key_rect.width.saturating_sub(2));
        let display_name: String = control.label().chars().take(inner_width).collect();

        let key_block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Style::default().bg(rgb(fill)));

        let key_text = Paragraph::new(display_name)
            .style(Style::default().fg(rgb(text)).bg(rgb(fill)))
            .block(key_block);

        frame.render_widget(key_text, key_rect);
    }
}

/// Background of a key: its chosen color, or the theme fill (hover aware)
fn key_fill(app: &App, control: &KeyControl) -> RgbColor {
    let theme = &app.config.theme;
    match control.color() {
        Some(color) => color,
        None if app.hovered() == Some(control.id()) => theme.key_hover,
        None => theme.key,
    }
}
