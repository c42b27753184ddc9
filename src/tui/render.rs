//! TUI rendering logic
//!
//! [`ScreenLayout`] is computed once per frame and shared by drawing and
//! mouse hit-testing, so a click always resolves against what is on screen.

use crate::tui::app::App;
use crate::tui::keyboard_layout::{key_at, render_keyboard_layout};
use crate::tui::picker::{contains, PickerField, PickerLayout, PALETTE};
use crate::view::View;
use kbconf_keyboard::{GridMode, KeyId, RgbColor};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

const SIDEBAR_WIDTH: u16 = 22;
const SIDEBAR_ENTRY_HEIGHT: u16 = 3;
const TAB_SEPARATOR: &str = "│";
const RESET_WIDTH: u16 = 16;

pub(crate) fn rgb(color: RgbColor) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

/// Context in which a keybind is active
#[derive(Debug, Clone, Copy, PartialEq)]
enum KeyContext {
    Global,
    Keymap,
    Lighting,
    Picker,
}

/// A single keybinding definition
struct Keybind {
    keys: &'static str,
    description: &'static str,
    context: KeyContext,
}

/// All TUI keybindings, shown by the help overlay
#[rustfmt::skip]
const TUI_KEYBINDS: &[Keybind] = &[
    Keybind { keys: "q / Esc", description: "Quit", context: KeyContext::Global },
    Keybind { keys: "?", description: "Toggle this help", context: KeyContext::Global },
    Keybind { keys: "1-6", description: "Select sidebar view", context: KeyContext::Global },
    Keybind { keys: "Tab", description: "Next profile", context: KeyContext::Global },
    Keybind { keys: "Shift+Tab", description: "Previous profile", context: KeyContext::Global },
    Keybind { keys: "←↑↓→ / hjkl", description: "Move key cursor", context: KeyContext::Global },
    Keybind { keys: "PgUp/PgDn", description: "Scroll the key grid", context: KeyContext::Global },
    Keybind { keys: "Wheel", description: "Scroll (Shift: sideways)", context: KeyContext::Global },
    Keybind { keys: "r", description: "Reset layout", context: KeyContext::Keymap },
    Keybind { keys: "Enter / Space", description: "Pick color for key", context: KeyContext::Lighting },
    Keybind { keys: "Click", description: "Pick color for key", context: KeyContext::Lighting },
    Keybind { keys: "Tab", description: "Next field", context: KeyContext::Picker },
    Keybind { keys: "←/→", description: "Swatch or channel -/+ 1", context: KeyContext::Picker },
    Keybind { keys: "Shift+←/→", description: "Channel -/+ 16", context: KeyContext::Picker },
    Keybind { keys: "Enter", description: "Apply color", context: KeyContext::Picker },
    Keybind { keys: "Esc", description: "Cancel", context: KeyContext::Picker },
];

/// Screen regions of the current frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenLayout {
    pub title: Rect,
    pub sidebar: Rect,
    /// One entry per [`View::ALL`], top to bottom
    pub sidebar_entries: Vec<Rect>,
    pub main: Rect,
    pub header: Rect,
    pub tab_line: Rect,
    /// One per profile of the current view
    pub tabs: Vec<Rect>,
    pub grid: Rect,
    /// Reset button, keymap view only
    pub reset: Option<Rect>,
    pub status: Rect,
    pub picker: Option<PickerLayout>,
}

impl ScreenLayout {
    pub fn compute(area: Rect, app: &App) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Min(5),    // Body
                Constraint::Length(3), // Status bar
            ])
            .split(area);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(10)])
            .split(chunks[1]);

        let sidebar = body[0];
        let sidebar_entries = Layout::default()
            .direction(Direction::Vertical)
            .constraints(View::ALL.map(|_| Constraint::Length(SIDEBAR_ENTRY_HEIGHT)))
            .split(sidebar)
            .to_vec();

        let main = body[1];
        let inner = Block::default().borders(Borders::ALL).inner(main);
        let show_reset = app.current_view() == View::Keymap;
        let sections = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // View header
                Constraint::Length(1), // Profile tabs
                Constraint::Min(0),    // Key grid
                Constraint::Length(if show_reset { 3 } else { 0 }),
            ])
            .split(inner);

        let tab_line = sections[1];
        let tabs = tab_rects(tab_line, app.current_profiles().names());

        Self {
            title: chunks[0],
            sidebar,
            sidebar_entries,
            main,
            header: sections[0],
            tab_line,
            tabs,
            grid: sections[2],
            reset: show_reset.then(|| Rect {
                width: sections[3].width.min(RESET_WIDTH),
                ..sections[3]
            }),
            status: chunks[2],
            picker: app.picker().map(|_| PickerLayout::new(area)),
        }
    }

    pub fn view_at(&self, column: u16, row: u16) -> Option<View> {
        self.sidebar_entries
            .iter()
            .position(|r| contains(r, column, row))
            .and_then(View::from_index)
    }

    pub fn tab_at(&self, column: u16, row: u16) -> Option<usize> {
        self.tabs.iter().position(|r| contains(r, column, row))
    }

    pub fn key_at(&self, app: &App, column: u16, row: u16) -> Option<KeyId> {
        key_at(app, self.grid, column, row)
    }

    pub fn is_reset(&self, column: u16, row: u16) -> bool {
        self.reset.is_some_and(|r| contains(&r, column, row))
    }
}

/// Tab label " name " followed by a one-cell separator
fn tab_rects<'a>(line: Rect, names: impl Iterator<Item = &'a str>) -> Vec<Rect> {
    let right = line.x + line.width;
    let mut x = line.x;
    names
        .map(|name| {
            let width = name.chars().count() as u16 + 2;
            let start = x.min(right);
            let rect = Rect::new(start, line.y, width.min(right - start), line.height);
            x = x.saturating_add(width + 1);
            rect
        })
        .collect()
}

/// Render the entire application UI
pub fn render(frame: &mut Frame, app: &App) {
    let layout = ScreenLayout::compute(frame.area(), app);
    let theme = &app.config.theme;

    frame.render_widget(
        Block::default().style(Style::default().bg(rgb(theme.background))),
        frame.area(),
    );

    render_title(frame, app, layout.title);
    render_sidebar(frame, app, &layout);
    render_main(frame, app, &layout);
    render_status_bar(frame, app, layout.status);

    if let (Some(picker_layout), Some(_)) = (&layout.picker, app.picker()) {
        render_picker(frame, app, picker_layout);
    }

    if app.show_help {
        render_help_overlay(frame, frame.area());
    }
}

fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let title = Paragraph::new(Line::from(Span::styled(
        app.config.title.as_str(),
        Style::default()
            .fg(rgb(app.config.theme.accent))
            .add_modifier(Modifier::BOLD),
    )))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(rgb(app.config.theme.border))),
    );
    frame.render_widget(title, area);
}

/// Sidebar buttons; views without content are drawn dimmed
fn render_sidebar(frame: &mut Frame, app: &App, layout: &ScreenLayout) {
    let theme = &app.config.theme;

    for (view, area) in View::ALL.iter().zip(&layout.sidebar_entries) {
        let (text_style, border_color) = if app.views().is_visible(*view) {
            (
                Style::default()
                    .fg(rgb(theme.accent))
                    .add_modifier(Modifier::BOLD),
                rgb(theme.accent),
            )
        } else if view.is_backed() {
            (Style::default().fg(rgb(theme.key_text)), rgb(theme.border))
        } else {
            (
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::DIM),
                Color::DarkGray,
            )
        };

        let entry = Paragraph::new(view.display_name())
            .style(text_style)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border_color)),
            );
        frame.render_widget(entry, *area);
    }
}

fn render_main(frame: &mut Frame, app: &App, layout: &ScreenLayout) {
    let theme = &app.config.theme;
    let profiles = app.current_profiles();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(rgb(theme.border)));
    frame.render_widget(block, layout.main);

    let header = match profiles.mode() {
        GridMode::Keymap => "Key Mapping",
        GridMode::Lighting => "Lighting Configuration",
    };
    frame.render_widget(
        Paragraph::new(header).style(
            Style::default()
                .fg(rgb(theme.key_text))
                .add_modifier(Modifier::BOLD),
        ),
        layout.header,
    );

    let mut spans = Vec::new();
    for (i, name) in profiles.names().enumerate() {
        if i > 0 {
            spans.push(Span::styled(TAB_SEPARATOR, Style::default().fg(rgb(theme.border))));
        }
        let style = if i == profiles.active_index() {
            Style::default()
                .fg(rgb(theme.accent))
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(rgb(theme.key_text))
        };
        spans.push(Span::styled(format!(" {name} "), style));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), layout.tab_line);

    render_keyboard_layout(frame, app, layout.grid);

    if let Some(reset) = layout.reset {
        let button = Paragraph::new("Reset Layout")
            .style(
                Style::default()
                    .fg(rgb(RgbColor::WHITE))
                    .bg(rgb(theme.reset))
                    .add_modifier(Modifier::BOLD),
            )
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .style(Style::default().bg(rgb(theme.reset))),
            );
        frame.render_widget(button, reset);
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let profiles = app.current_profiles();
    let context = format!(
        "{} | {}",
        app.current_view().display_name(),
        profiles.active_profile_name()
    );
    let message = app.status_message.as_deref().unwrap_or("Ready");
    let help_text = "? help | q quit";

    let status_line = Line::from(vec![
        Span::styled(context, Style::default().fg(rgb(app.config.theme.accent))),
        Span::raw(" | "),
        Span::raw(message),
        Span::raw(" | "),
        Span::styled(help_text, Style::default().fg(Color::DarkGray)),
    ]);

    let widget = Paragraph::new(status_line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(rgb(app.config.theme.border))),
    );
    frame.render_widget(widget, area);
}

fn render_picker(frame: &mut Frame, app: &App, layout: &PickerLayout) {
    let Some(picker) = app.picker() else {
        return;
    };
    let theme = &app.config.theme;
    let focus = Style::default()
        .fg(rgb(theme.accent))
        .add_modifier(Modifier::BOLD);
    let normal = Style::default().fg(rgb(theme.key_text));

    frame.render_widget(Clear, layout.popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Select Key Color ")
        .border_style(Style::default().fg(rgb(theme.accent)))
        .style(Style::default().bg(rgb(theme.background)));
    frame.render_widget(block, layout.popup);

    frame.render_widget(
        Paragraph::new(format!("Key: {}", picker.key_label())).style(normal),
        layout.info,
    );

    for (i, (rect, color)) in layout.swatches.iter().zip(PALETTE).enumerate() {
        let selected = i == picker.palette_cursor();
        let mark = match (selected, picker.field() == PickerField::Palette) {
            (true, true) => "[  ]",
            (true, false) => " .. ",
            _ => "",
        };
        let text = if color.is_dark() {
            RgbColor::WHITE
        } else {
            RgbColor::BLACK
        };
        frame.render_widget(
            Paragraph::new(mark).style(Style::default().fg(rgb(text)).bg(rgb(color))),
            *rect,
        );
    }

    let color = picker.color();
    let channels = [
        (PickerField::Red, "R", color.r),
        (PickerField::Green, "G", color.g),
        (PickerField::Blue, "B", color.b),
    ];
    for ((field, name, value), rect) in channels.into_iter().zip(layout.channels) {
        let style = if picker.field() == field { focus } else { normal };
        let filled = usize::from(value) * 16 / 255;
        let bar: String = "█".repeat(filled) + &"░".repeat(16 - filled);
        frame.render_widget(
            Paragraph::new(format!("{name} {value:>3} {bar}")).style(style),
            rect,
        );
    }

    let hex_style = if picker.hex_error() {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else if picker.field() == PickerField::Hex {
        focus
    } else {
        normal
    };
    frame.render_widget(
        Paragraph::new(format!("Hex {}", picker.hex_input())).style(hex_style),
        layout.hex,
    );

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Old ", normal),
            Span::styled("    ", Style::default().bg(rgb(picker.original()))),
            Span::styled("  New ", normal),
            Span::styled("    ", Style::default().bg(rgb(color))),
        ])),
        layout.preview,
    );

    frame.render_widget(Paragraph::new("[ OK ]").style(focus), layout.ok);
    frame.render_widget(Paragraph::new("[ Cancel ]").style(normal), layout.cancel);
}

/// Render help popup with all keybindings
fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 80, area);
    frame.render_widget(Clear, popup_area);

    let mut lines: Vec<Line> = Vec::new();
    let mut current_context = None;
    for kb in TUI_KEYBINDS {
        if current_context != Some(kb.context) {
            current_context = Some(kb.context);
            let section_name = match kb.context {
                KeyContext::Global => "Global",
                KeyContext::Keymap => "Keymap View",
                KeyContext::Lighting => "Lighting View",
                KeyContext::Picker => "Color Picker",
            };
            if !lines.is_empty() {
                lines.push(Line::from(""));
            }
            lines.push(Line::from(Span::styled(
                format!("── {section_name} ──"),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )));
        }
        lines.push(Line::from(vec![
            Span::styled(format!("{:14}", kb.keys), Style::default().fg(Color::Cyan)),
            Span::raw(" "),
            Span::raw(kb.description),
        ]));
    }

    let help = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help [? to close] ")
                .style(Style::default().bg(Color::Black)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(help, popup_area);
}

/// Helper to create a centered rectangle
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::tui::app::Action;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use ratatui::Terminal;

    fn app() -> App {
        App::new(AppConfig::default()).unwrap()
    }

    fn draw(app: &App, width: u16, height: u16) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        terminal.backend().buffer().clone()
    }

    fn buffer_text(buffer: &Buffer) -> String {
        let area = buffer.area;
        let mut text = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_sidebar_entries_rendered() {
        let app = app();
        let text = buffer_text(&draw(&app, 140, 50));
        for view in View::ALL {
            assert!(text.contains(view.display_name()), "missing {}", view.display_name());
        }
        assert!(text.contains("DIY Keyboard Configurator"));
    }

    #[test]
    fn test_keymap_view_contents() {
        let app = app();
        let text = buffer_text(&draw(&app, 140, 50));
        assert!(text.contains("Key Mapping"));
        assert!(text.contains(" Profile 1 "));
        assert!(text.contains(" Profile 2 "));
        assert!(text.contains("Reset Layout"));
        for label in ["Esc", "F12", "Caps", "Space", "RShift"] {
            assert!(text.contains(label), "missing key {label}");
        }
    }

    #[test]
    fn test_lighting_view_has_no_reset() {
        let mut app = app();
        app.dispatch(Action::SelectView(View::Lighting));
        let layout = ScreenLayout::compute(Rect::new(0, 0, 140, 50), &app);
        assert!(layout.reset.is_none());
        let text = buffer_text(&draw(&app, 140, 50));
        assert!(text.contains("Lighting Configuration"));
        assert!(!text.contains("Reset Layout"));
    }

    #[test]
    fn test_key_fill_uses_chosen_color() {
        let mut app = app();
        app.dispatch(Action::SelectView(View::Lighting));
        let q = app.current_grid().find_by_label("Q")[0];
        app.dispatch(Action::ActivateKey(q));
        app.dispatch(Action::ApplyColor {
            key: q,
            color: Some(RgbColor::RED),
        });

        let buffer = draw(&app, 140, 50);
        let layout = ScreenLayout::compute(buffer.area, &app);
        let rect = crate::tui::keyboard_layout::key_screen_rect(&app, layout.grid, q).unwrap();
        assert_eq!(buffer[(rect.x + 1, rect.y + 1)].bg, Color::Rgb(255, 0, 0));
    }

    #[test]
    fn test_tab_and_sidebar_hit_testing() {
        let app = app();
        let layout = ScreenLayout::compute(Rect::new(0, 0, 140, 50), &app);
        assert_eq!(layout.tabs.len(), 2);

        let second = layout.tabs[1];
        assert_eq!(second.x, layout.tabs[0].x + " Profile 1 ".len() as u16 + 1);
        assert_eq!(layout.tab_at(second.x, second.y), Some(1));
        assert_eq!(layout.tab_at(second.x - 1, second.y), None);

        let lighting = layout.sidebar_entries[1];
        assert_eq!(layout.view_at(lighting.x + 1, lighting.y + 1), Some(View::Lighting));
    }

    #[test]
    fn test_picker_popup_rendered() {
        let mut app = app();
        app.dispatch(Action::SelectView(View::Lighting));
        let q = app.current_grid().find_by_label("Q")[0];
        app.dispatch(Action::ActivateKey(q));
        let text = buffer_text(&draw(&app, 140, 50));
        assert!(text.contains("Select Key Color"));
        assert!(text.contains("Key: Q"));
        assert!(text.contains("[ Cancel ]"));
    }

    #[test]
    fn test_help_overlay() {
        let mut app = app();
        app.dispatch(Action::ToggleHelp);
        let text = buffer_text(&draw(&app, 140, 50));
        assert!(text.contains("Help [? to close]"));
        assert!(text.contains("Reset layout"));
    }

    #[test]
    fn test_small_terminal_does_not_panic() {
        let app = app();
        draw(&app, 20, 8);
    }
}
