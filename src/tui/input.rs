//! Terminal event handling
//!
//! Turns crossterm key and mouse events into [`Action`]s. The open color
//! picker gets first claim on every event, then the help overlay.

use crate::tui::app::{Action, App};
use crate::tui::render::ScreenLayout;
use crate::view::View;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use kbconf_keyboard::NavDirection;
use ratatui::layout::Rect;

/// Rows scrolled per PgUp/PgDn
const PAGE_ROWS: i16 = 6;
/// Cells scrolled per wheel notch
const WHEEL_STEP: i16 = 3;

/// Handle one terminal event against the frame laid out in `area`
pub fn handle_event(app: &mut App, event: Event, area: Rect) {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key),
        Event::Mouse(mouse) => handle_mouse(app, mouse, area),
        _ => {}
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if app.picker().is_some() {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            app.dispatch(Action::Quit);
        } else {
            app.picker_key(key);
        }
        return;
    }

    if app.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
            app.dispatch(Action::ToggleHelp);
        }
        return;
    }

    if let Some(action) = key_action(app, key) {
        app.dispatch(action);
    }
}

/// Action bound to a key outside of popups
fn key_action(app: &App, key: KeyEvent) -> Option<Action> {
    let action = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Char(c @ '1'..='6') => {
            let index = c.to_digit(10)? as usize - 1;
            Action::SelectView(View::from_index(index)?)
        }
        KeyCode::Tab => Action::NextProfile,
        KeyCode::BackTab => Action::PrevProfile,
        KeyCode::Up | KeyCode::Char('k') => Action::MoveCursor(NavDirection::Up),
        KeyCode::Down | KeyCode::Char('j') => Action::MoveCursor(NavDirection::Down),
        KeyCode::Left | KeyCode::Char('h') => Action::MoveCursor(NavDirection::Left),
        KeyCode::Right | KeyCode::Char('l') => Action::MoveCursor(NavDirection::Right),
        KeyCode::Enter | KeyCode::Char(' ') => Action::ActivateCursor,
        KeyCode::Char('r') if app.current_view() == View::Keymap => Action::Reset,
        KeyCode::PageUp => Action::Scroll {
            dx: 0,
            dy: -PAGE_ROWS,
        },
        KeyCode::PageDown => Action::Scroll {
            dx: 0,
            dy: PAGE_ROWS,
        },
        _ => return None,
    };
    Some(action)
}

fn handle_mouse(app: &mut App, mouse: MouseEvent, area: Rect) {
    let layout = ScreenLayout::compute(area, app);
    let (column, row) = (mouse.column, mouse.row);

    if app.picker().is_some() {
        if let (MouseEventKind::Down(MouseButton::Left), Some(picker_layout)) =
            (mouse.kind, layout.picker.as_ref())
        {
            app.picker_click(picker_layout, column, row);
        }
        return;
    }

    if app.show_help {
        if let MouseEventKind::Down(_) = mouse.kind {
            app.dispatch(Action::ToggleHelp);
        }
        return;
    }

    let shift = mouse.modifiers.contains(KeyModifiers::SHIFT);
    let action = match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => click_action(app, &layout, column, row),
        MouseEventKind::Moved => Some(Action::HoverKey(layout.key_at(app, column, row))),
        MouseEventKind::ScrollUp if shift => Some(Action::Scroll {
            dx: -WHEEL_STEP,
            dy: 0,
        }),
        MouseEventKind::ScrollDown if shift => Some(Action::Scroll {
            dx: WHEEL_STEP,
            dy: 0,
        }),
        MouseEventKind::ScrollUp => Some(Action::Scroll {
            dx: 0,
            dy: -WHEEL_STEP,
        }),
        MouseEventKind::ScrollDown => Some(Action::Scroll {
            dx: 0,
            dy: WHEEL_STEP,
        }),
        MouseEventKind::ScrollLeft => Some(Action::Scroll {
            dx: -WHEEL_STEP,
            dy: 0,
        }),
        MouseEventKind::ScrollRight => Some(Action::Scroll {
            dx: WHEEL_STEP,
            dy: 0,
        }),
        _ => None,
    };

    if let Some(action) = action {
        app.dispatch(action);
    }
}

fn click_action(app: &App, layout: &ScreenLayout, column: u16, row: u16) -> Option<Action> {
    if let Some(view) = layout.view_at(column, row) {
        return Some(Action::SelectView(view));
    }
    if let Some(index) = layout.tab_at(column, row) {
        return Some(Action::SelectProfile(index));
    }
    if layout.is_reset(column, row) {
        return Some(Action::Reset);
    }
    layout.key_at(app, column, row).map(Action::ActivateKey)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::tui::keyboard_layout::key_screen_rect;
    use crossterm::event::KeyEventState;

    const AREA: Rect = Rect {
        x: 0,
        y: 0,
        width: 140,
        height: 50,
    };

    fn app() -> App {
        let mut app = App::new(AppConfig::default()).unwrap();
        let layout = ScreenLayout::compute(AREA, &app);
        app.set_viewport(layout.grid.width, layout.grid.height);
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_event(app, Event::Key(KeyEvent::new(code, KeyModifiers::NONE)), AREA);
    }

    fn mouse(app: &mut App, kind: MouseEventKind, column: u16, row: u16) {
        handle_event(
            app,
            Event::Mouse(MouseEvent {
                kind,
                column,
                row,
                modifiers: KeyModifiers::NONE,
            }),
            AREA,
        );
    }

    fn click(app: &mut App, column: u16, row: u16) {
        mouse(app, MouseEventKind::Down(MouseButton::Left), column, row);
    }

    #[test]
    fn test_digit_keys_select_views() {
        let mut app = app();
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.current_view(), View::Lighting);
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.current_view(), View::Lighting);
        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.current_view(), View::Keymap);
    }

    #[test]
    fn test_release_events_ignored() {
        let mut app = app();
        let mut release = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        release.state = KeyEventState::NONE;
        handle_event(&mut app, Event::Key(release), AREA);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_click_sidebar_and_tab() {
        let mut app = app();
        let layout = ScreenLayout::compute(AREA, &app);
        let entry = layout.sidebar_entries[1];
        click(&mut app, entry.x + 2, entry.y + 1);
        assert_eq!(app.current_view(), View::Lighting);

        let layout = ScreenLayout::compute(AREA, &app);
        let tab = layout.tabs[1];
        click(&mut app, tab.x, tab.y);
        assert_eq!(app.lighting_profiles().active_profile_name(), "Profile 2");
        assert_eq!(app.keymap_profiles().active_profile_name(), "Profile 1");
    }

    #[test]
    fn test_click_dimmed_entry_keeps_view() {
        let mut app = app();
        let layout = ScreenLayout::compute(AREA, &app);
        let entry = layout.sidebar_entries[4];
        click(&mut app, entry.x + 2, entry.y + 1);
        assert_eq!(app.current_view(), View::Keymap);
        assert_eq!(app.status_message.as_deref(), Some("Key Test is not available"));
    }

    #[test]
    fn test_click_key_opens_picker_and_picker_is_modal() {
        let mut app = app();
        press(&mut app, KeyCode::Char('2'));
        let q = app.current_grid().find_by_label("Q")[0];
        let layout = ScreenLayout::compute(AREA, &app);
        let rect = key_screen_rect(&app, layout.grid, q).unwrap();
        click(&mut app, rect.x + 1, rect.y + 1);
        assert_eq!(app.picker().map(|p| p.key()), Some(q));

        // sidebar and quit-by-q are swallowed while the picker is open
        let entry = layout.sidebar_entries[0];
        click(&mut app, entry.x + 2, entry.y + 1);
        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.current_view(), View::Lighting);
        assert!(app.picker().is_some());

        press(&mut app, KeyCode::Esc);
        assert!(app.picker().is_none());
        assert!(!app.should_quit);
        assert_eq!(app.current_grid().color(q), Ok(None));
    }

    #[test]
    fn test_picker_swatch_click_and_ok() {
        let mut app = app();
        press(&mut app, KeyCode::Char('2'));
        let q = app.current_grid().find_by_label("Q")[0];
        app.dispatch(Action::ActivateKey(q));

        let layout = ScreenLayout::compute(AREA, &app);
        let picker = layout.picker.clone().unwrap();
        let swatch = picker.swatches[5];
        click(&mut app, swatch.x, swatch.y);
        click(&mut app, picker.ok.x, picker.ok.y);

        assert!(app.picker().is_none());
        assert_eq!(
            app.current_grid().color(q),
            Ok(Some(crate::tui::picker::PALETTE[5]))
        );
    }

    #[test]
    fn test_click_reset_in_keymap() {
        let mut app = app();
        let layout = ScreenLayout::compute(AREA, &app);
        let reset = layout.reset.unwrap();
        click(&mut app, reset.x + 2, reset.y + 1);
        assert_eq!(app.status_message.as_deref(), Some("Profile 1 reset"));
    }

    #[test]
    fn test_r_ignored_in_lighting() {
        let mut app = app();
        press(&mut app, KeyCode::Char('2'));
        app.status_message = None;
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.status_message, None);
    }

    #[test]
    fn test_hover_tracks_mouse() {
        let mut app = app();
        let esc = app.current_grid().find_by_label("Esc")[0];
        let layout = ScreenLayout::compute(AREA, &app);
        let rect = key_screen_rect(&app, layout.grid, esc).unwrap();
        mouse(&mut app, MouseEventKind::Moved, rect.x, rect.y);
        assert_eq!(app.hovered(), Some(esc));
        mouse(&mut app, MouseEventKind::Moved, 0, 0);
        assert_eq!(app.hovered(), None);
    }

    #[test]
    fn test_help_swallows_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.current_view(), View::Keymap);
        press(&mut app, KeyCode::Esc);
        assert!(!app.show_help);
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
