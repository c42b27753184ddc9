//! Main window state and the action dispatcher
//!
//! Every user interaction ends up as an [`Action`] passed to
//! [`App::dispatch`]. Key activations carry the key's id instead of a
//! callback, and the app decides what they mean for the current view.

use crate::config::AppConfig;
use crate::tui::picker::{ColorPicker, PickerLayout, PickerOutcome};
use crate::view::{View, ViewError, ViewSwitcher};
use crossterm::event::KeyEvent;
use kbconf_keyboard::{
    Activation, GridGeometry, GridMode, KeyGrid, KeyId, KeyLayoutTable, KeyboardError,
    NavDirection, ProfileContainer, RgbColor, DEFAULT_PROFILE_NAMES,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Keyboard(#[from] KeyboardError),

    #[error(transparent)]
    View(#[from] ViewError),
}

/// Everything the main window can be asked to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SelectView(View),
    /// Select a profile tab of the current view
    SelectProfile(usize),
    NextProfile,
    PrevProfile,
    /// A key control was activated (clicked or Enter on the cursor)
    ActivateKey(KeyId),
    /// The color picker closed; `None` means cancelled
    ApplyColor {
        key: KeyId,
        color: Option<RgbColor>,
    },
    MoveCursor(NavDirection),
    ActivateCursor,
    HoverKey(Option<KeyId>),
    /// Re-apply labels of the active keymap profile
    Reset,
    Scroll {
        dx: i16,
        dy: i16,
    },
    ToggleHelp,
    Quit,
}

/// Main window: views, both profile containers and transient UI state
pub struct App {
    pub config: AppConfig,
    views: ViewSwitcher,
    keymap: ProfileContainer,
    lighting: ProfileContainer,
    geometry: GridGeometry,
    picker: Option<ColorPicker>,
    cursor: Option<KeyId>,
    hovered: Option<KeyId>,
    scroll: (u16, u16),
    viewport: (u16, u16),
    /// Status message (for errors/info)
    pub status_message: Option<String>,
    pub show_help: bool,
    pub should_quit: bool,
}

impl App {
    /// Build the window on the standard layout
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        Self::with_table(config, Arc::new(KeyLayoutTable::standard().clone()))
    }

    /// Build the window on a custom layout table
    pub fn with_table(config: AppConfig, table: Arc<KeyLayoutTable>) -> Result<Self, AppError> {
        let views = ViewSwitcher::new(config.initial_view)?;
        let keymap =
            ProfileContainer::new(Arc::clone(&table), GridMode::Keymap, DEFAULT_PROFILE_NAMES)?;
        let lighting =
            ProfileContainer::new(Arc::clone(&table), GridMode::Lighting, DEFAULT_PROFILE_NAMES)?;
        let geometry = keymap.active().geometry(config.cell_metrics());
        info!(
            "Window ready: {} keys per profile, grid {}x{} cells",
            table.key_count(),
            geometry.width(),
            geometry.height()
        );

        Ok(Self {
            config,
            views,
            keymap,
            lighting,
            geometry,
            picker: None,
            cursor: None,
            hovered: None,
            scroll: (0, 0),
            viewport: (0, 0),
            status_message: None,
            show_help: false,
            should_quit: false,
        })
    }

    pub fn current_view(&self) -> View {
        self.views.current()
    }

    pub fn views(&self) -> &ViewSwitcher {
        &self.views
    }

    pub fn keymap_profiles(&self) -> &ProfileContainer {
        &self.keymap
    }

    pub fn lighting_profiles(&self) -> &ProfileContainer {
        &self.lighting
    }

    /// Profile container shown by the current view
    pub fn current_profiles(&self) -> &ProfileContainer {
        match self.views.current() {
            View::Lighting => &self.lighting,
            _ => &self.keymap,
        }
    }

    fn current_profiles_mut(&mut self) -> &mut ProfileContainer {
        match self.views.current() {
            View::Lighting => &mut self.lighting,
            _ => &mut self.keymap,
        }
    }

    /// Grid of the active profile in the current view
    pub fn current_grid(&self) -> &KeyGrid {
        self.current_profiles().active()
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    pub fn picker(&self) -> Option<&ColorPicker> {
        self.picker.as_ref()
    }

    pub fn cursor(&self) -> Option<KeyId> {
        self.cursor
    }

    pub fn hovered(&self) -> Option<KeyId> {
        self.hovered
    }

    /// Grid scroll offset in cells (x, y)
    pub fn scroll(&self) -> (u16, u16) {
        self.scroll
    }

    /// Size of the grid viewport from the last layout pass
    pub fn set_viewport(&mut self, width: u16, height: u16) {
        self.viewport = (width, height);
        self.clamp_scroll();
    }

    /// Fill color a key is drawn with (user color or theme default)
    pub fn key_color(&self, key: KeyId) -> RgbColor {
        self.current_grid()
            .get(key)
            .and_then(|k| k.color())
            .unwrap_or(self.config.theme.key)
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Apply one action. While the color picker is open only the picker's
    /// own result and quitting get through.
    pub fn dispatch(&mut self, action: Action) {
        if self.picker.is_some() && !matches!(action, Action::ApplyColor { .. } | Action::Quit) {
            debug!("Ignoring {:?} while the color picker is open", action);
            return;
        }

        match action {
            Action::SelectView(view) => self.select_view(view),
            Action::SelectProfile(index) => {
                if self.current_profiles_mut().select(index) {
                    self.on_profile_changed();
                }
            }
            Action::NextProfile => {
                self.current_profiles_mut().select_next();
                self.on_profile_changed();
            }
            Action::PrevProfile => {
                self.current_profiles_mut().select_prev();
                self.on_profile_changed();
            }
            Action::ActivateKey(key) => self.activate_key(key),
            Action::ApplyColor { key, color } => self.apply_color(key, color),
            Action::MoveCursor(direction) => self.move_cursor(direction),
            Action::ActivateCursor => match self.cursor {
                Some(key) => self.activate_key(key),
                None => self.move_cursor(NavDirection::Right),
            },
            Action::HoverKey(key) => self.hovered = key,
            Action::Reset => self.reset_profile(),
            Action::Scroll { dx, dy } => self.scroll_by(dx, dy),
            Action::ToggleHelp => self.show_help = !self.show_help,
            Action::Quit => self.should_quit = true,
        }
    }

    /// Feed a key press to the open color picker
    pub fn picker_key(&mut self, key: KeyEvent) {
        let Some(picker) = self.picker.as_mut() else {
            return;
        };
        let outcome = picker.handle_key(key);
        self.finish_picker(outcome);
    }

    /// Feed a mouse click to the open color picker
    pub fn picker_click(&mut self, layout: &PickerLayout, column: u16, row: u16) {
        let Some(picker) = self.picker.as_mut() else {
            return;
        };
        let outcome = picker.handle_click(layout, column, row);
        self.finish_picker(outcome);
    }

    fn finish_picker(&mut self, outcome: PickerOutcome) {
        let (Some(choice), Some(picker)) = (outcome.finished(), self.picker.as_ref()) else {
            return;
        };
        let key = picker.key();
        self.dispatch(Action::ApplyColor { key, color: choice });
    }

    fn select_view(&mut self, view: View) {
        match self.views.select(view) {
            Ok(()) => {
                self.hovered = None;
                self.set_status(format!("{} view", view.display_name()));
            }
            Err(e) => {
                warn!("{}", e);
                self.set_status(e.to_string());
            }
        }
    }

    fn on_profile_changed(&mut self) {
        let profiles = self.current_profiles();
        info!(
            "{} profile: {}",
            profiles.mode().display_name(),
            profiles.active_profile_name()
        );
        let message = format!("{} selected", profiles.active_profile_name());
        self.set_status(message);
    }

    fn activate_key(&mut self, key: KeyId) {
        let Some(control) = self.current_grid().get(key) else {
            warn!("Activation of unknown key {}", key);
            self.set_status(KeyboardError::UnknownKey(key).to_string());
            return;
        };
        let label = control.label().to_string();
        let activation = control.activation();
        self.cursor = Some(key);

        match activation {
            Activation::Inert => self.set_status(label),
            Activation::PickColor => {
                let current = self.key_color(key);
                debug!("Opening color picker for {} ({})", label, current);
                self.set_status(format!("Select color for {label}"));
                self.picker = Some(ColorPicker::open(key, label, current));
            }
        }
    }

    /// Apply the picker's result. Only the key the open picker was opened
    /// for can be colored.
    fn apply_color(&mut self, key: KeyId, color: Option<RgbColor>) {
        match self.picker.as_ref().map(ColorPicker::key) {
            Some(open) if open == key => self.picker = None,
            Some(open) => {
                warn!("Ignoring color for key {} while picking for key {}", key, open);
                return;
            }
            None => {
                warn!("Ignoring color for key {} without an open color picker", key);
                return;
            }
        }
        let Some(color) = color else {
            debug!("Color picker cancelled");
            self.set_status("Color unchanged");
            return;
        };

        let profile = self.lighting.active_profile_name().to_string();
        match self.lighting.active_mut().set_color(key, color) {
            Ok(()) => {
                let label = self
                    .lighting
                    .active()
                    .get(key)
                    .map(|k| k.label().to_string())
                    .unwrap_or_default();
                info!("{}: {} -> {}", profile, label, color);
                self.set_status(format!("{label} set to {color}"));
            }
            Err(e) => {
                warn!("Failed to apply color: {}", e);
                self.set_status(e.to_string());
            }
        }
    }

    /// Reapply every label of the active keymap profile
    pub fn reset_profile(&mut self) {
        let name = self.keymap.active_profile_name().to_string();
        self.keymap.active_mut().reset_labels();
        info!("Reset layout of {}", name);
        self.set_status(format!("{name} reset"));
    }

    fn move_cursor(&mut self, direction: NavDirection) {
        let next = match self.cursor {
            Some(current) => self.geometry.neighbor(current, direction),
            None => self.geometry.iter().next().map(|(id, _)| id),
        };
        if let Some(key) = next {
            self.cursor = Some(key);
            self.scroll_to(key);
        }
    }

    /// Scroll just enough to show `key` in the viewport
    fn scroll_to(&mut self, key: KeyId) {
        let Some(rect) = self.geometry.rect(key) else {
            return;
        };
        let (vw, vh) = self.viewport;
        if vw == 0 || vh == 0 {
            return;
        }
        let (mut sx, mut sy) = self.scroll;
        if rect.x < sx {
            sx = rect.x;
        } else if rect.x + rect.width > sx + vw {
            sx = (rect.x + rect.width).saturating_sub(vw);
        }
        if rect.y < sy {
            sy = rect.y;
        } else if rect.y + rect.height > sy + vh {
            sy = (rect.y + rect.height).saturating_sub(vh);
        }
        self.scroll = (sx, sy);
        self.clamp_scroll();
    }

    fn scroll_by(&mut self, dx: i16, dy: i16) {
        let (sx, sy) = self.scroll;
        self.scroll = (sx.saturating_add_signed(dx), sy.saturating_add_signed(dy));
        self.clamp_scroll();
    }

    fn clamp_scroll(&mut self) {
        let max_x = self.geometry.width().saturating_sub(self.viewport.0);
        let max_y = self.geometry.height().saturating_sub(self.viewport.1);
        self.scroll = (self.scroll.0.min(max_x), self.scroll.1.min(max_y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn app() -> App {
        App::new(AppConfig::default()).unwrap()
    }

    fn key(app: &App, label: &str) -> KeyId {
        app.current_grid().find_by_label(label)[0]
    }

    #[test]
    fn test_starts_on_keymap_profile_1() {
        let app = app();
        assert_eq!(app.current_view(), View::Keymap);
        assert_eq!(app.current_profiles().active_profile_name(), "Profile 1");
        assert!(app.picker().is_none());
    }

    #[test]
    fn test_keymap_activation_is_inert() {
        let mut app = app();
        let esc = key(&app, "Esc");
        app.dispatch(Action::ActivateKey(esc));
        assert!(app.picker().is_none());
        assert_eq!(app.cursor(), Some(esc));
    }

    #[test]
    fn test_lighting_activation_opens_picker() {
        let mut app = app();
        app.dispatch(Action::SelectView(View::Lighting));
        let q = key(&app, "Q");
        app.dispatch(Action::ActivateKey(q));
        let picker = app.picker().unwrap();
        assert_eq!(picker.key(), q);
        assert_eq!(picker.original(), app.config.theme.key);
    }

    #[test]
    fn test_picker_is_modal() {
        let mut app = app();
        app.dispatch(Action::SelectView(View::Lighting));
        let q = key(&app, "Q");
        app.dispatch(Action::ActivateKey(q));
        app.dispatch(Action::SelectView(View::Keymap));
        app.dispatch(Action::NextProfile);
        assert_eq!(app.current_view(), View::Lighting);
        assert_eq!(app.current_profiles().active_index(), 0);
        assert!(app.picker().is_some());
    }

    #[test]
    fn test_confirm_changes_only_that_key() {
        let mut app = app();
        app.dispatch(Action::SelectView(View::Lighting));
        let q = key(&app, "Q");
        app.dispatch(Action::ActivateKey(q));
        app.picker_key(KeyEvent::new(KeyCode::Left, KeyModifiers::NONE));
        let chosen = app.picker().unwrap().color();
        assert_ne!(chosen, app.config.theme.key);
        app.picker_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));

        assert!(app.picker().is_none());
        assert_eq!(app.current_grid().color(q), Ok(Some(chosen)));
        assert!(app
            .current_grid()
            .iter()
            .filter(|k| k.id() != q)
            .all(|k| k.color().is_none()));
    }

    #[test]
    fn test_color_for_other_key_ignored() {
        let mut app = app();
        app.dispatch(Action::SelectView(View::Lighting));
        let a = key(&app, "A");
        let s = key(&app, "S");
        app.dispatch(Action::ActivateKey(a));
        app.dispatch(Action::ApplyColor {
            key: s,
            color: Some(RgbColor::RED),
        });
        assert_eq!(app.current_grid().color(s), Ok(None));
        assert_eq!(app.current_grid().color(a), Ok(None));
        assert_eq!(app.picker().map(|p| p.key()), Some(a));
    }

    #[test]
    fn test_color_without_picker_ignored() {
        let mut app = app();
        let q = key(&app, "Q");
        app.dispatch(Action::ApplyColor {
            key: q,
            color: Some(RgbColor::BLUE),
        });
        assert_eq!(app.lighting_profiles().active().color(q), Ok(None));
        assert!(app.picker().is_none());
    }

    #[test]
    fn test_cancel_leaves_color() {
        let mut app = app();
        app.dispatch(Action::SelectView(View::Lighting));
        let q = key(&app, "Q");
        app.dispatch(Action::ActivateKey(q));
        app.picker_key(KeyEvent::new(KeyCode::Up, KeyModifiers::NONE));
        app.picker_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        assert!(app.picker().is_none());
        assert_eq!(app.current_grid().color(q), Ok(None));
        assert_eq!(app.status_message.as_deref(), Some("Color unchanged"));
    }

    #[test]
    fn test_unknown_key_reports_status() {
        let mut app = app();
        app.dispatch(Action::ActivateKey(KeyId(999)));
        assert!(app.cursor().is_none());
        assert_eq!(app.status_message.as_deref(), Some("Unknown key: 999"));
    }

    #[test]
    fn test_unbacked_view_keeps_current() {
        let mut app = app();
        app.dispatch(Action::SelectView(View::Lighting));
        app.dispatch(Action::SelectView(View::Macro));
        assert_eq!(app.current_view(), View::Lighting);
        assert_eq!(app.status_message.as_deref(), Some("Macro is not available"));
    }

    #[test]
    fn test_profile_tabs_per_view() {
        let mut app = app();
        app.dispatch(Action::SelectProfile(1));
        assert_eq!(app.keymap_profiles().active_profile_name(), "Profile 2");
        assert_eq!(app.lighting_profiles().active_profile_name(), "Profile 1");
        app.dispatch(Action::SelectProfile(7));
        assert_eq!(app.keymap_profiles().active_profile_name(), "Profile 2");
    }

    #[test]
    fn test_reset_keeps_labels() {
        let mut app = app();
        let labels = |app: &App| -> Vec<String> {
            app.current_grid()
                .iter()
                .map(|k| k.label().to_string())
                .collect()
        };
        let before = labels(&app);
        app.dispatch(Action::Reset);
        let after = labels(&app);
        assert_eq!(before, after);
        assert_eq!(app.status_message.as_deref(), Some("Profile 1 reset"));
    }

    #[test]
    fn test_cursor_starts_at_first_key_and_moves() {
        let mut app = app();
        app.dispatch(Action::MoveCursor(NavDirection::Right));
        assert_eq!(app.cursor(), Some(key(&app, "Esc")));
        app.dispatch(Action::MoveCursor(NavDirection::Right));
        assert_eq!(app.cursor(), Some(key(&app, "F1")));
        app.dispatch(Action::MoveCursor(NavDirection::Down));
        assert_eq!(app.cursor(), Some(key(&app, "1")));
    }

    #[test]
    fn test_scroll_clamped_to_grid() {
        let mut app = app();
        app.set_viewport(40, 10);
        app.dispatch(Action::Scroll { dx: -5, dy: -5 });
        assert_eq!(app.scroll(), (0, 0));
        app.dispatch(Action::Scroll { dx: 1000, dy: 1000 });
        let geo = app.geometry();
        assert_eq!(app.scroll(), (geo.width() - 40, geo.height() - 10));
    }

    #[test]
    fn test_cursor_scrolls_into_view() {
        let mut app = app();
        app.set_viewport(30, 6);
        app.dispatch(Action::MoveCursor(NavDirection::Right));
        for _ in 0..4 {
            app.dispatch(Action::MoveCursor(NavDirection::Down));
        }
        let rect = app.geometry().rect(app.cursor().unwrap()).unwrap();
        let (_, sy) = app.scroll();
        assert!(rect.y >= sy && rect.y + rect.height <= sy + 6);
    }
}
