//! Top-level navigation between the sidebar views

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// Sidebar views, in sidebar order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum View {
    Keymap,
    Lighting,
    Macro,
    FirmwareUpdate,
    KeyTest,
    BugReport,
}

impl View {
    /// All views in sidebar order
    pub const ALL: [View; 6] = [
        View::Keymap,
        View::Lighting,
        View::Macro,
        View::FirmwareUpdate,
        View::KeyTest,
        View::BugReport,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            View::Keymap => "Keymap",
            View::Lighting => "Lighting",
            View::Macro => "Macro",
            View::FirmwareUpdate => "Firmware Update",
            View::KeyTest => "Key Test",
            View::BugReport => "Bug Report",
        }
    }

    /// Whether the view has content behind it
    pub fn is_backed(&self) -> bool {
        matches!(self, View::Keymap | View::Lighting)
    }

    /// View at a sidebar position (0-based)
    pub fn from_index(index: usize) -> Option<View> {
        Self::ALL.get(index).copied()
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// Navigation target without content
    #[error("{} is not available", .0.display_name())]
    Unavailable(View),
}

/// Exactly one current view; starts on Keymap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSwitcher {
    current: View,
}

impl Default for ViewSwitcher {
    fn default() -> Self {
        Self {
            current: View::Keymap,
        }
    }
}

impl ViewSwitcher {
    pub fn new(initial: View) -> Result<Self, ViewError> {
        let mut switcher = Self::default();
        switcher.select(initial)?;
        Ok(switcher)
    }

    pub fn current(&self) -> View {
        self.current
    }

    pub fn is_visible(&self, view: View) -> bool {
        self.current == view
    }

    /// Switch to `view`. Views without content are rejected and the current
    /// view stays visible.
    pub fn select(&mut self, view: View) -> Result<(), ViewError> {
        if !view.is_backed() {
            return Err(ViewError::Unavailable(view));
        }
        if self.current != view {
            info!("Switching view: {} -> {}", self.current.display_name(), view.display_name());
            self.current = view;
        }
        Ok(())
    }
}
