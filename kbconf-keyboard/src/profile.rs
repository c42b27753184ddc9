//! Named profiles, each holding an independent key grid

use crate::error::KeyboardError;
use crate::grid::{GridMode, KeyGrid};
use crate::layout::KeyLayoutTable;
use std::sync::Arc;
use tracing::debug;

/// One named key grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub grid: KeyGrid,
}

/// Profiles under a tab selector; exactly one is active
#[derive(Debug, Clone)]
pub struct ProfileContainer {
    table: Arc<KeyLayoutTable>,
    mode: GridMode,
    profiles: Vec<Profile>,
    active: usize,
}

impl ProfileContainer {
    /// Build a container with one profile per name; the first is active.
    pub fn new<I, S>(
        table: Arc<KeyLayoutTable>,
        mode: GridMode,
        names: I,
    ) -> Result<Self, KeyboardError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut container = Self {
            table,
            mode,
            profiles: Vec::new(),
            active: 0,
        };
        for name in names {
            container.add_profile(name)?;
        }
        if container.profiles.is_empty() {
            return Err(KeyboardError::NoProfiles);
        }
        Ok(container)
    }

    /// Add a tab named `name` with a freshly built grid
    pub fn add_profile(&mut self, name: impl Into<String>) -> Result<&mut KeyGrid, KeyboardError> {
        let name = name.into();
        if self.profiles.iter().any(|p| p.name == name) {
            return Err(KeyboardError::DuplicateProfile(name));
        }
        debug!("Adding {} profile {:?}", self.mode.display_name(), name);
        self.profiles.push(Profile {
            name,
            grid: KeyGrid::build(&self.table, self.mode),
        });
        let index = self.profiles.len() - 1;
        Ok(&mut self.profiles[index].grid)
    }

    pub fn mode(&self) -> GridMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Always false once constructed
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.iter().map(|p| p.name.as_str())
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    /// Label of the selected tab
    pub fn active_profile_name(&self) -> &str {
        &self.profiles[self.active].name
    }

    pub fn active(&self) -> &KeyGrid {
        &self.profiles[self.active].grid
    }

    pub fn active_mut(&mut self) -> &mut KeyGrid {
        &mut self.profiles[self.active].grid
    }

    pub fn get(&self, name: &str) -> Option<&KeyGrid> {
        self.profiles.iter().find(|p| p.name == name).map(|p| &p.grid)
    }

    /// Select a tab by index; out-of-range indices are ignored
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.profiles.len() {
            self.active = index;
            true
        } else {
            false
        }
    }

    pub fn select_by_name(&mut self, name: &str) -> Result<(), KeyboardError> {
        let index = self
            .profiles
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| KeyboardError::UnknownProfile(name.to_string()))?;
        self.active = index;
        Ok(())
    }

    /// Next tab, wrapping
    pub fn select_next(&mut self) {
        self.active = (self.active + 1) % self.profiles.len();
    }

    /// Previous tab, wrapping
    pub fn select_prev(&mut self) {
        self.active = if self.active == 0 {
            self.profiles.len() - 1
        } else {
            self.active - 1
        };
    }
}
