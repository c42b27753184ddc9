//! Keyboard model error types

use crate::layout::KeyId;
use thiserror::Error;

/// Errors from layout, grid and profile operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyboardError {
    /// Key id is not part of the grid
    #[error("Unknown key: {0}")]
    UnknownKey(KeyId),

    /// No profile with this name
    #[error("Unknown profile: {0}")]
    UnknownProfile(String),

    /// Profile names must be unique within a container
    #[error("Profile already exists: {0}")]
    DuplicateProfile(String),

    /// A profile container needs at least one profile
    #[error("At least one profile is required")]
    NoProfiles,

    /// Color string could not be parsed
    #[error("Invalid color: {0}")]
    InvalidColor(String),
}
