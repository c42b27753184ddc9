//! Keyboard model for the kbconf configurator
//!
//! This crate holds everything that does not depend on a terminal: the
//! static layout table, per-profile key grids and their geometry, and the
//! color type used for per-key lighting.

pub mod color;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod layout;
pub mod profile;

pub use color::RgbColor;
pub use error::KeyboardError;
pub use geometry::{CellMetrics, CellRect, GridGeometry, NavDirection};
pub use grid::{Activation, GridMode, KeyControl, KeyGrid};
pub use layout::{
    GridCell, KeyDescriptor, KeyId, KeyLayoutTable, KeySize, RowSpec, DEFAULT_KEY_SIZE,
};
pub use profile::{Profile, ProfileContainer};

/// Profile names used by both views
pub const DEFAULT_PROFILE_NAMES: [&str; 2] = ["Profile 1", "Profile 2"];
