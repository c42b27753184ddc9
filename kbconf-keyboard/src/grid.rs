//! Key grid: the per-profile set of key controls built from a layout table

use crate::color::RgbColor;
use crate::error::KeyboardError;
use crate::geometry::{CellMetrics, GridGeometry};
use crate::layout::{GridCell, KeyDescriptor, KeyId, KeyLayoutTable, KeySize};
use std::collections::BTreeMap;
use tracing::debug;

/// What a grid is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridMode {
    /// Inert key buttons
    Keymap,
    /// Activating a key opens the color picker for it
    Lighting,
}

impl GridMode {
    pub fn display_name(&self) -> &'static str {
        match self {
            GridMode::Keymap => "Keymap",
            GridMode::Lighting => "Lighting",
        }
    }
}

/// What happens when a key control is activated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Inert,
    PickColor,
}

impl From<GridMode> for Activation {
    fn from(mode: GridMode) -> Self {
        match mode {
            GridMode::Keymap => Activation::Inert,
            GridMode::Lighting => Activation::PickColor,
        }
    }
}

/// Mutable state of one key in one profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyControl {
    descriptor: KeyDescriptor,
    label: String,
    color: Option<RgbColor>,
    activation: Activation,
}

impl KeyControl {
    fn new(descriptor: &KeyDescriptor, activation: Activation) -> Self {
        Self {
            label: descriptor.label.clone(),
            descriptor: descriptor.clone(),
            color: None,
            activation,
        }
    }

    pub fn id(&self) -> KeyId {
        self.descriptor.id
    }

    /// Displayed label
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn cell(&self) -> GridCell {
        self.descriptor.cell
    }

    pub fn size(&self) -> KeySize {
        self.descriptor.size
    }

    /// User-chosen color, `None` when the key uses the theme default
    pub fn color(&self) -> Option<RgbColor> {
        self.color
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    pub fn descriptor(&self) -> &KeyDescriptor {
        &self.descriptor
    }
}

/// Identifier to control mapping for one profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyGrid {
    mode: GridMode,
    keys: BTreeMap<KeyId, KeyControl>,
}

impl KeyGrid {
    /// Create one control per non-empty slot of `table`. Spacers produce no
    /// control; they only shift later keys in their row.
    pub fn build(table: &KeyLayoutTable, mode: GridMode) -> Self {
        let activation = Activation::from(mode);
        let keys: BTreeMap<_, _> = table
            .descriptors()
            .iter()
            .map(|d| (d.id, KeyControl::new(d, activation)))
            .collect();
        debug!("Built {} grid with {} keys", mode.display_name(), keys.len());
        Self { mode, keys }
    }

    pub fn mode(&self) -> GridMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn get(&self, id: KeyId) -> Option<&KeyControl> {
        self.keys.get(&id)
    }

    /// Controls in id order
    pub fn iter(&self) -> impl Iterator<Item = &KeyControl> {
        self.keys.values()
    }

    /// Every key showing `label`
    pub fn find_by_label(&self, label: &str) -> Vec<KeyId> {
        self.keys
            .values()
            .filter(|k| k.label == label)
            .map(KeyControl::id)
            .collect()
    }

    pub fn color(&self, id: KeyId) -> Result<Option<RgbColor>, KeyboardError> {
        self.control(id).map(KeyControl::color)
    }

    /// Set the fill color of exactly one key
    pub fn set_color(&mut self, id: KeyId, color: RgbColor) -> Result<(), KeyboardError> {
        let key = self.control_mut(id)?;
        key.color = Some(color);
        Ok(())
    }

    pub fn activation(&self, id: KeyId) -> Result<Activation, KeyboardError> {
        self.control(id).map(KeyControl::activation)
    }

    /// Reassign every key's label to its current label. Nothing else mutates
    /// labels, so this leaves the grid unchanged; colors are not touched.
    pub fn reset_labels(&mut self) {
        for key in self.keys.values_mut() {
            let label = key.label.clone();
            key.label = label;
        }
    }

    /// Terminal-cell geometry of this grid
    pub fn geometry(&self, metrics: CellMetrics) -> GridGeometry {
        GridGeometry::compute(self.keys.values().map(KeyControl::descriptor), metrics)
    }

    fn control(&self, id: KeyId) -> Result<&KeyControl, KeyboardError> {
        self.keys.get(&id).ok_or(KeyboardError::UnknownKey(id))
    }

    fn control_mut(&mut self, id: KeyId) -> Result<&mut KeyControl, KeyboardError> {
        self.keys.get_mut(&id).ok_or(KeyboardError::UnknownKey(id))
    }
}
