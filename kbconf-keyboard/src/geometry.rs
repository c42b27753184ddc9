//! Grid geometry in terminal cells
//!
//! Keys sit in a grid of rows and columns. Like a Qt grid layout, a column is
//! as wide as its widest key and a row as tall as its tallest key; each key
//! is anchored at the top-left of its cell with its own size.

use crate::layout::{KeyDescriptor, KeyId};
use std::collections::BTreeMap;

/// Pixel to terminal cell conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellMetrics {
    pub px_per_column: u16,
    pub px_per_row: u16,
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self {
            px_per_column: 13,
            px_per_row: 18,
        }
    }
}

impl CellMetrics {
    /// Width in cells, rounded, at least one
    pub fn columns(&self, px: u16) -> u16 {
        to_cells(px, self.px_per_column)
    }

    /// Height in cells, rounded, at least one
    pub fn rows(&self, px: u16) -> u16 {
        to_cells(px, self.px_per_row)
    }
}

fn to_cells(px: u16, per_cell: u16) -> u16 {
    let per_cell = u32::from(per_cell.max(1));
    let cells = (u32::from(px) + per_cell / 2) / per_cell;
    cells.clamp(1, u32::from(u16::MAX)) as u16
}

/// Rectangle relative to the grid origin, in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl CellRect {
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    /// Center point, doubled to stay in integers
    fn center2(&self) -> (i32, i32) {
        (
            2 * i32::from(self.x) + i32::from(self.width),
            2 * i32::from(self.y) + i32::from(self.height),
        )
    }
}

/// Cursor movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Resolved positions of every key in a grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridGeometry {
    column_widths: Vec<u16>,
    row_heights: Vec<u16>,
    keys: BTreeMap<KeyId, CellRect>,
}

impl GridGeometry {
    pub fn compute<'a, I>(descriptors: I, metrics: CellMetrics) -> Self
    where
        I: IntoIterator<Item = &'a KeyDescriptor>,
    {
        let mut column_widths: Vec<u16> = Vec::new();
        let mut row_heights: Vec<u16> = Vec::new();
        let mut sized = Vec::new();

        for d in descriptors {
            let (col, row) = (usize::from(d.cell.column), usize::from(d.cell.row));
            let width = metrics.columns(d.size.width);
            let height = metrics.rows(d.size.height);

            if column_widths.len() <= col {
                column_widths.resize(col + 1, 0);
            }
            if row_heights.len() <= row {
                row_heights.resize(row + 1, 0);
            }
            column_widths[col] = column_widths[col].max(width);
            row_heights[row] = row_heights[row].max(height);
            sized.push((d.id, col, row, width, height));
        }

        let column_x = prefix_sums(&column_widths);
        let row_y = prefix_sums(&row_heights);

        let keys = sized
            .into_iter()
            .map(|(id, col, row, width, height)| {
                (
                    id,
                    CellRect {
                        x: column_x[col],
                        y: row_y[row],
                        width,
                        height,
                    },
                )
            })
            .collect();

        Self {
            column_widths,
            row_heights,
            keys,
        }
    }

    /// Column widths; spacer-only columns have width zero
    pub fn column_widths(&self) -> &[u16] {
        &self.column_widths
    }

    pub fn row_heights(&self) -> &[u16] {
        &self.row_heights
    }

    /// Total width in cells
    pub fn width(&self) -> u16 {
        self.column_widths.iter().sum()
    }

    /// Total height in cells
    pub fn height(&self) -> u16 {
        self.row_heights.iter().sum()
    }

    pub fn rect(&self, id: KeyId) -> Option<CellRect> {
        self.keys.get(&id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (KeyId, CellRect)> + '_ {
        self.keys.iter().map(|(id, rect)| (*id, *rect))
    }

    /// Key covering a grid-relative cell
    pub fn key_at(&self, x: u16, y: u16) -> Option<KeyId> {
        self.keys
            .iter()
            .find(|(_, rect)| rect.contains(x, y))
            .map(|(id, _)| *id)
    }

    /// Nearest key from `from` in `direction`.
    ///
    /// Candidates must lie strictly on that side of the current key's center;
    /// distance along the movement axis counts more than drift across it.
    pub fn neighbor(&self, from: KeyId, direction: NavDirection) -> Option<KeyId> {
        let (cx, cy) = self.keys.get(&from)?.center2();

        self.keys
            .iter()
            .filter(|(id, _)| **id != from)
            .filter_map(|(id, rect)| {
                let (x, y) = rect.center2();
                let (along, across) = match direction {
                    NavDirection::Up => (cy - y, x - cx),
                    NavDirection::Down => (y - cy, x - cx),
                    NavDirection::Left => (cx - x, y - cy),
                    NavDirection::Right => (x - cx, y - cy),
                };
                (along > 0).then_some((*id, along + 2 * across.abs()))
            })
            .min_by_key(|(id, score)| (*score, *id))
            .map(|(id, _)| id)
    }
}

fn prefix_sums(sizes: &[u16]) -> Vec<u16> {
    sizes
        .iter()
        .scan(0u16, |acc, size| {
            let start = *acc;
            *acc += size;
            Some(start)
        })
        .collect()
}
