//! Static physical keyboard layout
//!
//! The layout is an ordered list of rows. Each row holds key labels; an empty
//! label is a spacer that consumes a grid column but never becomes a key.
//! Keys are identified by [`KeyId`], the ordinal of the key among all
//! non-empty slots, so labels that appear twice (`Enter`, `/`, `-`, `.`)
//! still name distinct keys.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

/// Stable key identifier (ordinal of the key in the layout table)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyId(pub u16);

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Physical key size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySize {
    pub width: u16,
    pub height: u16,
}

impl KeySize {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Size of every key without an override
pub const DEFAULT_KEY_SIZE: KeySize = KeySize::new(65, 55);

/// Logical grid position of a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GridCell {
    pub row: u16,
    pub column: u16,
}

/// Static definition of one physical key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDescriptor {
    pub id: KeyId,
    pub label: String,
    pub cell: GridCell,
    pub size: KeySize,
}

/// One physical row: key labels in order, `""` for spacers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSpec {
    slots: Vec<String>,
}

impl RowSpec {
    pub fn new<I, S>(slots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            slots: slots.into_iter().map(Into::into).collect(),
        }
    }

    /// Labels in this row, spacers included
    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    /// Number of slots that produce a key
    pub fn key_count(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_empty()).count()
    }
}

/// Full-size layout with the navigation and numpad clusters stacked below
#[rustfmt::skip]
const STANDARD_ROWS: &[&[&str]] = &[
    &[
        "Esc", "F1", "F2", "F3", "F4", "F5", "F6", "F7", "F8", "F9", "F10", "F11", "F12", "PrtSc",
        "ScrLk", "Pause",
    ],
    &[
        "`", "1", "2", "3", "4", "5", "6", "7", "8", "9", "0", "-", "=", "Backspace",
    ],
    &[
        "Tab", "Q", "W", "E", "R", "T", "Y", "U", "I", "O", "P", "[", "]", "\\",
    ],
    &[
        "Caps", "A", "S", "D", "F", "G", "H", "J", "K", "L", ";", "'", "Enter",
    ],
    &[
        "LShift", "Z", "X", "C", "V", "B", "N", "M", ",", ".", "/", "RShift",
    ],
    &["LCtrl", "LWin", "LAlt", "Space", "RAlt", "RWin", "RCtrl"],
    &["Ins", "Home", "PgUp", "Del", "End", "PgDn"],
    &["Up", "Left", "Down", "Right"],
    &["NumLock", "/", "*", "-", "N7", "N8", "N9", "+"],
    &["N4", "N5", "N6"],
    &["N1", "N2", "N3", "Enter"],
    &["N0", ".", ""],
];

/// Wide keys, looked up by label
const STANDARD_SIZE_OVERRIDES: &[(&str, KeySize)] = &[
    ("Backspace", KeySize::new(120, 50)),
    ("Tab", KeySize::new(100, 50)),
    ("Caps", KeySize::new(110, 50)),
    ("Enter", KeySize::new(110, 50)),
    ("LShift", KeySize::new(130, 50)),
    ("RShift", KeySize::new(130, 50)),
    ("Space", KeySize::new(400, 50)),
];

static STANDARD: LazyLock<KeyLayoutTable> =
    LazyLock::new(|| KeyLayoutTable::from_labels(STANDARD_ROWS, STANDARD_SIZE_OVERRIDES));

/// Immutable description of the physical keyboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyLayoutTable {
    rows: Vec<RowSpec>,
    size_overrides: BTreeMap<String, KeySize>,
    descriptors: Vec<KeyDescriptor>,
}

impl KeyLayoutTable {
    /// Build a table and resolve every key's id, grid cell and size.
    ///
    /// Within a row a running offset is bumped for every spacer, and a key at
    /// slot `i` lands in column `i + offset`.
    pub fn new(rows: Vec<RowSpec>, size_overrides: BTreeMap<String, KeySize>) -> Self {
        let mut descriptors = Vec::new();

        for (row_idx, row) in rows.iter().enumerate() {
            let mut col_offset = 0u16;
            for (col_idx, label) in row.slots().iter().enumerate() {
                if label.is_empty() {
                    col_offset += 1;
                    continue;
                }
                let size = size_overrides
                    .get(label)
                    .copied()
                    .unwrap_or(DEFAULT_KEY_SIZE);
                descriptors.push(KeyDescriptor {
                    id: KeyId(descriptors.len() as u16),
                    label: label.clone(),
                    cell: GridCell {
                        row: row_idx as u16,
                        column: col_idx as u16 + col_offset,
                    },
                    size,
                });
            }
        }

        Self {
            rows,
            size_overrides,
            descriptors,
        }
    }

    /// Build a table from string slices
    pub fn from_labels(rows: &[&[&str]], size_overrides: &[(&str, KeySize)]) -> Self {
        Self::new(
            rows.iter().map(|r| RowSpec::new(r.iter().copied())).collect(),
            size_overrides
                .iter()
                .map(|(label, size)| (label.to_string(), *size))
                .collect(),
        )
    }

    /// The process-wide standard layout
    pub fn standard() -> &'static KeyLayoutTable {
        &STANDARD
    }

    pub fn rows(&self) -> &[RowSpec] {
        &self.rows
    }

    pub fn size_overrides(&self) -> &BTreeMap<String, KeySize> {
        &self.size_overrides
    }

    /// Every key, in row-major order
    pub fn descriptors(&self) -> &[KeyDescriptor] {
        &self.descriptors
    }

    pub fn descriptor(&self, id: KeyId) -> Option<&KeyDescriptor> {
        self.descriptors.get(usize::from(id.0))
    }

    /// Size for a label: the override if present, otherwise the default
    pub fn size_for(&self, label: &str) -> KeySize {
        self.size_overrides
            .get(label)
            .copied()
            .unwrap_or(DEFAULT_KEY_SIZE)
    }

    /// Number of non-empty slots across all rows
    pub fn key_count(&self) -> usize {
        self.descriptors.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// All keys carrying `label`
    pub fn find_by_label<'a>(&'a self, label: &'a str) -> impl Iterator<Item = KeyId> + 'a {
        self.descriptors
            .iter()
            .filter(move |d| d.label == label)
            .map(|d| d.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_shape() {
        let table = KeyLayoutTable::standard();
        assert_eq!(table.row_count(), 12);
        let expected: usize = STANDARD_ROWS
            .iter()
            .map(|r| r.iter().filter(|s| !s.is_empty()).count())
            .sum();
        assert_eq!(table.key_count(), expected);
        assert_eq!(table.key_count(), 103);
    }

    #[test]
    fn test_ids_are_ordinals() {
        let table = KeyLayoutTable::standard();
        for (i, d) in table.descriptors().iter().enumerate() {
            assert_eq!(d.id, KeyId(i as u16));
            assert_eq!(table.descriptor(d.id), Some(d));
        }
        assert_eq!(table.descriptors()[0].label, "Esc");
    }

    #[test]
    fn test_duplicate_labels_get_distinct_ids() {
        let table = KeyLayoutTable::standard();
        let enters: Vec<_> = table.find_by_label("Enter").collect();
        assert_eq!(enters.len(), 2);
        assert_ne!(enters[0], enters[1]);
        assert_eq!(table.find_by_label("/").count(), 2);
        assert_eq!(table.find_by_label("-").count(), 2);
        assert_eq!(table.find_by_label(".").count(), 2);
    }

    #[test]
    fn test_spacer_offsets_following_keys() {
        let table = KeyLayoutTable::from_labels(&[&["A", "", "B", "C"]], &[]);
        let cols: Vec<_> = table.descriptors().iter().map(|d| d.cell.column).collect();
        // slot index plus one column per preceding spacer
        assert_eq!(cols, vec![0, 3, 4]);
        assert_eq!(table.key_count(), 3);
    }

    #[test]
    fn test_size_overrides() {
        let table = KeyLayoutTable::standard();
        assert_eq!(table.size_for("Space"), KeySize::new(400, 50));
        assert_eq!(table.size_for("Q"), DEFAULT_KEY_SIZE);
        for id in table.find_by_label("Enter") {
            assert_eq!(table.descriptor(id).map(|d| d.size), Some(KeySize::new(110, 50)));
        }
    }
}
