//! Modal color picker popup
//!
//! Opened for exactly one key. While it is open it receives every input
//! event; it ends with [`PickerOutcome::Confirmed`] or
//! [`PickerOutcome::Cancelled`].

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use kbconf_keyboard::{KeyId, RgbColor};
use ratatui::layout::Rect;

/// Swatches per palette row
pub const PALETTE_COLUMNS: usize = 8;

/// Basic colors offered as swatches
pub const PALETTE: [RgbColor; 24] = [
    RgbColor::new(0x00, 0x00, 0x00),
    RgbColor::new(0x80, 0x80, 0x80),
    RgbColor::new(0xc0, 0xc0, 0xc0),
    RgbColor::new(0xff, 0xff, 0xff),
    RgbColor::new(0x80, 0x00, 0x00),
    RgbColor::new(0xff, 0x00, 0x00),
    RgbColor::new(0x80, 0x80, 0x00),
    RgbColor::new(0xff, 0xff, 0x00),
    RgbColor::new(0x00, 0x80, 0x00),
    RgbColor::new(0x00, 0xff, 0x00),
    RgbColor::new(0x00, 0x80, 0x80),
    RgbColor::new(0x00, 0xff, 0xff),
    RgbColor::new(0x00, 0x00, 0x80),
    RgbColor::new(0x00, 0x00, 0xff),
    RgbColor::new(0x80, 0x00, 0x80),
    RgbColor::new(0xff, 0x00, 0xff),
    RgbColor::new(0xff, 0x80, 0x00),
    RgbColor::new(0xff, 0x80, 0x80),
    RgbColor::new(0x80, 0xff, 0x80),
    RgbColor::new(0x80, 0xff, 0xff),
    RgbColor::new(0x80, 0x80, 0xff),
    RgbColor::new(0xff, 0x80, 0xff),
    RgbColor::new(0xd3, 0x2f, 0x2f),
    RgbColor::new(0x3c, 0x3f, 0x41),
];

const SWATCH_WIDTH: u16 = 4;
const SWATCH_STRIDE: u16 = SWATCH_WIDTH + 1;
const POPUP_WIDTH: u16 = 2 + SWATCH_STRIDE * PALETTE_COLUMNS as u16 + 1;
const POPUP_HEIGHT: u16 = 16;
const HEX_MAX_LEN: usize = 7;

/// Focusable part of the picker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerField {
    Palette,
    Red,
    Green,
    Blue,
    Hex,
}

impl PickerField {
    const ORDER: [PickerField; 5] = [
        PickerField::Palette,
        PickerField::Red,
        PickerField::Green,
        PickerField::Blue,
        PickerField::Hex,
    ];

    fn next(self) -> Self {
        let i = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(i + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        let i = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(i + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Result of feeding an event to the picker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerOutcome {
    /// Still open
    Pending,
    Confirmed(RgbColor),
    Cancelled,
}

impl PickerOutcome {
    /// `None` while the picker stays open, otherwise the chosen color (if any)
    pub fn finished(self) -> Option<Option<RgbColor>> {
        match self {
            PickerOutcome::Pending => None,
            PickerOutcome::Confirmed(color) => Some(Some(color)),
            PickerOutcome::Cancelled => Some(None),
        }
    }
}

/// Screen areas of the popup, shared by rendering and mouse handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerLayout {
    pub popup: Rect,
    pub info: Rect,
    pub swatches: Vec<Rect>,
    pub channels: [Rect; 3],
    pub hex: Rect,
    pub preview: Rect,
    pub ok: Rect,
    pub cancel: Rect,
}

impl PickerLayout {
    /// Center the popup in `area`
    pub fn new(area: Rect) -> Self {
        let width = POPUP_WIDTH.min(area.width);
        let height = POPUP_HEIGHT.min(area.height);
        let popup = Rect::new(
            area.x + (area.width - width) / 2,
            area.y + (area.height - height) / 2,
            width,
            height,
        );
        let x = popup.x + 2;
        let y = popup.y + 1;
        let line = |dy: u16, w: u16| Rect::new(x, y + dy, w, 1).intersection(popup);

        let swatches = (0..PALETTE.len())
            .map(|i| {
                let col = (i % PALETTE_COLUMNS) as u16;
                let row = (i / PALETTE_COLUMNS) as u16;
                shift_x(line(2 + row, SWATCH_WIDTH), col * SWATCH_STRIDE, popup)
            })
            .collect();

        Self {
            popup,
            info: line(0, width.saturating_sub(4)),
            swatches,
            channels: [
                line(6, width.saturating_sub(4)),
                line(7, width.saturating_sub(4)),
                line(8, width.saturating_sub(4)),
            ],
            hex: line(9, width.saturating_sub(4)),
            preview: line(11, width.saturating_sub(4)),
            ok: line(13, 6),
            cancel: shift_x(line(13, 10), 8, popup),
        }
    }

    pub fn swatch_at(&self, column: u16, row: u16) -> Option<usize> {
        self.swatches.iter().position(|r| contains(r, column, row))
    }
}

fn shift_x(rect: Rect, dx: u16, bounds: Rect) -> Rect {
    Rect::new(rect.x + dx, rect.y, rect.width, rect.height).intersection(bounds)
}

pub(crate) fn contains(rect: &Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.x + rect.width && row >= rect.y && row < rect.y + rect.height
}

/// Color selection state for one key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorPicker {
    key: KeyId,
    key_label: String,
    original: RgbColor,
    color: RgbColor,
    field: PickerField,
    palette_cursor: usize,
    hex_input: String,
    hex_error: bool,
}

impl ColorPicker {
    /// Open the picker for `key`, starting from its current color
    pub fn open(key: KeyId, key_label: impl Into<String>, current: RgbColor) -> Self {
        let palette_cursor = PALETTE.iter().position(|c| *c == current).unwrap_or(0);
        Self {
            key,
            key_label: key_label.into(),
            original: current,
            color: current,
            field: PickerField::Palette,
            palette_cursor,
            hex_input: current.to_string(),
            hex_error: false,
        }
    }

    pub fn key(&self) -> KeyId {
        self.key
    }

    pub fn key_label(&self) -> &str {
        &self.key_label
    }

    /// Color the key had when the picker opened
    pub fn original(&self) -> RgbColor {
        self.original
    }

    /// Color currently selected in the picker
    pub fn color(&self) -> RgbColor {
        self.color
    }

    pub fn field(&self) -> PickerField {
        self.field
    }

    pub fn palette_cursor(&self) -> usize {
        self.palette_cursor
    }

    pub fn hex_input(&self) -> &str {
        &self.hex_input
    }

    pub fn hex_error(&self) -> bool {
        self.hex_error
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PickerOutcome {
        let step: u8 = if key.modifiers.contains(KeyModifiers::SHIFT) {
            16
        } else {
            1
        };

        match key.code {
            KeyCode::Esc => return PickerOutcome::Cancelled,
            KeyCode::Enter => return self.confirm(),
            KeyCode::Tab => self.field = self.field.next(),
            KeyCode::BackTab => self.field = self.field.prev(),
            code => match self.field {
                PickerField::Palette => self.handle_palette_key(code),
                PickerField::Red | PickerField::Green | PickerField::Blue => {
                    self.handle_channel_key(code, step)
                }
                PickerField::Hex => self.handle_hex_key(code),
            },
        }
        PickerOutcome::Pending
    }

    /// Mouse click at a screen cell; clicks outside the popup are ignored
    pub fn handle_click(&mut self, layout: &PickerLayout, column: u16, row: u16) -> PickerOutcome {
        if let Some(index) = layout.swatch_at(column, row) {
            self.field = PickerField::Palette;
            self.select_swatch(index);
        } else if contains(&layout.ok, column, row) {
            return self.confirm();
        } else if contains(&layout.cancel, column, row) {
            return PickerOutcome::Cancelled;
        } else if contains(&layout.hex, column, row) {
            self.field = PickerField::Hex;
        } else if let Some(i) = layout.channels.iter().position(|r| contains(r, column, row)) {
            self.field = PickerField::ORDER[i + 1];
        }
        PickerOutcome::Pending
    }

    pub fn select_swatch(&mut self, index: usize) {
        if let Some(color) = PALETTE.get(index) {
            self.palette_cursor = index;
            self.set_color(*color);
        }
    }

    fn confirm(&mut self) -> PickerOutcome {
        if self.field == PickerField::Hex {
            match self.hex_input.parse::<RgbColor>() {
                Ok(color) => self.color = color,
                Err(_) => {
                    self.hex_error = true;
                    return PickerOutcome::Pending;
                }
            }
        }
        PickerOutcome::Confirmed(self.color)
    }

    fn set_color(&mut self, color: RgbColor) {
        self.color = color;
        self.hex_input = color.to_string();
        self.hex_error = false;
    }

    fn handle_palette_key(&mut self, code: KeyCode) {
        let len = PALETTE.len();
        let cursor = self.palette_cursor;
        let next = match code {
            KeyCode::Left | KeyCode::Char('h') if cursor % PALETTE_COLUMNS > 0 => cursor - 1,
            KeyCode::Right | KeyCode::Char('l')
                if cursor % PALETTE_COLUMNS + 1 < PALETTE_COLUMNS && cursor + 1 < len =>
            {
                cursor + 1
            }
            KeyCode::Up | KeyCode::Char('k') if cursor >= PALETTE_COLUMNS => {
                cursor - PALETTE_COLUMNS
            }
            KeyCode::Down | KeyCode::Char('j') if cursor + PALETTE_COLUMNS < len => {
                cursor + PALETTE_COLUMNS
            }
            _ => return,
        };
        self.select_swatch(next);
    }

    fn handle_channel_key(&mut self, code: KeyCode, step: u8) {
        let mut color = self.color;
        let channel = match self.field {
            PickerField::Red => &mut color.r,
            PickerField::Green => &mut color.g,
            _ => &mut color.b,
        };
        match code {
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('-') => {
                *channel = channel.saturating_sub(step)
            }
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('+') | KeyCode::Char('=') => {
                *channel = channel.saturating_add(step)
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.field = self.field.prev();
                return;
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.field = self.field.next();
                return;
            }
            _ => return,
        }
        self.set_color(color);
    }

    fn handle_hex_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Backspace => {
                self.hex_input.pop();
            }
            KeyCode::Char(c)
                if (c.is_ascii_hexdigit() || c == '#') && self.hex_input.len() < HEX_MAX_LEN =>
            {
                self.hex_input.push(c);
            }
            KeyCode::Up => {
                self.field = self.field.prev();
                return;
            }
            KeyCode::Down => {
                self.field = self.field.next();
                return;
            }
            _ => return,
        }
        // live preview once the input is a complete color
        match self.hex_input.parse::<RgbColor>() {
            Ok(color) if self.hex_input.trim_start_matches('#').len() == 6 => {
                self.color = color;
                self.hex_error = false;
            }
            _ => {}
        }
    }
}
