//! Terminal configurator for DIY keyboards
//!
//! Browse keymap profiles over a visual keyboard and pick per-key lighting
//! colors. Nothing is sent to a device; the keyboard model lives in the
//! `kbconf-keyboard` crate.

pub mod config;
pub mod tui;
pub mod view;
