//! The canonical keymap: one record per key, carrying every representation
//! the device translates between.

use serde::Serialize;
use std::collections::BTreeSet;

mod parse;

pub use parse::{parse, parse_text};

/// One key of the canonical cross-reference table.
///
/// `web_name` and `serial_code` are unique within a table; `x11_codes` holds
/// at least one keysym (shifted and keypad variants map to the same key).
#[derive(PartialEq, Eq, Debug, Serialize)]
pub struct KeyIdentity {
    /// KeyboardEvent.code string used by the web client
    pub web_name: String,
    /// Numeric code of the legacy serial protocol
    pub serial_code: u32,
    /// Symbol name in the microcontroller firmware
    pub arduino_name: String,
    /// USB-HID usage id
    pub otg_code: u16,
    /// Whether the HID code is a modifier bit rather than a usage
    pub otg_is_modifier: bool,
    /// IBM PC/AT Set 1 scancode
    pub at1_code: u16,
    /// X11 keysym codes that select this key
    pub x11_codes: BTreeSet<u32>,
}
