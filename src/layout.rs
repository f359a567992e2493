//! Parse a host keyboard layout in the QEMU keymap format.
//!
//! Unlike the canonical definition this is arbitrary host-provided data, so
//! nothing in it may take the daemon down: a line that does not resolve or
//! does not parse is logged and skipped, and the rest of the file is still
//! used.

use crate::keysym::KeysymRegistry;
use std::{collections::HashMap, fs, path::Path};

/// Read a layout file into a keysym → AT1 scancode mapping.
pub fn read_layout(
    path: &Path,
    registry: &KeysymRegistry,
) -> Result<HashMap<u32, u16>, String> {
    let contents =
        fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;

    log::info!("reading keyboard layout '{}'", path.display());

    Ok(parse_layout(&contents, path, registry))
}

pub fn parse_layout(
    contents: &str,
    filename: &Path,
    registry: &KeysymRegistry,
) -> HashMap<u32, u16> {
    let mut layout = HashMap::new();

    for (line_no, line) in contents.lines().enumerate() {
        let line = line.trim();

        if line.is_empty()
            || line.starts_with('#')
            || line.starts_with("map ")
            || line.starts_with("include ")
        {
            continue;
        }

        let fields: Vec<_> = line.split_whitespace().collect();

        if fields.len() < 2 {
            continue;
        }

        // trailing fields are layout modifiers, not ours to interpret
        let (name, at1) = (fields[0], fields[1]);

        let Some(code) = registry.resolve_or_unicode(name) else {
            log::warn!(
                "{}:{}: unknown keysym '{name}', line skipped",
                filename.display(),
                line_no + 1
            );
            continue;
        };

        match parse_scancode(at1) {
            Ok(at1) => {
                layout.insert(code, at1);
            }
            Err(e) => {
                log::warn!(
                    "{}:{}: bad scancode '{at1}': {e}, line skipped",
                    filename.display(),
                    line_no + 1
                );
            }
        }
    }

    layout
}

// scancodes appear both with and without the 0x prefix in the wild
fn parse_scancode(s: &str) -> Result<u16, std::num::ParseIntError> {
    u16::from_str_radix(s.strip_prefix("0x").unwrap_or(s), 16)
}

#[test]
fn parse_layout_lines() {
    let registry = KeysymRegistry::new();

    let s = r#"
    # de layout
    map 0x407
    include common
    a 0x1e
    A 0x1e shift
    odiaeresis 0x27
    "#;

    let layout = parse_layout(s, Path::new("de"), &registry);

    assert_eq!(layout.len(), 3);
    assert_eq!(layout[&0x61], 0x1e);
    assert_eq!(layout[&0x41], 0x1e);
    assert_eq!(layout[&0xf6], 0x27);
}

#[test]
fn bad_lines_are_skipped() {
    let registry = KeysymRegistry::new();

    let s = "??? zz\na\nnosuchsym 0x1e\nb zz\nc 2e\n";

    let layout = parse_layout(s, Path::new("broken"), &registry);

    // only the final line survives
    assert_eq!(layout.len(), 1);
    assert_eq!(layout[&0x63], 0x2e);
}

#[test]
fn unicode_marker_resolves() {
    let registry = KeysymRegistry::new();

    let layout = parse_layout("U0041 1e\n", Path::new("layout"), &registry);

    assert_eq!(layout[&0x41], 0x1e);
}
