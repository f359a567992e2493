//! Parse the canonical keymap definition.
//!
//! The definition is a trusted, pre-validated build artifact. Seven
//! whitespace-separated columns per line:
//!
//! `web_name serial arduino_name otg(hex) modifier(m|-) at1(hex) x11,x11,...`
//!
//! Lines with fewer than seven fields are skipped without comment, matching
//! the historical loader. Everything else that is wrong with the file is
//! fatal: this input is authored, so a bad number or an unresolvable keysym
//! means a broken build environment, not user error.

use super::KeyIdentity;
use crate::keysym::KeysymRegistry;
use itertools::Itertools;
use std::{collections::BTreeSet, fs, path::Path};

pub fn parse(path: &Path, registry: &KeysymRegistry) -> Result<Vec<KeyIdentity>, String> {
    let contents =
        fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;

    parse_text(&contents, path, registry)
}

pub fn parse_text(
    contents: &str,
    filename: &Path,
    registry: &KeysymRegistry,
) -> Result<Vec<KeyIdentity>, String> {
    let mut keymap = Vec::new();

    for (line_no, line) in contents.lines().enumerate() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<_> = line.split_whitespace().collect();

        if fields.len() < 7 {
            continue;
        }

        let serial_code = fields[1].parse().map_err(|e| {
            format!("{}:{}: serial code: {e}", filename.display(), line_no + 1)
        })?;

        let otg_code = parse_hex(fields[3]).map_err(|e| {
            format!("{}:{}: otg code: {e}", filename.display(), line_no + 1)
        })?;

        let at1_code = parse_hex(fields[5]).map_err(|e| {
            format!("{}:{}: at1 code: {e}", filename.display(), line_no + 1)
        })?;

        let mut x11_codes = BTreeSet::new();

        for name in fields[6].split(',') {
            let code = registry.resolve_or_unicode(name).ok_or_else(|| {
                format!(
                    "{}:{}: unresolved keysym '{name}'",
                    filename.display(),
                    line_no + 1
                )
            })?;

            x11_codes.insert(code);
        }

        keymap.push(KeyIdentity {
            web_name: fields[0].to_owned(),
            serial_code,
            arduino_name: fields[2].to_owned(),
            otg_code,
            otg_is_modifier: fields[4].eq_ignore_ascii_case("m"),
            at1_code,
            x11_codes,
        });
    }

    validate(&keymap, filename)?;

    Ok(keymap)
}

fn parse_hex(s: &str) -> Result<u16, std::num::ParseIntError> {
    u16::from_str_radix(s.strip_prefix("0x").unwrap_or(s), 16)
}

/// The table must describe each key exactly once: web names, serial codes
/// and X11 keysyms may not be claimed by two records. Downstream composition
/// would otherwise silently keep the last record processed.
fn validate(keymap: &[KeyIdentity], filename: &Path) -> Result<(), String> {
    if let Some(name) = keymap
        .iter()
        .map(|key| key.web_name.as_str())
        .duplicates()
        .next()
    {
        return Err(format!(
            "{}: duplicate web name '{name}'",
            filename.display()
        ));
    }

    if let Some(code) = keymap
        .iter()
        .map(|key| key.serial_code)
        .duplicates()
        .next()
    {
        return Err(format!(
            "{}: duplicate serial code {code}",
            filename.display()
        ));
    }

    if let Some(code) = keymap
        .iter()
        .flat_map(|key| key.x11_codes.iter())
        .duplicates()
        .next()
    {
        return Err(format!(
            "{}: keysym {code:#x} claimed by two keys",
            filename.display()
        ));
    }

    Ok(())
}

#[cfg(test)]
use pretty_assertions::assert_eq;

#[test]
fn parse_row() {
    let registry = KeysymRegistry::new();

    let s = "KeyA 30 KEY_A 04 - 1e XK_a\n";

    let keymap = parse_text(s, Path::new("keymap.in"), &registry).unwrap();

    assert_eq!(
        keymap,
        vec![KeyIdentity {
            web_name: "KeyA".into(),
            serial_code: 30,
            arduino_name: "KEY_A".into(),
            otg_code: 4,
            otg_is_modifier: false,
            at1_code: 0x1e,
            x11_codes: BTreeSet::from([0x61]),
        }]
    );
}

#[test]
fn modifier_and_multiple_keysyms() {
    let registry = KeysymRegistry::new();

    let s = r#"
    # modifiers carry the HID mask bit, not a usage id
    ShiftLeft 79 KEY_LEFT_SHIFT 02 m 2a XK_Shift_L
    Digit1 2 KEY_1 1e - 02 XK_1,XK_exclam
    "#;

    let keymap = parse_text(s, Path::new("keymap.in"), &registry).unwrap();

    assert_eq!(keymap.len(), 2);
    assert!(keymap[0].otg_is_modifier);
    assert_eq!(keymap[0].x11_codes, BTreeSet::from([0xffe1]));
    assert!(!keymap[1].otg_is_modifier);
    assert_eq!(keymap[1].x11_codes, BTreeSet::from([0x21, 0x31]));
}

#[test]
fn short_rows_are_skipped() {
    let registry = KeysymRegistry::new();

    let s = r#"
    KeyB
    KeyB 48 KEY_B 05 - 30
    KeyB 48 KEY_B 05 - 30 XK_b
    "#;

    let keymap = parse_text(s, Path::new("keymap.in"), &registry).unwrap();

    assert_eq!(keymap.len(), 1);
    assert_eq!(keymap[0].web_name, "KeyB");
}

#[test]
fn unresolved_keysym_is_fatal() {
    let registry = KeysymRegistry::new();

    let s = "KeyA 30 KEY_A 04 - 1e XK_a\nKeyB 48 KEY_B 05 - 30 XK_bogus\n";

    assert_eq!(
        parse_text(s, Path::new("keymap.in"), &registry),
        Err("keymap.in:2: unresolved keysym 'XK_bogus'".to_string())
    );
}

#[test]
fn bad_number_is_fatal() {
    let registry = KeysymRegistry::new();

    let s = "KeyA xx KEY_A 04 - 1e XK_a\n";

    assert_eq!(
        parse_text(s, Path::new("keymap.in"), &registry),
        Err("keymap.in:1: serial code: invalid digit found in string".to_string())
    );
}

#[test]
fn duplicates_are_rejected() {
    let registry = KeysymRegistry::new();

    let s = "KeyA 30 KEY_A 04 - 1e XK_a\nKeyA 48 KEY_B 05 - 30 XK_b\n";

    assert_eq!(
        parse_text(s, Path::new("keymap.in"), &registry),
        Err("keymap.in: duplicate web name 'KeyA'".to_string())
    );

    let s = "KeyA 30 KEY_A 04 - 1e XK_a\nKeyB 30 KEY_B 05 - 30 XK_b\n";

    assert_eq!(
        parse_text(s, Path::new("keymap.in"), &registry),
        Err("keymap.in: duplicate serial code 30".to_string())
    );

    let s = "KeyA 30 KEY_A 04 - 1e XK_a\nKeyB 48 KEY_B 05 - 30 XK_a\n";

    assert_eq!(
        parse_text(s, Path::new("keymap.in"), &registry),
        Err("keymap.in: keysym 0x61 claimed by two keys".to_string())
    );
}
