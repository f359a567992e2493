//! Checks against the shipped keymap definition and templates.

use kvmkeys::{keymap, keysym::KeysymRegistry, render::render, symmap::KeymapIndex};
use std::{fs, path::Path};

#[test]
fn shipped_keymap_parses() {
    let registry = KeysymRegistry::new();

    let keymap = keymap::parse(Path::new("data/keymap.in"), &registry).unwrap();

    assert_eq!(keymap.len(), 105);

    let key_a = keymap.iter().find(|key| key.web_name == "KeyA").unwrap();

    assert_eq!(key_a.otg_code, 0x04);
    assert!(!key_a.otg_is_modifier);
    assert_eq!(key_a.at1_code, 0x1e);
    assert!(key_a.x11_codes.contains(&0x61));
    assert!(key_a.x11_codes.contains(&0x41));

    let shift = keymap
        .iter()
        .find(|key| key.web_name == "ShiftLeft")
        .unwrap();

    assert!(shift.otg_is_modifier);
    assert_eq!(shift.otg_code, 0x02);
}

#[test]
fn shipped_templates_render() {
    let registry = KeysymRegistry::new();
    let keymap = keymap::parse(Path::new("data/keymap.in"), &registry).unwrap();

    let template = fs::read_to_string("templates/keymap.rs.j2").unwrap();
    let rendered = render(&keymap, &template).unwrap();

    assert!(rendered.contains("pub const X11_TO_AT1"));
    assert!(rendered.contains("(30, \"KeyA\"),"));

    let template = fs::read_to_string("templates/keymap.h.j2").unwrap();
    let rendered = render(&keymap, &template).unwrap();

    assert!(rendered.contains("return KEY_LEFT_CTRL;"));
    assert!(rendered.contains("return KEY_ERROR_UNDEFINED;"));
}

#[test]
fn german_layout_overrides() {
    let registry = KeysymRegistry::new();
    let keymap = keymap::parse(Path::new("data/keymap.in"), &registry).unwrap();
    let index = KeymapIndex::new(&keymap);

    let symmap = index
        .build_symmap(&registry, Some(Path::new("testdata/de")))
        .unwrap();

    // untouched static entries
    assert_eq!(symmap.lookup(0x61), Some("KeyA"));

    // qwertz swap redirects to known keys
    assert_eq!(symmap.lookup(0x7a), Some("KeyY"));
    assert_eq!(symmap.lookup(0x79), Some("KeyZ"));

    // keys absent from the static chain, introduced via known scancodes
    assert_eq!(symmap.lookup(0xf6), Some("Semicolon"));
    assert_eq!(symmap.lookup(0xdf), Some("Minus"));

    // still a miss: nothing maps this keysym
    assert_eq!(symmap.lookup(0x10fffd), None);
}
