//! Compose the runtime X11 keysym → web key name lookup.
//!
//! The static chain X11 → AT1 → web comes from the canonical keymap; an
//! optional host layout can redirect a keysym to a different AT1 scancode,
//! but only to one the canonical table already knows. The composed map is
//! immutable: a layout change means building a fresh [`Symmap`] and
//! publishing it wholesale (share it behind an `Arc`), so concurrent console
//! sessions never observe a half-built table.

use crate::{keymap::KeyIdentity, keysym::KeysymRegistry, layout};
use std::{collections::HashMap, path::Path};

/// The two lookup tables derived from the canonical keymap, built once and
/// reused by every symmap build.
pub struct KeymapIndex {
    x11_to_at1: HashMap<u32, u16>,
    at1_to_web: HashMap<u16, String>,
}

impl KeymapIndex {
    pub fn new(keymap: &[KeyIdentity]) -> Self {
        let mut x11_to_at1 = HashMap::new();
        let mut at1_to_web = HashMap::new();

        for key in keymap {
            at1_to_web.insert(key.at1_code, key.web_name.clone());

            for x11_code in &key.x11_codes {
                x11_to_at1.insert(*x11_code, key.at1_code);
            }
        }

        KeymapIndex {
            x11_to_at1,
            at1_to_web,
        }
    }

    /// Build the symmap for the given host layout file, or the plain static
    /// chain when no layout is supplied.
    pub fn build_symmap(
        &self,
        registry: &KeysymRegistry,
        layout_path: Option<&Path>,
    ) -> Result<Symmap, String> {
        let overrides = match layout_path {
            Some(path) => layout::read_layout(path, registry)?,
            None => HashMap::new(),
        };

        Ok(self.compose(&overrides))
    }

    pub fn compose(&self, overrides: &HashMap<u32, u16>) -> Symmap {
        let mut map = HashMap::new();

        for (x11_code, at1_code) in &self.x11_to_at1 {
            map.insert(*x11_code, self.at1_to_web[at1_code].clone());
        }

        for (x11_code, at1_code) in overrides {
            // a layout may redirect a keysym to a known key only
            if let Some(web_name) = self.at1_to_web.get(at1_code) {
                map.insert(*x11_code, web_name.clone());
            }
        }

        Symmap { map }
    }
}

/// X11 keysym code → web key name. A lookup miss means the key is not
/// recognized, which callers treat as a no-op, not an error.
#[derive(Debug)]
pub struct Symmap {
    map: HashMap<u32, String>,
}

impl Symmap {
    pub fn lookup(&self, x11_code: u32) -> Option<&str> {
        self.map.get(&x11_code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn keymap() -> Vec<KeyIdentity> {
        vec![
            KeyIdentity {
                web_name: "a".into(),
                serial_code: 1,
                arduino_name: "KEY_A".into(),
                otg_code: 4,
                otg_is_modifier: false,
                at1_code: 0x2,
                x11_codes: BTreeSet::from([1]),
            },
            KeyIdentity {
                web_name: "b".into(),
                serial_code: 2,
                arduino_name: "KEY_B".into(),
                otg_code: 5,
                otg_is_modifier: false,
                at1_code: 0x3,
                x11_codes: BTreeSet::from([2]),
            },
        ]
    }

    #[test]
    fn static_chain() {
        let index = KeymapIndex::new(&keymap());

        let symmap = index.compose(&HashMap::new());

        assert_eq!(symmap.len(), 2);
        assert_eq!(symmap.lookup(1), Some("a"));
        assert_eq!(symmap.lookup(2), Some("b"));
        assert_eq!(symmap.lookup(3), None);
    }

    #[test]
    fn override_to_known_key_applies() {
        let index = KeymapIndex::new(&keymap());

        let symmap = index.compose(&HashMap::from([(1, 0x3)]));

        assert_eq!(symmap.lookup(1), Some("b"));
    }

    #[test]
    fn override_to_unknown_key_is_ignored() {
        let index = KeymapIndex::new(&keymap());

        let symmap = index.compose(&HashMap::from([(1, 0x7f)]));

        assert_eq!(symmap.lookup(1), Some("a"));

        // an override can not introduce a key either
        let symmap = index.compose(&HashMap::from([(9, 0x7f)]));

        assert_eq!(symmap.lookup(9), None);
    }

    #[test]
    fn build_without_layout() {
        let index = KeymapIndex::new(&keymap());
        let registry = KeysymRegistry::new();

        let symmap = index.build_symmap(&registry, None).unwrap();

        assert_eq!(symmap.lookup(1), Some("a"));
    }

    #[test]
    fn unreadable_layout_is_an_error() {
        let index = KeymapIndex::new(&keymap());
        let registry = KeysymRegistry::new();

        let err = index
            .build_symmap(&registry, Some(Path::new("testdata/no-such-layout")))
            .unwrap_err();

        assert!(err.starts_with("testdata/no-such-layout:"), "err: {err}");
    }
}
