//! Render the canonical keymap through a template.
//!
//! Other subsystems (the AVR firmware, the HID gadget driver, the daemon
//! itself) cannot read the definition file, so the build materializes the
//! table into their source languages. Rendering is pure: the template sees
//! the ordered key sequence as `keymap` and nothing else, and any template
//! failure aborts with no output produced.

use crate::keymap::KeyIdentity;
use minijinja::{context, Environment};

pub fn render(keymap: &[KeyIdentity], template: &str) -> Result<String, String> {
    let mut env = Environment::new();

    env.add_template("keymap", template)
        .map_err(|e| format!("template: {e}"))?;

    let template = env
        .get_template("keymap")
        .map_err(|e| format!("template: {e}"))?;

    template
        .render(context! { keymap })
        .map_err(|e| format!("render: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn keymap() -> Vec<KeyIdentity> {
        vec![
            KeyIdentity {
                web_name: "KeyA".into(),
                serial_code: 1,
                arduino_name: "KEY_A".into(),
                otg_code: 4,
                otg_is_modifier: false,
                at1_code: 0x1e,
                x11_codes: BTreeSet::from([0x41, 0x61]),
            },
            KeyIdentity {
                web_name: "ShiftLeft".into(),
                serial_code: 2,
                arduino_name: "KEY_LEFT_SHIFT".into(),
                otg_code: 2,
                otg_is_modifier: true,
                at1_code: 0x2a,
                x11_codes: BTreeSet::from([0xffe1]),
            },
        ]
    }

    #[test]
    fn render_rows() {
        let template = "{% for key in keymap %}{{ key.web_name }}={{ key.at1_code }}\n{% endfor %}";

        assert_eq!(
            render(&keymap(), template).unwrap(),
            "KeyA=30\nShiftLeft=42\n"
        );
    }

    #[test]
    fn keysym_sets_are_ordered() {
        let template =
            "{% for key in keymap %}{{ key.x11_codes|join(',') }};{% endfor %}";

        assert_eq!(render(&keymap(), template).unwrap(), "65,97;65505;");
    }

    #[test]
    fn template_errors_are_fatal() {
        let broken = "{% for key in keymap %}{{ key.web_name }}";
        assert!(render(&keymap(), broken)
            .unwrap_err()
            .starts_with("template:"));

        let undefined = "{{ keymap[0].no_such_field.nested }}";
        assert!(render(&keymap(), undefined)
            .unwrap_err()
            .starts_with("render:"));
    }
}
