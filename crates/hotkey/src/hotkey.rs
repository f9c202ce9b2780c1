use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Key, Modifiers, ParseError};

/// A key plus modifiers bound to an action.
///
/// Two placeholder states exist and are deliberately distinct:
/// - *empty*: no key and no modifiers, but `assigned` set; the user cleared the binding.
/// - *unassigned*: everything unset; no binding was ever chosen for the action.
///
/// Equality compares every field, including `assigned`.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Hotkey {
    /// The non-modifier key.
    pub key: Key,
    /// Control held.
    pub ctrl: bool,
    /// Shift held.
    pub shift: bool,
    /// Alt held.
    pub alt: bool,
    /// Whether a binding was ever chosen.
    pub assigned: bool,
}

impl Hotkey {
    /// An assigned hotkey for `key` with the given modifiers.
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self {
            key,
            ctrl: modifiers.ctrl,
            shift: modifiers.shift,
            alt: modifiers.alt,
            assigned: true,
        }
    }

    /// An assigned hotkey for `key` with no modifiers.
    pub fn key(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    /// The explicitly cleared binding.
    pub fn empty() -> Self {
        Self {
            assigned: true,
            ..Self::default()
        }
    }

    /// The "never assigned" placeholder.
    pub fn unassigned() -> Self {
        Self::default()
    }

    /// No key and no modifiers, regardless of `assigned`.
    pub fn is_empty(&self) -> bool {
        !self.ctrl && !self.shift && !self.alt && self.key.is_none()
    }

    /// Whether a binding was ever chosen.
    pub fn is_assigned(&self) -> bool {
        self.assigned
    }

    /// The modifier part of this hotkey.
    pub fn modifiers(&self) -> Modifiers {
        Modifiers::new(self.ctrl, self.shift, self.alt)
    }

    /// True when a key event for `key` with `modifiers` held triggers this hotkey.
    pub fn matches(&self, key: Key, modifiers: Modifiers) -> bool {
        !self.is_empty() && self.key == key && self.modifiers() == modifiers
    }

    /// Display text used for menu accelerators and palette hints, e.g. `"Ctrl Shift F5"`.
    ///
    /// The empty combination renders as `"(nothing)"`.
    pub fn to_text(&self) -> String {
        if self.is_empty() {
            return "(nothing)".to_string();
        }
        let mut out = self.modifiers().display_prefix();
        if self.key.is_none() {
            // Modifier-only combination; drop the trailing separator.
            out.truncate(out.trim_end().len());
        } else {
            out.push_str(&self.key.name());
        }
        out
    }

    /// Canonical spec string (`"ctrl+shift+f5"`), or `"none"` for the empty combination.
    pub fn to_spec(&self) -> String {
        if self.is_empty() {
            return "none".to_string();
        }
        let mut parts: Vec<String> = self
            .modifiers()
            .spec_parts()
            .into_iter()
            .map(str::to_string)
            .collect();
        if !self.key.is_none() {
            let name = self.key.name();
            // Names containing the separator fall back to the raw code form.
            if name.contains('+') {
                parts.push(format!("({})", self.key.code()));
            } else {
                parts.push(name.to_ascii_lowercase());
            }
        }
        parts.join("+")
    }

    /// Parses a hotkey specification of the form `"ctrl+shift+k"`.
    ///
    /// - Case-insensitive for both modifiers and the key.
    /// - Components are separated by `+`; the last component is the key spec.
    /// - `"none"` parses to the empty (cleared) hotkey.
    /// - A trailing `+` as the key (`"ctrl++"`) is read as the `=+` key.
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::Empty);
        }
        if trimmed.eq_ignore_ascii_case("none") {
            return Ok(Self::empty());
        }
        let (mods_part, key_part) = if let Some(head) = trimmed.strip_suffix("++") {
            (head, "+")
        } else if trimmed == "+" {
            ("", "+")
        } else {
            match trimmed.rsplit_once('+') {
                Some((head, last)) => (head, last),
                None => ("", trimmed),
            }
        };
        let key = if key_part == "+" {
            Key::OEM_PLUS
        } else {
            if key_part.trim().is_empty() {
                return Err(ParseError::EmptyComponent {
                    spec: s.to_string(),
                });
            }
            Key::from_spec(key_part).ok_or_else(|| ParseError::UnknownKey {
                name: key_part.trim().to_string(),
                spec: s.to_string(),
            })?
        };
        let mut modifiers = Modifiers::default();
        if !mods_part.is_empty() {
            for m in mods_part.split('+') {
                if m.trim().is_empty() {
                    return Err(ParseError::EmptyComponent {
                        spec: s.to_string(),
                    });
                }
                if !modifiers.insert_spec(m) {
                    return Err(ParseError::UnknownModifier {
                        name: m.trim().to_string(),
                        spec: s.to_string(),
                    });
                }
            }
        }
        Ok(Self::new(key, modifiers))
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl FromStr for Hotkey {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_not_unassigned() {
        let empty = Hotkey::empty();
        let unassigned = Hotkey::unassigned();
        assert!(empty.is_empty());
        assert!(unassigned.is_empty());
        assert!(empty.is_assigned());
        assert!(!unassigned.is_assigned());
        assert_ne!(empty, unassigned);
    }

    #[test]
    fn display_text() {
        assert_eq!(Hotkey::empty().to_text(), "(nothing)");
        let h = Hotkey::new(Key(0x74), Modifiers::new(true, true, false));
        assert_eq!(h.to_text(), "Ctrl Shift F5");
        assert_eq!(Hotkey::key(Key::MBUTTON).to_string(), "MMB");
        let alt_only = Hotkey::new(Key::NONE, Modifiers::new(false, false, true));
        assert_eq!(alt_only.to_text(), "Alt");
    }

    #[test]
    fn parse_basic() {
        let h = Hotkey::parse("ctrl+shift+f5").expect("parse");
        assert_eq!(h, Hotkey::new(Key(0x74), Modifiers::new(true, true, false)));
        assert_eq!(h.to_spec(), "ctrl+shift+f5");

        let h = Hotkey::parse(" Alt + P ").expect("parse");
        assert_eq!(h, Hotkey::new(Key(0x50), Modifiers::new(false, false, true)));

        assert_eq!(Hotkey::parse("none").expect("parse"), Hotkey::empty());
        assert_eq!(Hotkey::parse("ctrl++").expect("parse").key, Key::OEM_PLUS);
    }

    #[test]
    fn parse_errors() {
        assert_eq!(Hotkey::parse("  "), Err(ParseError::Empty));
        assert!(matches!(
            Hotkey::parse("ctrl++a"),
            Err(ParseError::EmptyComponent { .. })
        ));
        assert!(matches!(
            Hotkey::parse("hyper+a"),
            Err(ParseError::UnknownModifier { .. })
        ));
        assert!(matches!(
            Hotkey::parse("ctrl+blah"),
            Err(ParseError::UnknownKey { .. })
        ));
    }

    #[test]
    fn matching_ignores_empty() {
        let h = Hotkey::new(Key(0x50), Modifiers::new(true, false, false));
        assert!(h.matches(Key(0x50), Modifiers::new(true, false, false)));
        assert!(!h.matches(Key(0x50), Modifiers::NONE));
        assert!(!Hotkey::empty().matches(Key::NONE, Modifiers::NONE));
    }

    #[test]
    fn ron_shape() {
        let h = Hotkey::parse("ctrl+p").expect("parse");
        let text = ron::to_string(&h).expect("serialize");
        let back: Hotkey = ron::from_str(&text).expect("deserialize");
        assert_eq!(back, h);
        let partial: Hotkey = ron::from_str("(key: 80, ctrl: true)").expect("partial");
        assert!(partial.ctrl);
        assert!(!partial.assigned);
    }
}
