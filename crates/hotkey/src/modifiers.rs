use serde::{Deserialize, Serialize};

/// Modifier keys that take part in hotkey matching.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    /// Either Control key held.
    pub ctrl: bool,
    /// Either Shift key held.
    pub shift: bool,
    /// Either Alt key held.
    pub alt: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
        alt: false,
    };

    /// Build a modifier set from individual flags.
    pub fn new(ctrl: bool, shift: bool, alt: bool) -> Self {
        Self { ctrl, shift, alt }
    }

    /// True when no modifier is held.
    pub fn is_empty(self) -> bool {
        !self.ctrl && !self.shift && !self.alt
    }

    /// Set the flag named by a modifier spec (`ctrl`/`control`, `shift`, `alt`/`menu`).
    ///
    /// Returns false when `spec` does not name a modifier.
    pub fn insert_spec(&mut self, spec: &str) -> bool {
        match spec.trim().to_ascii_lowercase().as_str() {
            "ctrl" | "control" => self.ctrl = true,
            "shift" => self.shift = true,
            "alt" | "menu" | "opt" => self.alt = true,
            _ => return false,
        }
        true
    }

    /// Display prefixes in canonical order, each followed by a space (`"Ctrl Shift "`).
    pub fn display_prefix(self) -> String {
        let mut out = String::new();
        if self.ctrl {
            out.push_str("Ctrl ");
        }
        if self.shift {
            out.push_str("Shift ");
        }
        if self.alt {
            out.push_str("Alt ");
        }
        out
    }

    /// Canonical spec components (`["ctrl", "shift"]`).
    pub fn spec_parts(self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.ctrl {
            out.push("ctrl");
        }
        if self.shift {
            out.push("shift");
        }
        if self.alt {
            out.push("alt");
        }
        out
    }
}
