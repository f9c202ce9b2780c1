use std::fmt;

use serde::{Deserialize, Serialize};

/// A virtual key code.
///
/// Codes follow the Windows virtual-key numbering, which is also what the configuration file
/// stores. `Key::NONE` (code 0) means "no key".
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(pub i32);

// Central table of named keys: constant name, code, display name. Extend this list to give more
// keys a readable name; anything missing renders as `(code)`.
macro_rules! named_keys {
    ( $( $ident:ident = $code:literal => $name:literal, )* ) => {
        #[allow(missing_docs)]
        impl Key {
            $( pub const $ident: Self = Self($code); )*
        }

        /// Display name for a code from the named table.
        fn named(code: i32) -> Option<&'static str> {
            match code {
                $( $code => Some($name), )*
                _ => None,
            }
        }

        /// Reverse lookup from a lowercased display name.
        fn from_named(s: &str) -> Option<Key> {
            $(
                if s.eq_ignore_ascii_case($name) {
                    return Some(Key($code));
                }
            )*
            None
        }
    };
}

named_keys! {
    LBUTTON = 0x01 => "LMB",
    RBUTTON = 0x02 => "RMB",
    MBUTTON = 0x04 => "MMB",
    XBUTTON1 = 0x05 => "XMB1",
    XBUTTON2 = 0x06 => "XMB2",
    BACK = 0x08 => "Backspace",
    TAB = 0x09 => "Tab",
    CLEAR = 0x0C => "Clear",
    RETURN = 0x0D => "Enter",
    SHIFT = 0x10 => "ShiftKey",
    CONTROL = 0x11 => "CtrlKey",
    MENU = 0x12 => "AltKey",
    PAUSE = 0x13 => "Pause",
    CAPITAL = 0x14 => "Caps",
    ESCAPE = 0x1B => "Esc",
    SPACE = 0x20 => "Space",
    PRIOR = 0x21 => "PageUp",
    NEXT = 0x22 => "PageDn",
    END = 0x23 => "End",
    HOME = 0x24 => "Home",
    LEFT = 0x25 => "Left",
    UP = 0x26 => "Up",
    RIGHT = 0x27 => "Right",
    DOWN = 0x28 => "Down",
    SELECT = 0x29 => "Select",
    PRINT = 0x2A => "Print",
    SNAPSHOT = 0x2C => "PrintScrn",
    INSERT = 0x2D => "Insert",
    DELETE = 0x2E => "Delete",
    HELP = 0x2F => "Help",
    MULTIPLY = 0x6A => "Num*",
    ADD = 0x6B => "Num+",
    SUBTRACT = 0x6D => "Num-",
    DECIMAL = 0x6E => "Num.",
    DIVIDE = 0x6F => "Num/",
    NUMLOCK = 0x90 => "NumLock",
    SCROLL = 0x91 => "ScrollLock",
    OEM_1 = 0xBA => ";:",
    OEM_PLUS = 0xBB => "=+",
    OEM_COMMA = 0xBC => ",",
    OEM_MINUS = 0xBD => "-_",
    OEM_PERIOD = 0xBE => ".",
    OEM_2 = 0xBF => "/?",
    OEM_3 = 0xC0 => "`~",
    OEM_4 = 0xDB => "[{",
    OEM_5 = 0xDC => "\\|",
    OEM_6 = 0xDD => "]}",
    OEM_7 = 0xDE => "'\"",
}

// Aliases that only apply to parsing specs (never emitted by `name`).
const ALIASES: &[(&str, Key)] = &[
    ("mouse3", Key::MBUTTON),
    ("middle", Key::MBUTTON),
    ("backspace", Key::BACK),
    ("ret", Key::RETURN),
    ("return", Key::RETURN),
    ("escape", Key::ESCAPE),
    ("pgup", Key::PRIOR),
    ("pgdn", Key::NEXT),
    ("pagedown", Key::NEXT),
    ("del", Key::DELETE),
    ("ins", Key::INSERT),
    ("capslock", Key::CAPITAL),
    ("=", Key::OEM_PLUS),
    ("plus", Key::OEM_PLUS),
    ("-", Key::OEM_MINUS),
    ("minus", Key::OEM_MINUS),
    (";", Key::OEM_1),
    ("/", Key::OEM_2),
    ("`", Key::OEM_3),
    ("[", Key::OEM_4),
    ("\\", Key::OEM_5),
    ("]", Key::OEM_6),
    ("'", Key::OEM_7),
];

impl Key {
    /// No key.
    pub const NONE: Self = Self(0);
    /// First function key (`F1`); `F24` is `F1 + 23`.
    pub const F1: Self = Self(0x70);
    /// Numeric keypad zero; `Num9` is `NUMPAD0 + 9`.
    pub const NUMPAD0: Self = Self(0x60);

    /// The raw virtual key code.
    pub fn code(self) -> i32 {
        self.0
    }

    /// True when this is `Key::NONE`.
    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Mouse buttons that can be bound but are not delivered as key messages.
    pub fn is_tracked_mouse_button(self) -> bool {
        matches!(self, Self::MBUTTON | Self::XBUTTON1 | Self::XBUTTON2)
    }

    /// Human-readable name used in menus and the command palette.
    ///
    /// Letters and digits render as themselves, function keys as `F<n>`, keypad digits as
    /// `Num<n>`, named keys from the table above, and anything else as `(code)`.
    pub fn name(self) -> String {
        let k = self.0;
        if (0x30..=0x39).contains(&k) || (0x41..=0x5A).contains(&k) {
            return char::from(k as u8).to_string();
        }
        if (Self::F1.0..=Self::F1.0 + 23).contains(&k) {
            return format!("F{}", k - Self::F1.0 + 1);
        }
        if (Self::NUMPAD0.0..=Self::NUMPAD0.0 + 9).contains(&k) {
            return format!("Num{}", k - Self::NUMPAD0.0);
        }
        match named(k) {
            Some(name) => name.to_string(),
            None => format!("({})", k),
        }
    }

    /// Parse a key spec: a single letter or digit, `f1`..`f24`, `num0`..`num9`, any display name
    /// from the named table, a parse-only alias, or a raw code written as `(123)`.
    pub fn from_spec(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next())
            && c.is_ascii_alphanumeric()
        {
            return Some(Self(c.to_ascii_uppercase() as i32));
        }
        let lower = s.to_ascii_lowercase();
        if let Some(n) = lower.strip_prefix('f').and_then(|r| r.parse::<i32>().ok()) {
            return (1..=24).contains(&n).then(|| Self(Self::F1.0 + n - 1));
        }
        if let Some(n) = lower.strip_prefix("num").and_then(|r| r.parse::<i32>().ok()) {
            return (0..=9).contains(&n).then(|| Self(Self::NUMPAD0.0 + n));
        }
        if let Some(code) = lower
            .strip_prefix('(')
            .and_then(|r| r.strip_suffix(')'))
            .and_then(|r| r.parse::<i32>().ok())
        {
            return Some(Self(code));
        }
        if let Some(k) = from_named(&lower) {
            return Some(k);
        }
        ALIASES
            .iter()
            .find(|(alias, _)| *alias == lower)
            .map(|(_, k)| *k)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
