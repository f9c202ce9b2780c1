//! hotkey: virtual key codes and the key+modifier combination bound to actions.
//!
//! - `Key`: a virtual key code (Windows `VK_*` numbering) with display names and spec parsing.
//! - `Modifiers`: the Ctrl/Shift/Alt state accompanying a key.
//! - `Hotkey`: a key plus modifiers plus an "assigned" marker, as stored in the hotkey table.
//!
//! Spec strings are `+`-separated and case-insensitive, with the key last, e.g. `"ctrl+shift+f5"`
//! or `"mmb"`. Display text follows the menu accelerator convention (`"Ctrl Shift F5"`).

mod error;
pub use error::ParseError;

mod key;
pub use key::Key;

mod modifiers;
pub use modifiers::Modifiers;

mod hotkey;
pub use hotkey::Hotkey;
