//! Translate raw key and mouse input into action invocations.

use actions::ActionRegistry;
use hotkey::{Key, Modifiers};
use tracing::trace;

/// Mouse buttons that arrive as state snapshots rather than key messages.
const TRACKED_BUTTONS: [Key; 3] = [Key::MBUTTON, Key::XBUTTON1, Key::XBUTTON2];

/// Snapshot of the tracked mouse buttons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MouseButtons {
    /// Middle button.
    pub middle: bool,
    /// First extra button.
    pub x1: bool,
    /// Second extra button.
    pub x2: bool,
}

impl MouseButtons {
    /// Whether the given tracked button is down.
    fn get(self, key: Key) -> bool {
        match key {
            Key::MBUTTON => self.middle,
            Key::XBUTTON1 => self.x1,
            Key::XBUTTON2 => self.x2,
            _ => false,
        }
    }
}

/// Matches input against the registry's hotkey table.
///
/// Holds only the previous mouse button snapshot, used for edge detection.
#[derive(Debug, Default)]
pub struct HotkeyTracker {
    /// Last seen mouse button state.
    mouse: MouseButtons,
}

impl HotkeyTracker {
    /// A tracker with all buttons up.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a key transition. Returns the paths that were invoked.
    ///
    /// Nothing is matched while hotkeys are locked.
    pub fn on_key(
        &self,
        registry: &mut ActionRegistry,
        key: Key,
        modifiers: Modifiers,
        up: bool,
    ) -> Vec<String> {
        if registry.get_hotkeys_locked() {
            trace!(key = %key.name(), "hotkeys locked; bypassing");
            return Vec::new();
        }
        let matched: Vec<String> = registry
            .hotkeys()
            .iter()
            .filter(|(_, h)| h.matches(key, modifiers))
            .map(|(path, _)| path.clone())
            .collect();
        for path in &matched {
            trace!(%path, up, "hotkey matched");
            registry.invoke(path, up, true);
        }
        matched
    }

    /// Handle a new mouse button snapshot, synthesizing transitions for buttons that changed.
    ///
    /// The snapshot is remembered even while hotkeys are locked, so unlocking does not replay
    /// stale edges.
    pub fn on_mouse_state(
        &mut self,
        registry: &mut ActionRegistry,
        buttons: MouseButtons,
        modifiers: Modifiers,
    ) -> Vec<String> {
        let previous = self.mouse;
        self.mouse = buttons;
        let mut invoked = Vec::new();
        for key in TRACKED_BUTTONS {
            let (was, is) = (previous.get(key), buttons.get(key));
            if was != is {
                invoked.extend(self.on_key(registry, key, modifiers, !is));
            }
        }
        invoked
    }

    /// The last seen mouse button snapshot.
    pub fn mouse(&self) -> MouseButtons {
        self.mouse
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use actions::ActionParams;
    use hotkey::Hotkey;

    use super::*;

    fn counting(registry: &mut ActionRegistry, path: &str) -> Rc<Cell<u32>> {
        let n = Rc::new(Cell::new(0));
        let c = n.clone();
        assert!(registry.add(ActionParams::new(path).on_press(move || c.set(c.get() + 1))));
        n
    }

    #[test]
    fn middle_button_fires_on_edges_only() {
        let mut reg = ActionRegistry::new();
        let presses = counting(&mut reg, "A>Mid");
        assert!(reg.associate_hotkey("A>Mid", Hotkey::key(Key::MBUTTON), false));
        let mut tracker = HotkeyTracker::new();

        let down = MouseButtons {
            middle: true,
            ..MouseButtons::default()
        };
        assert_eq!(tracker.on_mouse_state(&mut reg, down, Modifiers::NONE), vec!["A>Mid"]);
        assert!(tracker.on_mouse_state(&mut reg, down, Modifiers::NONE).is_empty());
        assert_eq!(presses.get(), 1);
    }

    #[test]
    fn locked_bypasses_but_tracks_state() {
        let mut reg = ActionRegistry::new();
        let presses = counting(&mut reg, "A>X1");
        assert!(reg.associate_hotkey("A>X1", Hotkey::key(Key::XBUTTON1), false));
        let mut tracker = HotkeyTracker::new();
        reg.lock_hotkeys(true);

        let down = MouseButtons {
            x1: true,
            ..MouseButtons::default()
        };
        assert!(tracker.on_mouse_state(&mut reg, down, Modifiers::NONE).is_empty());
        assert_eq!(tracker.mouse(), down);
        reg.lock_hotkeys(false);
        assert!(tracker.on_mouse_state(&mut reg, down, Modifiers::NONE).is_empty());
        assert_eq!(presses.get(), 0);
    }
}
