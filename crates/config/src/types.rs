use actions::{ActionRegistry, HotkeyTable, RecentList};
use hotkey::Hotkey;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Window color scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    /// Light scheme.
    Light,
    /// Dark scheme.
    Dark,
    /// Follow the system setting.
    #[default]
    System,
}

impl Theme {
    /// All themes in option order.
    pub const ALL: [Self; 3] = [Self::Light, Self::Dark, Self::System];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Dark => "Dark",
            Self::System => "System",
        }
    }
}

/// Persisted front-end settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Action path to hotkey.
    pub hotkeys: HotkeyTable,
    /// First hotkey each path was seen with, used by resets.
    pub initial_hotkeys: HotkeyTable,
    /// Recently opened ROMs.
    pub recent_roms: RecentList,
    /// Recently played movies.
    pub recent_movies: RecentList,
    /// Recently run scripts.
    pub recent_scripts: RecentList,
    /// Pause emulation while a menu is open.
    pub pause_on_menu: bool,
    /// Show the status bar.
    pub statusbar: bool,
    /// Frames skipped per rendered frame while fast-forwarding.
    pub fast_forward_skip: u32,
    /// Width of the hint column in the command palette, in characters.
    pub palette_hint_width: u32,
    /// Window color scheme.
    pub theme: Theme,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hotkeys: HotkeyTable::new(),
            initial_hotkeys: HotkeyTable::new(),
            recent_roms: RecentList::default(),
            recent_movies: RecentList::default(),
            recent_scripts: RecentList::default(),
            pause_on_menu: true,
            statusbar: true,
            fast_forward_skip: 8,
            palette_hint_width: 16,
            theme: Theme::System,
        }
    }
}

impl Config {
    /// Load this config's hotkeys into `registry`.
    ///
    /// Hotkeys the registry holds after registration (defaults) are recorded in
    /// `initial_hotkeys` the first time a path is seen. Persisted assigned bindings then override
    /// them, and the merged table is captured back into `hotkeys`.
    pub fn apply_hotkeys(&mut self, registry: &mut ActionRegistry) {
        for (path, hotkey) in registry.hotkeys() {
            if !self.initial_hotkeys.contains_key(path) {
                self.initial_hotkeys.insert(path.clone(), *hotkey);
            }
        }
        let mut merged = registry.hotkeys().clone();
        for (path, hotkey) in self.hotkeys.iter().filter(|(_, h)| h.is_assigned()) {
            merged.insert(path.clone(), *hotkey);
        }
        debug!(entries = merged.len(), "applying hotkey table");
        registry.set_hotkeys(merged);
        self.capture_hotkeys(registry);
    }

    /// Copy the registry's hotkey table for saving.
    pub fn capture_hotkeys(&mut self, registry: &ActionRegistry) {
        self.hotkeys = registry.hotkeys().clone();
    }

    /// The hotkey `path` started with, or unassigned when never recorded.
    pub fn initial_hotkey(&self, path: &str) -> Hotkey {
        self.initial_hotkeys
            .get(&actions::normalize_filter(path))
            .copied()
            .unwrap_or_default()
    }
}
