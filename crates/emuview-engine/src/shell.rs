//! The UI event dispatcher tying the registry to its projections.
//!
//! `Shell` owns the registry and everything derived from it, and routes toolkit events to the
//! right consumer: menu openings and commands to the menu, keys to the palette while it is open
//! and to the hotkey tracker otherwise.

use std::mem;

use actions::ActionRegistry;
use config::{OptionsModel, options::OptionEditor};
use hotkey::{Key, Modifiers};
use tracing::{debug, trace};

use crate::{
    Result,
    menu::{ActionMenu, MenuBackend, MenuId},
    palette::{CommandPalette, PaletteOutcome},
    prompt::HotkeyPrompt,
    tracker::{HotkeyTracker, MouseButtons},
};

/// An input event from the windowing toolkit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// The menu bar is about to be shown.
    MenuOpening,
    /// A menu command was chosen.
    Command(MenuId),
    /// A key went down or up.
    Key {
        /// Key code.
        key: Key,
        /// Modifiers held.
        modifiers: Modifiers,
        /// True on release.
        up: bool,
    },
    /// New mouse button snapshot.
    MouseButtons {
        /// Button state.
        buttons: MouseButtons,
        /// Modifiers held.
        modifiers: Modifiers,
    },
    /// Show the command palette.
    OpenPalette,
    /// The palette's query text changed.
    PaletteQuery(String),
}

/// What dispatching an event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    /// Nothing happened.
    Nothing,
    /// These actions were invoked.
    Invoked(Vec<String>),
    /// The palette handled the event.
    Palette(PaletteOutcome),
    /// The menu was refreshed.
    MenuRefreshed,
}

/// Owner of the registry and its projections.
pub struct Shell {
    /// The action registry.
    registry: ActionRegistry,
    /// Menu projection.
    menu: ActionMenu,
    /// Palette projection.
    palette: CommandPalette,
    /// Hotkey tracker.
    tracker: HotkeyTracker,
    /// Options shown in the palette.
    options: Box<dyn OptionsModel>,
    /// Hotkey chooser.
    prompt: Box<dyn HotkeyPrompt>,
    /// Option value editor.
    editor: Box<dyn OptionEditor>,
    /// Palette visibility as of the last settle.
    palette_open: bool,
    /// Whether opening the palette is what locked hotkeys.
    palette_lock: bool,
}

impl Shell {
    /// Build the projections over `registry`.
    pub fn new(
        mut registry: ActionRegistry,
        backend: Box<dyn MenuBackend>,
        options: Box<dyn OptionsModel>,
        prompt: Box<dyn HotkeyPrompt>,
        editor: Box<dyn OptionEditor>,
    ) -> Self {
        let menu = ActionMenu::new(&mut registry, backend);
        let palette = CommandPalette::new(&mut registry);
        Self {
            registry,
            menu,
            palette,
            tracker: HotkeyTracker::new(),
            options,
            prompt,
            editor,
            palette_open: false,
            palette_lock: false,
        }
    }

    /// The registry.
    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// The registry, for registering or removing actions.
    pub fn registry_mut(&mut self) -> &mut ActionRegistry {
        &mut self.registry
    }

    /// The menu projection.
    pub fn menu(&self) -> &ActionMenu {
        &self.menu
    }

    /// The palette projection.
    pub fn palette(&self) -> &CommandPalette {
        &self.palette
    }

    /// The options model.
    pub fn options(&self) -> &dyn OptionsModel {
        self.options.as_ref()
    }

    /// Route one event.
    ///
    /// Projections are brought up to date even when the event fails; the error comes from
    /// persisting an option edited in the palette.
    pub fn dispatch(&mut self, event: UiEvent) -> Result<Dispatched> {
        trace!(?event, "dispatch");
        let out = self.route(event);
        self.settle();
        out
    }

    /// Hand `event` to its consumer.
    fn route(&mut self, event: UiEvent) -> Result<Dispatched> {
        let out = match event {
            UiEvent::MenuOpening => {
                self.menu.on_menu_opening(&self.registry);
                Dispatched::MenuRefreshed
            }
            UiEvent::Command(id) => {
                self.menu.sync(&self.registry);
                match self.menu.path_for_id(id).map(str::to_string) {
                    Some(path) if self.menu.on_command(&mut self.registry, id) => {
                        Dispatched::Invoked(vec![path])
                    }
                    _ => Dispatched::Nothing,
                }
            }
            UiEvent::Key { up: true, .. } if self.palette.is_open() => Dispatched::Nothing,
            UiEvent::Key { key, .. } if self.palette.is_open() => {
                Dispatched::Palette(self.palette.on_key(
                    key,
                    &mut self.registry,
                    self.options.as_mut(),
                    self.editor.as_mut(),
                    self.prompt.as_mut(),
                )?)
            }
            UiEvent::Key { key, modifiers, up } => {
                let invoked = self.tracker.on_key(&mut self.registry, key, modifiers, up);
                if invoked.is_empty() {
                    Dispatched::Nothing
                } else {
                    Dispatched::Invoked(invoked)
                }
            }
            UiEvent::MouseButtons { buttons, modifiers } => {
                let invoked = self
                    .tracker
                    .on_mouse_state(&mut self.registry, buttons, modifiers);
                if invoked.is_empty() {
                    Dispatched::Nothing
                } else {
                    Dispatched::Invoked(invoked)
                }
            }
            UiEvent::OpenPalette => {
                self.palette.open(&self.registry, self.options.as_ref());
                Dispatched::Palette(PaletteOutcome::Handled)
            }
            UiEvent::PaletteQuery(query) => {
                if !self.palette.is_open() {
                    self.palette.open(&self.registry, self.options.as_ref());
                }
                self.palette
                    .set_query(&query, &self.registry, self.options.as_ref());
                Dispatched::Palette(PaletteOutcome::Handled)
            }
        };
        Ok(out)
    }

    /// Bring projections up to date and keep the hotkey lock in step with the palette.
    ///
    /// Opening the palette locks hotkeys unless they already were; closing it only undoes a
    /// lock the palette took, so locks held by someone else survive.
    fn settle(&mut self) {
        let open = self.palette.is_open();
        if self.palette_open != open {
            self.palette_open = open;
            if open {
                self.palette_lock = !self.registry.get_hotkeys_locked();
                if self.palette_lock {
                    self.registry.lock_hotkeys(true);
                }
            } else if mem::take(&mut self.palette_lock) {
                self.registry.lock_hotkeys(false);
            }
            debug!(
                palette_open = open,
                locked = self.registry.get_hotkeys_locked(),
                "hotkey lock follows palette"
            );
        }
        self.menu.sync(&self.registry);
        self.palette.sync(&self.registry, self.options.as_ref());
    }

    /// Persist option changes.
    pub fn save_options(&mut self) -> Result<()> {
        self.options.apply_and_save()?;
        Ok(())
    }
}
