//! The settings model shown by option dialogs and the command palette.
//!
//! Options are grouped. Each item knows its kind, current and default values, and (for
//! enumerations) the named values it accepts. Editing goes through an [`OptionEditor`], which
//! stands in for the inline edit dialog.

use std::{cell::RefCell, path::PathBuf, rc::Rc};

use hotkey::Hotkey;
use tracing::{debug, warn};

use crate::{Config, Error, Theme, loader::save_to_path};

/// What kind of value an option holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// On/off.
    Bool,
    /// Integer.
    Number,
    /// One of `possible_values`.
    Enum,
    /// Free text.
    String,
    /// A hotkey; edited through the conflict flow rather than inline.
    Hotkey,
    /// A directory path.
    Folder,
}

/// An option's value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// Bool options.
    Bool(bool),
    /// Number and enum options.
    Number(i64),
    /// String and folder options.
    Text(String),
    /// Hotkey options.
    Hotkey(Hotkey),
}

/// One option as presented to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionItem {
    /// Value kind.
    pub kind: OptionKind,
    /// Display name, unique within its group.
    pub name: String,
    /// Longer description.
    pub tooltip: Option<String>,
    /// Current value.
    pub value: OptionValue,
    /// Value a reset restores.
    pub default_value: OptionValue,
    /// Named values for enum options.
    pub possible_values: Vec<(String, i64)>,
    /// Read-only options cannot be edited.
    pub readonly: bool,
}

impl OptionItem {
    /// Display text for the current value.
    ///
    /// Enums show the matching value name (or the raw number when none matches), bools show
    /// `On`/`Off`, and hotkeys their display text.
    pub fn value_name(&self) -> String {
        match &self.value {
            OptionValue::Bool(true) => "On".to_string(),
            OptionValue::Bool(false) => "Off".to_string(),
            OptionValue::Number(n) if self.kind == OptionKind::Enum => self
                .possible_values
                .iter()
                .find(|(_, v)| v == n)
                .map_or_else(|| n.to_string(), |(name, _)| name.clone()),
            OptionValue::Number(n) => n.to_string(),
            OptionValue::Text(s) => s.clone(),
            OptionValue::Hotkey(h) => h.to_text(),
        }
    }
}

/// A named group of options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionGroup {
    /// Stable identifier used by edit calls.
    pub id: usize,
    /// Display name.
    pub name: String,
    /// Items in display order.
    pub items: Vec<OptionItem>,
}

/// Produces a new value for an option, or `None` when the edit is cancelled.
pub trait OptionEditor {
    /// Edit `item`, returning the confirmed value.
    fn edit(&mut self, item: &OptionItem) -> Option<OptionValue>;
}

/// A source of option groups that can be edited and persisted.
pub trait OptionsModel {
    /// Current groups and items.
    fn option_groups(&self) -> Vec<OptionGroup>;

    /// Edit the named item in `group_id` through `editor`. Returns true when a value was
    /// confirmed and stored.
    fn edit(&mut self, group_id: usize, name: &str, editor: &mut dyn OptionEditor) -> bool;

    /// Persist the current values.
    fn apply_and_save(&mut self) -> Result<(), Error>;
}

/// Group identifiers for [`ConfigOptions`].
pub mod groups {
    /// General interface behavior.
    pub const INTERFACE: usize = 0;
    /// Emulation speed.
    pub const EMULATION: usize = 1;
    /// Hotkey bindings (read-only here).
    pub const HOTKEYS: usize = 2;
}

/// Describes one scalar config field exposed as an option.
struct Field {
    /// Owning group id.
    group: usize,
    /// Option name.
    name: &'static str,
    /// Tooltip text.
    tooltip: &'static str,
    /// Value kind.
    kind: OptionKind,
    /// Enum value names.
    possible: &'static [(&'static str, i64)],
    /// Read the value.
    get: fn(&Config) -> OptionValue,
    /// Store the value; false when it has the wrong shape.
    set: fn(&mut Config, &OptionValue) -> bool,
}

/// Enum values for the theme option, in `Theme::ALL` order.
const THEMES: &[(&str, i64)] = &[("Light", 0), ("Dark", 1), ("System", 2)];

/// Convert a non-negative number to `u32`.
fn to_u32(v: &OptionValue) -> Option<u32> {
    match v {
        OptionValue::Number(n) => u32::try_from(*n).ok(),
        _ => None,
    }
}

/// Scalar config fields in display order.
const FIELDS: &[Field] = &[
    Field {
        group: groups::INTERFACE,
        name: "Pause on menu",
        tooltip: "Pause emulation while a menu is open",
        kind: OptionKind::Bool,
        possible: &[],
        get: |c| OptionValue::Bool(c.pause_on_menu),
        set: |c, v| match v {
            OptionValue::Bool(b) => {
                c.pause_on_menu = *b;
                true
            }
            _ => false,
        },
    },
    Field {
        group: groups::INTERFACE,
        name: "Statusbar",
        tooltip: "Show the status bar below the game view",
        kind: OptionKind::Bool,
        possible: &[],
        get: |c| OptionValue::Bool(c.statusbar),
        set: |c, v| match v {
            OptionValue::Bool(b) => {
                c.statusbar = *b;
                true
            }
            _ => false,
        },
    },
    Field {
        group: groups::INTERFACE,
        name: "Theme",
        tooltip: "Window color scheme",
        kind: OptionKind::Enum,
        possible: THEMES,
        get: |c| OptionValue::Number(Theme::ALL.iter().position(|t| *t == c.theme).unwrap_or(2) as i64),
        set: |c, v| match v {
            OptionValue::Number(n) => match usize::try_from(*n).ok().and_then(|i| Theme::ALL.get(i)) {
                Some(t) => {
                    c.theme = *t;
                    true
                }
                None => false,
            },
            _ => false,
        },
    },
    Field {
        group: groups::INTERFACE,
        name: "Palette hint width",
        tooltip: "Width of the hotkey column in the command palette",
        kind: OptionKind::Number,
        possible: &[],
        get: |c| OptionValue::Number(i64::from(c.palette_hint_width)),
        set: |c, v| match to_u32(v) {
            Some(n) => {
                c.palette_hint_width = n;
                true
            }
            None => false,
        },
    },
    Field {
        group: groups::EMULATION,
        name: "Fast-forward frame skip",
        tooltip: "Frames skipped per rendered frame while fast-forwarding",
        kind: OptionKind::Number,
        possible: &[],
        get: |c| OptionValue::Number(i64::from(c.fast_forward_skip)),
        set: |c, v| match to_u32(v) {
            Some(n) => {
                c.fast_forward_skip = n;
                true
            }
            None => false,
        },
    },
];

/// Group display names, indexed by id.
const GROUP_NAMES: [&str; 3] = ["Interface", "Emulation", "Hotkeys"];

/// [`OptionsModel`] over a shared [`Config`] and the file it is saved to.
#[derive(Debug, Clone)]
pub struct ConfigOptions {
    /// The config being edited.
    config: Rc<RefCell<Config>>,
    /// Where `apply_and_save` writes; `None` keeps changes in memory.
    path: Option<PathBuf>,
}

impl ConfigOptions {
    /// Options over `config`, saved to `path` when given.
    pub fn new(config: Rc<RefCell<Config>>, path: Option<PathBuf>) -> Self {
        Self { config, path }
    }

    /// The shared config.
    pub fn config(&self) -> &Rc<RefCell<Config>> {
        &self.config
    }

    /// Restore an option's default value. Returns false for unknown or read-only options.
    pub fn reset_to_default(&mut self, group_id: usize, name: &str) -> bool {
        let Some(field) = find_field(group_id, name) else {
            return false;
        };
        let default = (field.get)(&Config::default());
        (field.set)(&mut self.config.borrow_mut(), &default)
    }

    /// Store `value` directly, without an editor.
    pub fn set_value(&mut self, group_id: usize, name: &str, value: &OptionValue) -> Result<(), Error> {
        let field = find_field(group_id, name).ok_or_else(|| Error::Option {
            name: name.to_string(),
            message: "no such option".to_string(),
        })?;
        if !value_fits(field, value) || !(field.set)(&mut self.config.borrow_mut(), value) {
            return Err(Error::Option {
                name: name.to_string(),
                message: format!("value {value:?} does not fit a {:?} option", field.kind),
            });
        }
        debug!(option = name, ?value, "option set");
        Ok(())
    }

    /// Hotkey items, one per table entry, shown read-only.
    fn hotkey_items(&self) -> Vec<OptionItem> {
        let config = self.config.borrow();
        config
            .hotkeys
            .iter()
            .map(|(path, hotkey)| OptionItem {
                kind: OptionKind::Hotkey,
                name: path.clone(),
                tooltip: None,
                value: OptionValue::Hotkey(*hotkey),
                default_value: OptionValue::Hotkey(config.initial_hotkey(path)),
                possible_values: Vec::new(),
                readonly: true,
            })
            .collect()
    }
}

/// The field named `name` in `group_id`.
fn find_field(group_id: usize, name: &str) -> Option<&'static Field> {
    FIELDS.iter().find(|f| f.group == group_id && f.name == name)
}

/// Whether `value` has the shape `field` expects, including enum membership.
fn value_fits(field: &Field, value: &OptionValue) -> bool {
    match (field.kind, value) {
        (OptionKind::Bool, OptionValue::Bool(_)) => true,
        (OptionKind::Number, OptionValue::Number(_)) => true,
        (OptionKind::Enum, OptionValue::Number(n)) => field.possible.iter().any(|(_, v)| v == n),
        _ => false,
    }
}

impl OptionsModel for ConfigOptions {
    fn option_groups(&self) -> Vec<OptionGroup> {
        let defaults = Config::default();
        let config = self.config.borrow();
        let mut out: Vec<OptionGroup> = GROUP_NAMES
            .iter()
            .enumerate()
            .map(|(id, name)| OptionGroup {
                id,
                name: (*name).to_string(),
                items: Vec::new(),
            })
            .collect();
        for f in FIELDS {
            out[f.group].items.push(OptionItem {
                kind: f.kind,
                name: f.name.to_string(),
                tooltip: Some(f.tooltip.to_string()),
                value: (f.get)(&config),
                default_value: (f.get)(&defaults),
                possible_values: f
                    .possible
                    .iter()
                    .map(|(n, v)| ((*n).to_string(), *v))
                    .collect(),
                readonly: false,
            });
        }
        drop(config);
        out[groups::HOTKEYS].items = self.hotkey_items();
        out
    }

    fn edit(&mut self, group_id: usize, name: &str, editor: &mut dyn OptionEditor) -> bool {
        let Some(item) = self
            .option_groups()
            .into_iter()
            .find(|g| g.id == group_id)
            .and_then(|g| g.items.into_iter().find(|i| i.name == name))
        else {
            return false;
        };
        if item.readonly {
            return false;
        }
        let Some(value) = editor.edit(&item) else {
            return false;
        };
        match self.set_value(group_id, name, &value) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "option edit rejected");
                false
            }
        }
    }

    fn apply_and_save(&mut self) -> Result<(), Error> {
        match &self.path {
            Some(path) => save_to_path(&self.config.borrow(), path),
            None => Ok(()),
        }
    }
}
