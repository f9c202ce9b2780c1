//! In-memory stand-ins for the native menu and dialogs.
//!
//! Used by the command-line front end and by tests. [`HeadlessMenu`] keeps its state behind a
//! shared handle so it can be inspected after being boxed into an [`ActionMenu`](crate::ActionMenu).

use std::{cell::RefCell, collections::VecDeque, fmt::Write as _, rc::Rc};

use config::{OptionItem, OptionValue, options::OptionEditor};
use hotkey::Hotkey;

use crate::{
    menu::{MenuBackend, MenuHandle, MenuId},
    prompt::HotkeyPrompt,
};

/// One entry of a headless menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A command item.
    Item {
        /// Command id.
        id: MenuId,
        /// Label, with the accelerator after a tab.
        label: String,
        /// Grayed out when false.
        enabled: bool,
        /// Check mark.
        checked: bool,
    },
    /// A submenu.
    Submenu {
        /// Handle of the child menu.
        menu: MenuHandle,
        /// Label.
        label: String,
    },
    /// A separator line.
    Separator,
}

/// All menus, indexed by handle. Handle 0 is the bar.
#[derive(Debug, Default)]
pub struct MenuState {
    /// Entries of each menu.
    pub menus: Vec<Vec<Entry>>,
    /// Number of resets seen.
    pub resets: usize,
}

impl MenuState {
    /// Entries of `menu`.
    pub fn entries(&self, menu: MenuHandle) -> &[Entry] {
        self.menus.get(menu.0 as usize).map_or(&[], Vec::as_slice)
    }

    /// Find an item by id anywhere in the tree.
    pub fn item(&self, id: MenuId) -> Option<&Entry> {
        self.menus
            .iter()
            .flatten()
            .find(|e| matches!(e, Entry::Item { id: i, .. } if *i == id))
    }

    /// Find an item by its label (without the accelerator).
    pub fn item_by_label(&self, label: &str) -> Option<&Entry> {
        self.menus.iter().flatten().find(|e| match e {
            Entry::Item { label: l, .. } => l.split('\t').next() == Some(label),
            _ => false,
        })
    }

    /// Render the menu tree as indented text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_menu(MenuHandle(0), 0, &mut out);
        out
    }

    /// Append `menu` at `depth` to `out`.
    fn render_menu(&self, menu: MenuHandle, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        for entry in self.entries(menu) {
            match entry {
                Entry::Item {
                    label,
                    enabled,
                    checked,
                    ..
                } => {
                    let mark = if *checked { "[x] " } else { "" };
                    let (name, accel) = label.split_once('\t').unwrap_or((label, ""));
                    let _ = write!(out, "{indent}{mark}{name}");
                    if !accel.is_empty() {
                        let _ = write!(out, "  <{accel}>");
                    }
                    if !enabled {
                        out.push_str("  (disabled)");
                    }
                    out.push('\n');
                }
                Entry::Submenu { menu, label } => {
                    let _ = writeln!(out, "{indent}{label}");
                    self.render_menu(*menu, depth + 1, out);
                }
                Entry::Separator => {
                    let _ = writeln!(out, "{indent}----");
                }
            }
        }
    }

    /// Mutable entry at `position` in `menu`.
    fn entry_mut(&mut self, menu: MenuHandle, position: usize) -> Option<&mut Entry> {
        self.menus.get_mut(menu.0 as usize)?.get_mut(position)
    }

    /// Push `entry` onto `menu`.
    fn push(&mut self, menu: MenuHandle, entry: Entry) {
        if let Some(m) = self.menus.get_mut(menu.0 as usize) {
            m.push(entry);
        }
    }
}

/// A [`MenuBackend`] that records the menu tree in memory.
#[derive(Debug, Clone, Default)]
pub struct HeadlessMenu {
    /// Shared state.
    state: Rc<RefCell<MenuState>>,
}

impl HeadlessMenu {
    /// An empty menu.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the recorded state.
    pub fn state(&self) -> Rc<RefCell<MenuState>> {
        self.state.clone()
    }

    /// Render the current tree.
    pub fn render(&self) -> String {
        self.state.borrow().render()
    }
}

impl MenuBackend for HeadlessMenu {
    fn reset(&mut self) -> MenuHandle {
        let mut s = self.state.borrow_mut();
        s.menus = vec![Vec::new()];
        s.resets += 1;
        MenuHandle(0)
    }

    fn create_menu(&mut self) -> MenuHandle {
        let mut s = self.state.borrow_mut();
        s.menus.push(Vec::new());
        MenuHandle((s.menus.len() - 1) as u32)
    }

    fn append_item(&mut self, menu: MenuHandle, id: MenuId, label: &str) {
        self.state.borrow_mut().push(
            menu,
            Entry::Item {
                id,
                label: label.to_string(),
                enabled: true,
                checked: false,
            },
        );
    }

    fn append_submenu(&mut self, menu: MenuHandle, submenu: MenuHandle, label: &str) {
        self.state.borrow_mut().push(
            menu,
            Entry::Submenu {
                menu: submenu,
                label: label.to_string(),
            },
        );
    }

    fn append_separator(&mut self, menu: MenuHandle) {
        self.state.borrow_mut().push(menu, Entry::Separator);
    }

    fn set_label(&mut self, menu: MenuHandle, position: usize, label: &str) {
        match self.state.borrow_mut().entry_mut(menu, position) {
            Some(Entry::Item { label: l, .. } | Entry::Submenu { label: l, .. }) => {
                label.clone_into(l);
            }
            _ => {}
        }
    }

    fn set_enabled(&mut self, menu: MenuHandle, position: usize, enabled: bool) {
        if let Some(Entry::Item { enabled: e, .. }) = self.state.borrow_mut().entry_mut(menu, position) {
            *e = enabled;
        }
    }

    fn set_checked(&mut self, menu: MenuHandle, position: usize, checked: bool) {
        if let Some(Entry::Item { checked: c, .. }) = self.state.borrow_mut().entry_mut(menu, position) {
            *c = checked;
        }
    }
}

/// A [`HotkeyPrompt`] answering from a queue; an empty queue cancels.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    /// Pending answers.
    answers: VecDeque<Option<Hotkey>>,
    /// Captions asked so far.
    pub asked: Vec<String>,
}

impl ScriptedPrompt {
    /// A prompt that will give `answers` in order.
    pub fn new(answers: impl IntoIterator<Item = Option<Hotkey>>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }
}

impl HotkeyPrompt for ScriptedPrompt {
    fn prompt(&mut self, caption: &str, _current: Hotkey) -> Option<Hotkey> {
        self.asked.push(caption.to_string());
        self.answers.pop_front().flatten()
    }
}

/// An [`OptionEditor`] answering from a queue; an empty queue cancels.
///
/// `Toggle` answers flip a bool option instead of giving a fixed value.
#[derive(Debug, Default)]
pub struct ScriptedEditor {
    /// Pending answers.
    answers: VecDeque<EditorAnswer>,
}

/// One scripted editor response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorAnswer {
    /// Confirm this value.
    Value(OptionValue),
    /// Flip a bool option.
    Toggle,
    /// Cancel the dialog.
    Cancel,
}

impl ScriptedEditor {
    /// An editor that will give `answers` in order.
    pub fn new(answers: impl IntoIterator<Item = EditorAnswer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
        }
    }
}

impl OptionEditor for ScriptedEditor {
    fn edit(&mut self, item: &OptionItem) -> Option<OptionValue> {
        match self.answers.pop_front()? {
            EditorAnswer::Value(v) => Some(v),
            EditorAnswer::Toggle => match item.value {
                OptionValue::Bool(b) => Some(OptionValue::Bool(!b)),
                _ => None,
            },
            EditorAnswer::Cancel => None,
        }
    }
}
