//! Command palette projection: a filterable flat list of actions and options.
//!
//! Rows are grouped by the parent of each action; only direct children of a group appear
//! under it. Options from an [`OptionsModel`] follow in a second section. The list is rebuilt
//! on every query change and every registry notification.

use actions::{ActionRegistry, RegistryEvent, get_segments, join_segments, parent_of};
use config::{OptionKind, OptionValue, OptionsModel, options::OptionEditor};
use hotkey::Key;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, warn};

use crate::{Result, prompt::HotkeyPrompt};

/// The rebind key.
const F2: Key = Key(Key::F1.0 + 1);

/// What a row stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    /// A non-selectable group header.
    Group,
    /// An action row.
    Action {
        /// Canonical action path.
        path: String,
    },
    /// An option row.
    Option {
        /// Owning option group.
        group_id: usize,
        /// Option name.
        name: String,
        /// Option kind.
        kind: OptionKind,
    },
}

/// One line of the palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteRow {
    /// What the row stands for.
    pub kind: RowKind,
    /// Primary text: display name or group header.
    pub text: String,
    /// Right-aligned hint: hotkey text or option value.
    pub hint: Option<String>,
    /// Disabled rows are shown but cannot be selected.
    pub enabled: bool,
    /// Rendered with a check box.
    pub activatable: bool,
    /// Check box state.
    pub active: bool,
}

impl PaletteRow {
    /// A group header row.
    fn group(text: String) -> Self {
        Self {
            kind: RowKind::Group,
            text,
            hint: None,
            enabled: true,
            activatable: false,
            active: false,
        }
    }

    /// Whether the row can hold the selection.
    pub fn is_selectable(&self) -> bool {
        self.enabled && self.kind != RowKind::Group
    }
}

/// What handling a palette key did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteOutcome {
    /// The key was not for the palette.
    Ignored,
    /// Selection moved or nothing visible happened.
    Handled,
    /// The palette closed without running anything.
    Closed,
    /// The palette closed and invoked this action.
    Invoked(String),
    /// An option was edited and saved; the palette closed.
    Edited(String),
    /// The selected action got a new hotkey.
    Rebound(String),
}

/// Lowercased, trimmed text for substring matching.
fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Group header text: the raw display name of each path prefix, joined by ` > `.
pub fn group_header(registry: &ActionRegistry, group: &str) -> String {
    let segments = get_segments(group);
    (1..=segments.len())
        .map(|n| registry.get_display_name(&join_segments(&segments[..n]), true))
        .collect::<Vec<_>>()
        .join(" > ")
}

/// The command palette state: query, rows, and selection.
pub struct CommandPalette {
    /// Registry notifications.
    events: UnboundedReceiver<RegistryEvent>,
    /// Current query text.
    query: String,
    /// Rows for the current query.
    rows: Vec<PaletteRow>,
    /// Selected row index.
    selected: Option<usize>,
    /// Whether the palette is shown.
    open: bool,
}

impl CommandPalette {
    /// Subscribe to `registry`. The palette starts closed.
    pub fn new(registry: &mut ActionRegistry) -> Self {
        Self {
            events: registry.subscribe(),
            query: String::new(),
            rows: Vec::new(),
            selected: None,
            open: false,
        }
    }

    /// Show the palette with an empty query.
    pub fn open(&mut self, registry: &ActionRegistry, options: &dyn OptionsModel) {
        while self.events.try_recv().is_ok() {}
        self.open = true;
        self.query.clear();
        self.rebuild(registry, options);
    }

    /// Hide the palette.
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Whether the palette is shown.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Current query text.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Rows for the current query.
    pub fn rows(&self) -> &[PaletteRow] {
        &self.rows
    }

    /// Index of the selected row.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// The selected row.
    pub fn selected_row(&self) -> Option<&PaletteRow> {
        self.selected.and_then(|i| self.rows.get(i))
    }

    /// Replace the query and rebuild.
    pub fn set_query(&mut self, query: &str, registry: &ActionRegistry, options: &dyn OptionsModel) {
        query.clone_into(&mut self.query);
        self.rebuild(registry, options);
    }

    /// Rebuild if the registry changed since the last look.
    pub fn sync(&mut self, registry: &ActionRegistry, options: &dyn OptionsModel) {
        let mut changed = false;
        while self.events.try_recv().is_ok() {
            changed = true;
        }
        if changed && self.open {
            self.rebuild(registry, options);
        }
    }

    /// Recompute the rows for the current query and select the first selectable row.
    pub fn rebuild(&mut self, registry: &ActionRegistry, options: &dyn OptionsModel) {
        let query = normalize(&self.query);
        let mut rows = Vec::new();

        // Root-level actions have no group and are not listed.
        let mut groups: Vec<String> = Vec::new();
        for path in registry.get_actions_matching_filter("*") {
            if let Some(parent) = parent_of(&path)
                && !groups.contains(&parent)
            {
                groups.push(parent);
            }
        }

        for group in &groups {
            let header = group_header(registry, group);
            let members = registry.get_actions_matching_filter(&join_segments(&[group.as_str(), "*"]));
            let mut matched: Vec<PaletteRow> = Vec::new();
            for path in members
                .into_iter()
                .filter(|p| parent_of(p).as_deref() == Some(group.as_str()))
            {
                let name = registry.get_display_name(&path, false);
                let hint = registry
                    .hotkey(&path)
                    .filter(|h| !h.is_empty())
                    .map(|h| h.to_text());
                let raw = registry.get_display_name(&path, true);
                let hit = query.is_empty()
                    || [Some(&name), Some(&header), Some(group), hint.as_ref(), Some(&raw)]
                        .into_iter()
                        .flatten()
                        .any(|s| normalize(s).contains(&query));
                if hit {
                    matched.push(PaletteRow {
                        enabled: registry.get_enabled(&path),
                        activatable: registry.get_activatability(&path),
                        active: registry.get_active(&path),
                        kind: RowKind::Action { path },
                        text: name,
                        hint,
                    });
                }
            }
            if !matched.is_empty() {
                rows.push(PaletteRow::group(header));
                rows.extend(matched);
            }
        }

        for group in options.option_groups() {
            let matched: Vec<PaletteRow> = group
                .items
                .iter()
                .filter(|item| item.kind != OptionKind::Hotkey)
                .filter_map(|item| {
                    let is_bool = item.kind == OptionKind::Bool;
                    let hint = (!is_bool).then(|| item.value_name());
                    let hit = query.is_empty()
                        || [Some(&item.name), Some(&group.name), hint.as_ref()]
                            .into_iter()
                            .flatten()
                            .any(|s| normalize(s).contains(&query));
                    hit.then(|| PaletteRow {
                        kind: RowKind::Option {
                            group_id: group.id,
                            name: item.name.clone(),
                            kind: item.kind,
                        },
                        text: item.name.clone(),
                        hint,
                        enabled: !item.readonly,
                        activatable: is_bool,
                        active: item.value == OptionValue::Bool(true),
                    })
                })
                .collect();
            if !matched.is_empty() {
                rows.push(PaletteRow::group(group.name.clone()));
                rows.extend(matched);
            }
        }

        self.rows = rows;
        self.selected = None;
        self.move_selection(1);
        debug!(query = %self.query, rows = self.rows.len(), "palette rebuilt");
    }

    /// Move the selection by `delta` rows, skipping unselectable rows and wrapping around.
    ///
    /// Gives up after one full lap, leaving nothing selected when no row is selectable.
    pub fn move_selection(&mut self, delta: isize) {
        let len = self.rows.len();
        if len == 0 {
            self.selected = None;
            return;
        }
        let step = if delta < 0 { len - 1 } else { 1 };
        let mut i = match self.selected {
            Some(i) => i,
            // Start just before the first row (or just after the last) so the first step lands
            // on row 0 (or the last row).
            None if delta < 0 => 0,
            None => len - 1,
        };
        for _ in 0..delta.unsigned_abs().max(1) {
            let mut found = None;
            for _ in 0..len {
                i = (i + step) % len;
                if self.rows[i].is_selectable() {
                    found = Some(i);
                    break;
                }
            }
            match found {
                Some(f) => self.selected = Some(f),
                None => {
                    self.selected = None;
                    return;
                }
            }
        }
    }

    /// Run the selected row: invoke an action, or edit and save an option.
    ///
    /// An edited option closes the palette even when saving it fails; the save error is
    /// returned.
    pub fn activate(
        &mut self,
        registry: &mut ActionRegistry,
        options: &mut dyn OptionsModel,
        editor: &mut dyn OptionEditor,
    ) -> Result<PaletteOutcome> {
        let Some(row) = self.selected_row().cloned() else {
            return Ok(PaletteOutcome::Handled);
        };
        match row.kind {
            RowKind::Group => Ok(PaletteOutcome::Handled),
            RowKind::Action { path } => {
                self.close();
                registry.invoke(&path, false, true);
                Ok(PaletteOutcome::Invoked(path))
            }
            RowKind::Option { group_id, name, .. } => {
                if !options.edit(group_id, &name, editor) {
                    return Ok(PaletteOutcome::Handled);
                }
                self.close();
                if let Err(e) = options.apply_and_save() {
                    warn!(option = %name, error = %e.pretty(), "saving options failed");
                    return Err(e.into());
                }
                Ok(PaletteOutcome::Edited(name))
            }
        }
    }

    /// Ask for a new hotkey for the selected action and bind it through the conflict flow.
    ///
    /// On success the list is rebuilt and the selection advances past the rebound row.
    pub fn rebind(
        &mut self,
        registry: &mut ActionRegistry,
        options: &dyn OptionsModel,
        prompt: &mut dyn HotkeyPrompt,
    ) -> PaletteOutcome {
        let Some(RowKind::Action { path }) = self.selected_row().map(|r| r.kind.clone()) else {
            return PaletteOutcome::Handled;
        };
        let caption = registry.get_display_name(&path, false);
        let current = registry.hotkey(&path).unwrap_or_default();
        let Some(hotkey) = prompt.prompt(&caption, current) else {
            return PaletteOutcome::Handled;
        };
        if !registry.associate_hotkey(&path, hotkey, true) {
            return PaletteOutcome::Handled;
        }
        let index = self.selected.unwrap_or(0);
        while self.events.try_recv().is_ok() {}
        self.rebuild(registry, options);
        if !self.rows.is_empty() {
            self.selected = Some(index.min(self.rows.len() - 1));
            self.move_selection(1);
        }
        PaletteOutcome::Rebound(path)
    }

    /// Handle a key press while the palette is open.
    ///
    /// Escape closes, Up/Down move, Enter activates, F2 rebinds.
    pub fn on_key(
        &mut self,
        key: Key,
        registry: &mut ActionRegistry,
        options: &mut dyn OptionsModel,
        editor: &mut dyn OptionEditor,
        prompt: &mut dyn HotkeyPrompt,
    ) -> Result<PaletteOutcome> {
        if !self.open {
            return Ok(PaletteOutcome::Ignored);
        }
        let outcome = match key {
            Key::ESCAPE => {
                self.close();
                PaletteOutcome::Closed
            }
            Key::UP => {
                self.move_selection(-1);
                PaletteOutcome::Handled
            }
            Key::DOWN => {
                self.move_selection(1);
                PaletteOutcome::Handled
            }
            Key::RETURN => return self.activate(registry, options, editor),
            F2 => self.rebind(registry, options, prompt),
            _ => PaletteOutcome::Ignored,
        };
        Ok(outcome)
    }
}
