//! Menu projection: mirrors the action tree into a native menu bar.
//!
//! Structural registry changes rebuild the whole menu. Display name, enabled, and active
//! changes are only recorded; they are applied in one pass when the menu is about to open.

use std::{
    collections::{BTreeSet, HashMap},
    mem,
};

use actions::{ActionRegistry, OutlineNode, RegistryEvent, has_separator};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, trace};

/// Command identifier of a menu item.
pub type MenuId = u32;

/// Highest id a rebuild may hand out.
pub const RESERVED_MAX_ID: MenuId = 10_000;

/// Opaque handle to a native menu or submenu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MenuHandle(pub u32);

/// The native menu operations the projection needs.
pub trait MenuBackend {
    /// Discard the current menu bar and every submenu, returning a fresh, empty bar.
    fn reset(&mut self) -> MenuHandle;

    /// Create an empty submenu.
    fn create_menu(&mut self) -> MenuHandle;

    /// Append a command item.
    fn append_item(&mut self, menu: MenuHandle, id: MenuId, label: &str);

    /// Append a submenu entry.
    fn append_submenu(&mut self, menu: MenuHandle, submenu: MenuHandle, label: &str);

    /// Append a separator.
    fn append_separator(&mut self, menu: MenuHandle);

    /// Change the label of the entry at `position`.
    fn set_label(&mut self, menu: MenuHandle, position: usize, label: &str);

    /// Enable or gray out the entry at `position`.
    fn set_enabled(&mut self, menu: MenuHandle, position: usize, enabled: bool);

    /// Check or uncheck the entry at `position`.
    fn set_checked(&mut self, menu: MenuHandle, position: usize, checked: bool);
}

/// Projection state for one action item.
#[derive(Debug, Clone)]
struct MenuItem {
    /// Command id.
    id: MenuId,
    /// Containing menu.
    menu: MenuHandle,
    /// Position inside `menu`, counting separators.
    position: usize,
}

/// Paths waiting for a refresh on the next menu opening.
#[derive(Debug, Default)]
struct Invalidated {
    /// Labels to recompute.
    names: BTreeSet<String>,
    /// Enabled states to re-read.
    enabled: BTreeSet<String>,
    /// Checked states to re-read.
    active: BTreeSet<String>,
}

/// Menu bar projection of an [`ActionRegistry`].
///
/// The first top-level namespace (the application root) is flattened: its children become the
/// menu-bar entries. Later top-level nodes are appended after them.
pub struct ActionMenu {
    /// Native menu operations.
    backend: Box<dyn MenuBackend>,
    /// Registry notifications.
    events: UnboundedReceiver<RegistryEvent>,
    /// Action path to projected item.
    items: HashMap<String, MenuItem>,
    /// Command id to action path.
    paths: HashMap<MenuId, String>,
    /// Pending lazy refreshes.
    invalidated: Invalidated,
    /// Highest id a rebuild may hand out.
    max_id: MenuId,
    /// Next id to hand out during a rebuild.
    next_id: MenuId,
    /// Number of completed rebuilds.
    builds: u64,
}

/// Menu label for an action: its display name plus the hotkey as accelerator text.
pub fn item_label(registry: &ActionRegistry, path: &str) -> String {
    let name = registry.get_display_name(path, false);
    match registry.hotkey(path) {
        Some(h) if !h.is_empty() => format!("{name}\t{}", h.to_text()),
        _ => name,
    }
}

impl ActionMenu {
    /// Subscribe to `registry` and build the initial menu.
    pub fn new(registry: &mut ActionRegistry, backend: Box<dyn MenuBackend>) -> Self {
        Self::with_max_id(registry, backend, RESERVED_MAX_ID)
    }

    /// Like [`new`](Self::new) with a custom id ceiling.
    pub fn with_max_id(
        registry: &mut ActionRegistry,
        backend: Box<dyn MenuBackend>,
        max_id: MenuId,
    ) -> Self {
        let events = registry.subscribe();
        let mut menu = Self {
            backend,
            events,
            items: HashMap::new(),
            paths: HashMap::new(),
            invalidated: Invalidated::default(),
            max_id,
            next_id: 1,
            builds: 0,
        };
        menu.build_menu(registry);
        menu
    }

    /// Drain registry notifications: rebuild on structural change, record the rest.
    pub fn sync(&mut self, registry: &ActionRegistry) {
        let mut rebuild = false;
        while let Ok(event) = self.events.try_recv() {
            match event {
                RegistryEvent::Changed => rebuild = true,
                RegistryEvent::DisplayNameChanged(p) => self.invalidated.names.extend(p),
                RegistryEvent::EnabledChanged(p) => self.invalidated.enabled.extend(p),
                RegistryEvent::ActiveChanged(p) => self.invalidated.active.extend(p),
            }
        }
        if rebuild {
            self.build_menu(registry);
        }
    }

    /// Rebuild the whole menu from the registry.
    ///
    /// # Panics
    ///
    /// When the registry has more actions than the id ceiling allows.
    pub fn build_menu(&mut self, registry: &ActionRegistry) {
        self.items.clear();
        self.paths.clear();
        self.invalidated = Invalidated::default();
        self.next_id = 1;

        let bar = self.backend.reset();
        let outline = registry.outline();
        let mut position = 0;
        for (i, node) in outline.iter().enumerate() {
            if i == 0 && !node.is_action {
                for child in &node.children {
                    self.append(registry, bar, child, &mut position);
                }
            } else {
                self.append(registry, bar, node, &mut position);
            }
        }
        self.builds += 1;
        debug!(items = self.items.len(), builds = self.builds, "menu rebuilt");
    }

    /// Append `node` (and its subtree) to `menu`.
    fn append(
        &mut self,
        registry: &ActionRegistry,
        menu: MenuHandle,
        node: &OutlineNode,
        position: &mut usize,
    ) {
        if node.is_action {
            let id = self.next_id;
            assert!(
                id <= self.max_id,
                "menu id {id} exceeds the reserved range ({}); too many actions",
                self.max_id
            );
            self.next_id += 1;
            self.backend
                .append_item(menu, id, &item_label(registry, &node.path));
            self.backend
                .set_enabled(menu, *position, registry.get_enabled(&node.path));
            self.backend
                .set_checked(menu, *position, registry.get_active(&node.path));
            self.items.insert(
                node.path.clone(),
                MenuItem {
                    id,
                    menu,
                    position: *position,
                },
            );
            self.paths.insert(id, node.path.clone());
        } else {
            let submenu = self.backend.create_menu();
            let label = registry.get_display_name(&node.path, false);
            self.backend.append_submenu(menu, submenu, &label);
            let mut inner = 0;
            for child in &node.children {
                self.append(registry, submenu, child, &mut inner);
            }
        }
        *position += 1;
        if has_separator(&node.segment) {
            self.backend.append_separator(menu);
            *position += 1;
        }
    }

    /// Apply the pending refreshes. Call right before the menu becomes visible.
    pub fn on_menu_opening(&mut self, registry: &ActionRegistry) {
        self.sync(registry);
        let pending = mem::take(&mut self.invalidated);
        trace!(
            names = pending.names.len(),
            enabled = pending.enabled.len(),
            active = pending.active.len(),
            "applying menu refreshes"
        );
        for path in &pending.names {
            if let Some(item) = self.items.get(path) {
                self.backend
                    .set_label(item.menu, item.position, &item_label(registry, path));
            }
        }
        for path in &pending.enabled {
            if let Some(item) = self.items.get(path) {
                self.backend
                    .set_enabled(item.menu, item.position, registry.get_enabled(path));
            }
        }
        for path in &pending.active {
            if let Some(item) = self.items.get(path) {
                self.backend
                    .set_checked(item.menu, item.position, registry.get_active(path));
            }
        }
    }

    /// Invoke the action behind a menu command. Returns false for unknown ids.
    pub fn on_command(&self, registry: &mut ActionRegistry, id: MenuId) -> bool {
        match self.paths.get(&id) {
            Some(path) => registry.invoke(path, false, true),
            None => {
                debug!(id, "menu command with no action");
                false
            }
        }
    }

    /// Action path behind a command id.
    pub fn path_for_id(&self, id: MenuId) -> Option<&str> {
        self.paths.get(&id).map(String::as_str)
    }

    /// Command id of an action path.
    pub fn id_for_path(&self, path: &str) -> Option<MenuId> {
        self.items
            .get(&actions::normalize_filter(path))
            .map(|i| i.id)
    }

    /// Number of paths awaiting a refresh, across all three kinds.
    pub fn pending_refreshes(&self) -> usize {
        self.invalidated.names.len() + self.invalidated.enabled.len() + self.invalidated.active.len()
    }

    /// Number of completed rebuilds.
    pub fn build_count(&self) -> u64 {
        self.builds
    }
}
