use std::{fmt, mem};

use hotkey::Hotkey;
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use crate::{
    ActionParams, PathError,
    action::Action,
    conflict::{self, ConflictPolicy, ConflictPrompt, HotkeyTable, Outcome},
    events::{Notice, Notifier, Pending, RegistryEvent, Subscribers},
    path::{Filter, WILDCARD, get_segments, join_segments, segment_display_name},
    tree::{Node, OutlineNode},
};

/// The set of registered actions, their hotkeys, and the subscribers watching them.
///
/// Owned by the UI thread. Callbacks run synchronously inside [`invoke`](Self::invoke) and
/// [`remove`](Self::remove); they may queue notifications through a [`Notifier`] but cannot
/// borrow the registry.
pub struct ActionRegistry {
    root: Node,
    hotkeys: HotkeyTable,
    hotkeys_locked: bool,
    batch: Option<Pending>,
    subscribers: Subscribers,
    notifier: Notifier,
    prompt: Box<dyn ConflictPrompt>,
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("actions", &self.get_actions_matching_filter(WILDCARD))
            .field("hotkeys_locked", &self.hotkeys_locked)
            .field("batching", &self.batch.is_some())
            .finish_non_exhaustive()
    }
}

impl ActionRegistry {
    /// An empty registry with an empty hotkey table. Conflicts are cancelled until a prompt is
    /// installed with [`set_conflict_prompt`](Self::set_conflict_prompt).
    pub fn new() -> Self {
        Self {
            root: Node::default(),
            hotkeys: HotkeyTable::new(),
            hotkeys_locked: false,
            batch: None,
            subscribers: Subscribers::default(),
            notifier: Notifier::default(),
            prompt: Box::new(ConflictPolicy::Cancel),
        }
    }

    /// Install the prompt consulted by [`associate_hotkey`](Self::associate_hotkey).
    pub fn set_conflict_prompt(&mut self, prompt: Box<dyn ConflictPrompt>) {
        self.prompt = prompt;
    }

    /// Receive change events from now on.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<RegistryEvent> {
        self.subscribers.subscribe()
    }

    /// A handle callbacks can use to request notifications.
    pub fn notifier(&self) -> Notifier {
        self.notifier.clone()
    }

    /// Register an action. Returns false (and logs why) when the path is rejected.
    pub fn add(&mut self, params: ActionParams) -> bool {
        let given = params.path.clone();
        match self.try_add(params) {
            Ok(_) => true,
            Err(e) => {
                warn!(path = %given, error = %e, "action rejected");
                false
            }
        }
    }

    /// Register an action, returning its canonical path.
    ///
    /// A hotkey table entry is created for the path when missing. A default hotkey from the
    /// params is bound only if the entry is not yet assigned and no other action uses it.
    pub fn try_add(&mut self, params: ActionParams) -> Result<String, PathError> {
        let segments = get_segments(&params.path);
        if segments.is_empty() {
            return Err(PathError::Empty);
        }
        if segments.iter().any(String::is_empty) {
            return Err(PathError::EmptySegment { path: params.path });
        }
        if segments.iter().any(|s| s == WILDCARD) {
            return Err(PathError::Wildcard { path: params.path });
        }
        let path = join_segments(&segments);
        let default_hotkey = params.default_hotkey;
        self.root.insert(&segments, Action::new(params))?;

        let entry = self
            .hotkeys
            .entry(path.clone())
            .or_insert_with(Hotkey::unassigned);
        if let Some(default) = default_hotkey
            && !entry.is_assigned()
        {
            let taken = conflict::conflicts_for(&self.hotkeys, &path, &default);
            if taken.is_empty() {
                self.hotkeys.insert(path.clone(), default);
            } else {
                debug!(%path, hotkey = %default, ?taken, "default hotkey already in use");
            }
        }
        debug!(%path, "action added");
        self.emit(RegistryEvent::Changed);
        Ok(path)
    }

    /// Remove every action matching `filter`, running their removal callbacks.
    ///
    /// Each callback runs while its action is still registered. Hotkey table entries are kept so
    /// a re-registered action gets its binding back.
    pub fn remove(&mut self, filter: &str) -> Vec<String> {
        let paths = self.get_actions_matching_filter(filter);
        for path in &paths {
            let segments = get_segments(path);
            if let Some(action) = self.root.find_mut(&segments).and_then(|n| n.action.as_mut()) {
                action.removed();
            }
            if self.root.remove(&segments).is_some() {
                debug!(%path, "action removed");
            }
        }
        if !paths.is_empty() {
            self.emit(RegistryEvent::Changed);
        }
        self.flush_notices();
        paths
    }

    /// Whether an action is registered at `path`.
    pub fn contains(&self, path: &str) -> bool {
        self.action(path).is_some()
    }

    /// Bind `hotkey` to the action at `path`, consulting the installed conflict prompt.
    ///
    /// Returns false when the path names no action, when `overwrite_existing` is false and the
    /// action already has an assigned binding, or when the conflict prompt cancels.
    pub fn associate_hotkey(&mut self, path: &str, hotkey: Hotkey, overwrite_existing: bool) -> bool {
        let mut prompt = mem::replace(&mut self.prompt, Box::new(ConflictPolicy::Cancel));
        let outcome = self.try_associate_hotkey(path, hotkey, overwrite_existing, prompt.as_mut());
        self.prompt = prompt;
        outcome.is_success()
    }

    /// Like [`associate_hotkey`](Self::associate_hotkey) with an explicit prompt, reporting the
    /// full outcome.
    pub fn try_associate_hotkey(
        &mut self,
        path: &str,
        hotkey: Hotkey,
        overwrite_existing: bool,
        prompt: &mut dyn ConflictPrompt,
    ) -> Outcome {
        let Filter::Exact(segments) = Filter::parse(path) else {
            warn!(%path, "cannot bind a hotkey to a filter");
            return Outcome::UnknownAction;
        };
        let path = join_segments(&segments);
        if !self.contains(&path) {
            warn!(%path, "cannot bind a hotkey to an unknown action");
            return Outcome::UnknownAction;
        }
        if !overwrite_existing && self.hotkeys.get(&path).is_some_and(Hotkey::is_assigned) {
            return Outcome::AlreadyBound;
        }
        let resolution = conflict::resolve(&self.hotkeys, &path, hotkey, prompt);
        let changed = resolution.apply(&mut self.hotkeys);
        debug!(%path, hotkey = %hotkey, outcome = ?resolution.outcome, "hotkey associated");
        if !changed.is_empty() {
            self.emit(RegistryEvent::DisplayNameChanged(changed));
        }
        resolution.outcome
    }

    /// Start coalescing notifications until [`end_batch_work`](Self::end_batch_work).
    pub fn begin_batch_work(&mut self) {
        if self.batch.is_some() {
            warn!("batch already open; nested batches are not supported");
            return;
        }
        self.batch = Some(Pending::default());
    }

    /// Deliver the coalesced notifications: at most one event per kind.
    pub fn end_batch_work(&mut self) {
        let Some(pending) = self.batch.take() else {
            return;
        };
        for event in pending.into_events() {
            self.subscribers.send(&event);
        }
    }

    /// Whether a batch is open.
    pub fn is_batching(&self) -> bool {
        self.batch.is_some()
    }

    /// Display names under `filter` may have changed.
    pub fn notify_display_name_changed(&mut self, filter: &str) {
        let paths = self.get_actions_matching_filter(filter);
        if !paths.is_empty() {
            self.emit(RegistryEvent::DisplayNameChanged(paths));
        }
    }

    /// Enabled states under `filter` may have changed.
    pub fn notify_enabled_changed(&mut self, filter: &str) {
        let paths = self.get_actions_matching_filter(filter);
        if !paths.is_empty() {
            self.emit(RegistryEvent::EnabledChanged(paths));
        }
    }

    /// Active states under `filter` may have changed.
    pub fn notify_active_changed(&mut self, filter: &str) {
        let paths = self.get_actions_matching_filter(filter);
        if !paths.is_empty() {
            self.emit(RegistryEvent::ActiveChanged(paths));
        }
    }

    /// Deliver notifications queued through [`Notifier`] handles.
    pub fn flush_notices(&mut self) {
        loop {
            let notices = self.notifier.take();
            if notices.is_empty() {
                break;
            }
            for notice in notices {
                match notice {
                    Notice::DisplayName(f) => self.notify_display_name_changed(&f),
                    Notice::Enabled(f) => self.notify_enabled_changed(&f),
                    Notice::Active(f) => self.notify_active_changed(&f),
                }
            }
        }
    }

    /// The user-facing name for `filter`.
    ///
    /// For an action with a name provider (and `ignore_override` false) this is the provider's
    /// result; otherwise the last segment with any separator suffix stripped. Wildcard and
    /// malformed filters yield an empty string.
    pub fn get_display_name(&self, filter: &str, ignore_override: bool) -> String {
        let Filter::Exact(segments) = Filter::parse(filter) else {
            return String::new();
        };
        if !ignore_override
            && let Some(provider) = self
                .root
                .find(&segments)
                .and_then(|n| n.action.as_ref())
                .and_then(|a| a.params.display_name.as_ref())
        {
            return provider();
        }
        segments
            .last()
            .map(|s| segment_display_name(s))
            .unwrap_or_default()
    }

    /// Whether the action can be invoked. Unknown paths are not enabled.
    pub fn get_enabled(&self, path: &str) -> bool {
        self.action(path)
            .is_some_and(|a| a.params.enabled.as_ref().is_none_or(|f| f()))
    }

    /// Whether the action is currently active (checked).
    pub fn get_active(&self, path: &str) -> bool {
        self.action(path)
            .and_then(|a| a.params.active.as_ref())
            .is_some_and(|f| f())
    }

    /// Whether the action has an active state at all.
    pub fn get_activatability(&self, path: &str) -> bool {
        self.action(path).is_some_and(|a| a.params.active.is_some())
    }

    /// Whether a second press of a held action releases it first.
    pub fn release_on_repress(&self, path: &str) -> bool {
        self.action(path)
            .is_none_or(|a| a.params.release_on_repress)
    }

    /// Canonical paths of the actions matching `filter`, depth-first in registration order.
    ///
    /// An exact path matches itself if it is an action. `prefix > *` matches every action
    /// strictly below `prefix`, and `*` matches everything. Wildcards in other positions are
    /// unsupported and match nothing.
    pub fn get_actions_matching_filter(&self, filter: &str) -> Vec<String> {
        match Filter::parse(filter) {
            Filter::Exact(segments) => self
                .root
                .find(&segments)
                .filter(|n| n.action.is_some())
                .map(|_| vec![join_segments(&segments)])
                .unwrap_or_default(),
            Filter::Subtree(mut prefix) => {
                let mut out = Vec::new();
                if let Some(node) = self.root.find(&prefix) {
                    node.collect_actions(&mut prefix, &mut out);
                }
                out
            }
            Filter::Invalid => {
                trace!(%filter, "filter matches nothing");
                Vec::new()
            }
        }
    }

    /// Press or release the action at `path`. Returns false for unknown paths.
    ///
    /// Key-down on a held action first releases it when both `release_on_repress` and the
    /// action's own setting allow it.
    pub fn invoke(&mut self, path: &str, up: bool, release_on_repress: bool) -> bool {
        let Filter::Exact(segments) = Filter::parse(path) else {
            return false;
        };
        let Some(action) = self
            .root
            .find_mut(&segments)
            .and_then(|n| n.action.as_mut())
        else {
            debug!(%path, "invoke of unknown action");
            return false;
        };
        let repress = release_on_repress && action.params.release_on_repress;
        trace!(%path, up, repress, "invoke");
        action.invoke(up, repress);
        self.flush_notices();
        true
    }

    /// Suspend or resume hotkey dispatch.
    pub fn lock_hotkeys(&mut self, locked: bool) {
        if self.hotkeys_locked != locked {
            debug!(locked, "hotkey lock changed");
        }
        self.hotkeys_locked = locked;
    }

    /// Whether hotkey dispatch is suspended.
    pub fn get_hotkeys_locked(&self) -> bool {
        self.hotkeys_locked
    }

    /// The hotkey table.
    pub fn hotkeys(&self) -> &HotkeyTable {
        &self.hotkeys
    }

    /// The hotkey bound to `path`, if the table has an entry.
    pub fn hotkey(&self, path: &str) -> Option<Hotkey> {
        self.hotkeys.get(&crate::normalize_filter(path)).copied()
    }

    /// Replace the hotkey table (e.g. after loading configuration).
    ///
    /// Registered actions missing from `table` get an unassigned entry.
    pub fn set_hotkeys(&mut self, table: HotkeyTable) {
        self.hotkeys = table;
        let all = self.get_actions_matching_filter(WILDCARD);
        for path in &all {
            self.hotkeys
                .entry(path.clone())
                .or_insert_with(Hotkey::unassigned);
        }
        if !all.is_empty() {
            self.emit(RegistryEvent::DisplayNameChanged(all));
        }
    }

    /// Snapshot of the tree for laying out menus.
    pub fn outline(&self) -> Vec<OutlineNode> {
        self.root.outline(&mut Vec::new())
    }

    /// Remove every action, running removal callbacks.
    pub fn clear(&mut self) {
        let mut drained = Vec::new();
        self.root.drain(&mut Vec::new(), &mut drained);
        for (path, mut action) in drained {
            action.removed();
            debug!(%path, "action removed");
        }
        self.emit(RegistryEvent::Changed);
        self.flush_notices();
    }

    fn action(&self, path: &str) -> Option<&Action> {
        let Filter::Exact(segments) = Filter::parse(path) else {
            return None;
        };
        self.root.find(&segments).and_then(|n| n.action.as_ref())
    }

    fn emit(&mut self, event: RegistryEvent) {
        match self.batch.as_mut() {
            Some(pending) => pending.record(event),
            None => self.subscribers.send(&event),
        }
    }
}
