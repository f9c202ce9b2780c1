//! actions: the path-addressed action registry.
//!
//! Every user-invocable command is an action registered under a `>`-separated path such as
//! `Mupen64 > Emulation > Pause`. The registry owns the tree of actions and the hotkey table,
//! runs press/release callbacks, and publishes change events that menus, palettes, and other
//! projections consume.
//!
//! - [`ActionRegistry`]: registration, lookup, invocation, hotkey association.
//! - [`ActionParams`]: the callbacks and options an action is registered with.
//! - [`conflict`]: pure hotkey conflict resolution over a [`HotkeyTable`].
//! - [`recent`]: most-recently-used lists and their menus.
//! - [`RegistryEvent`]: notifications, coalesced while a batch is open.

mod action;
pub use action::{ActionParams, Callback, NameProvider, Predicate};

pub mod conflict;
pub use conflict::{
    Conflict, ConflictChoice, ConflictPolicy, ConflictPrompt, HotkeyTable, Outcome,
};

mod error;
pub use error::PathError;

mod events;
pub use events::{Notifier, RegistryEvent};

mod path;
pub use path::{
    SEGMENT_SEPARATOR, SEPARATOR_SUFFIX, WILDCARD, get_segments, has_separator, join_segments,
    normalize_filter, parent_of, segment_display_name,
};

pub mod recent;
pub use recent::RecentList;

mod registry;
pub use registry::ActionRegistry;

mod tree;
pub use tree::OutlineNode;
