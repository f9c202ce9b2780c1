//! emuview engine
//!
//! The projections and input plumbing built on top of the action registry:
//! - [`ActionMenu`]: mirrors the action tree into a menu bar through a [`MenuBackend`]
//! - [`CommandPalette`]: a filterable list of actions and options
//! - [`HotkeyTracker`]: turns raw key and mouse input into invocations
//! - [`Shell`]: owns the registry and routes [`UiEvent`]s to the above
//! - [`TaskPool`]: fire-and-forget worker pool for non-UI work
//!
//! Everything except the task pool is single-threaded and lives on the UI thread.

mod error;
pub mod headless;
mod menu;
mod palette;
mod prompt;
mod shell;
mod tasks;
mod tracker;

pub use error::{Error, Result};
pub use menu::{ActionMenu, MenuBackend, MenuHandle, MenuId, RESERVED_MAX_ID, item_label};
pub use palette::{CommandPalette, PaletteOutcome, PaletteRow, RowKind, group_header};
pub use prompt::HotkeyPrompt;
pub use shell::{Dispatched, Shell, UiEvent};
pub use tasks::{DEFAULT_WORKERS, FaultHandler, TaskPool};
pub use tracker::{HotkeyTracker, MouseButtons};
