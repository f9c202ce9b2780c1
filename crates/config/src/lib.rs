//! Persisted front-end settings: the hotkey table, recent-item lists, and UI scalars.
//!
//! The file format is RON. A missing file is not an error; it yields [`Config::default`].

use std::{
    env,
    path::{Path, PathBuf},
};

mod error;
mod loader;
pub mod options;
mod types;

pub use error::Error;
pub use loader::{load_from_path, load_from_str, save_to_path};
pub use options::{ConfigOptions, OptionGroup, OptionItem, OptionKind, OptionValue, OptionsModel};
pub use types::{Config, Theme};

/// Determine the preferred user config path (`~/.emuview/config.ron`).
pub fn default_config_path() -> PathBuf {
    let mut p = PathBuf::from(env::var_os("HOME").unwrap_or_default());
    p.push(".emuview");
    p.push("config.ron");
    p
}

/// Resolve the effective config path: `explicit` when provided, else the default path.
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    explicit.map_or_else(default_config_path, Path::to_path_buf)
}
