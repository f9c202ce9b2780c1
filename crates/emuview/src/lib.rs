//! emuview front end
//!
//! Registers the standard application actions, loads and saves the configuration, and drives
//! the engine's shell without a window. The `emuview` binary is a thin command-line layer over
//! [`App`].

mod app;
pub mod standard;
pub mod state;

pub use app::App;
