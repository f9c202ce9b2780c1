use std::{io, result::Result as StdResult};

use thiserror::Error;

/// Convenient result type for the engine crate.
pub type Result<T> = StdResult<T, Error>;

/// Unified error type for the emuview engine.
#[derive(Debug, Error)]
pub enum Error {
    /// Loading, editing, or saving configuration failed.
    #[error("Config error: {0}")]
    Config(#[from] config::Error),

    /// I/O failure, e.g. while starting the task runtime.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic error with context.
    #[error("Engine error: {0}")]
    Msg(String),
}

impl Error {
    /// Render for display on the command line.
    pub fn pretty(&self) -> String {
        match self {
            Self::Config(e) => e.pretty(),
            other => other.to_string(),
        }
    }
}
