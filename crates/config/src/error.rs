//! Error types for loading and saving the configuration.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error, Clone)]
/// Errors produced while reading, parsing, editing, or writing the configuration.
pub enum Error {
    #[error("{message}")]
    /// I/O or filesystem read error.
    Read {
        /// Optional path associated with the read error.
        path: Option<PathBuf>,
        /// Human-readable error message.
        message: String,
    },
    #[error("{message}")]
    /// RON parse error; the message carries the line and column.
    Parse {
        /// Optional path associated with the parse error.
        path: Option<PathBuf>,
        /// Human-readable error message.
        message: String,
    },
    #[error("{message}")]
    /// Serialization or filesystem write error.
    Write {
        /// Path being written.
        path: PathBuf,
        /// Human-readable error message.
        message: String,
    },
    #[error("{message}")]
    /// An option edit carried a value of the wrong kind or out of range.
    Option {
        /// Option name.
        name: String,
        /// Human-readable error message.
        message: String,
    },
}

impl Error {
    /// Render a human-friendly error message including the location when available.
    pub fn pretty(&self) -> String {
        match self {
            Self::Read { path, message } => match path {
                Some(p) => format!("Read error at {}: {}", p.display(), message),
                None => format!("Read error: {}", message),
            },
            Self::Parse { path, message } => match path {
                Some(p) => format!("Config parse error in {}\n{}", p.display(), message),
                None => format!("Config parse error\n{}", message),
            },
            Self::Write { path, message } => {
                format!("Write error at {}: {}", path.display(), message)
            }
            Self::Option { name, message } => format!("Option '{}': {}", name, message),
        }
    }

    /// Access the optional path attached to this error.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Read { path, .. } | Self::Parse { path, .. } => path.as_deref(),
            Self::Write { path, .. } => Some(path),
            Self::Option { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_includes_location() {
        let e = Error::Parse {
            path: Some(PathBuf::from("/tmp/config.ron")),
            message: "3:7: Expected boolean".into(),
        };
        let s = e.pretty();
        assert!(s.contains("/tmp/config.ron"));
        assert!(s.contains("3:7"));
        assert_eq!(e.path(), Some(Path::new("/tmp/config.ron")));

        let e = Error::Read {
            path: None,
            message: "denied".into(),
        };
        assert_eq!(e.pretty(), "Read error: denied");
    }
}
