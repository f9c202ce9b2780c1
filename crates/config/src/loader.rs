//! Read and write the configuration file.

use std::{fs, io::ErrorKind, path::Path};

use ron::ser::{PrettyConfig, to_string_pretty};
use tracing::{debug, info};

use crate::{Config, Error};

/// Parse a config from RON text. `path` is only used for error reporting.
pub fn load_from_str(source: &str, path: Option<&Path>) -> Result<Config, Error> {
    ron::from_str(source).map_err(|e| Error::Parse {
        path: path.map(Path::to_path_buf),
        message: e.to_string(),
    })
}

/// Load a config from `path`. A missing file yields the default config.
pub fn load_from_path(path: &Path) -> Result<Config, Error> {
    let source = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no config file; using defaults");
            return Ok(Config::default());
        }
        Err(e) => {
            return Err(Error::Read {
                path: Some(path.to_path_buf()),
                message: e.to_string(),
            });
        }
    };
    load_from_str(&source, Some(path))
}

/// Write `config` to `path` as pretty RON, creating parent directories.
pub fn save_to_path(config: &Config, path: &Path) -> Result<(), Error> {
    let write_err = |message: String| Error::Write {
        path: path.to_path_buf(),
        message,
    };
    let text = to_string_pretty(config, PrettyConfig::new())
        .map_err(|e| write_err(e.to_string()))?;
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir).map_err(|e| write_err(e.to_string()))?;
    }
    fs::write(path, text).map_err(|e| write_err(e.to_string()))?;
    info!(path = %path.display(), "config saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_fills_defaults() {
        let cfg = load_from_str("(statusbar: false)", None).expect("parse");
        assert!(!cfg.statusbar);
        assert!(cfg.pause_on_menu);
        assert!(cfg.hotkeys.is_empty());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = load_from_str("(statusbar: false, bogus: 1)", None).expect_err("bogus field");
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn recent_lists_and_hotkeys_parse() {
        let cfg = load_from_str(
            r#"(
                hotkeys: {"Mupen64>Emulation>Pause": (key: 19, assigned: true)},
                recent_roms: (items: ["a.z64", "b.z64"], frozen: true),
                theme: dark,
            )"#,
            None,
        )
        .expect("parse");
        assert_eq!(cfg.recent_roms.items.len(), 2);
        assert!(cfg.recent_roms.frozen);
        assert_eq!(cfg.theme, crate::Theme::Dark);
        assert!(cfg.hotkeys["Mupen64>Emulation>Pause"].is_assigned());
    }
}
