//! Binary entrypoint for the emuview command-line front end.
use std::{io, path::PathBuf, process};

use actions::{ConflictPolicy, Outcome};
use clap::{Parser, Subcommand, ValueEnum};
use config::{load_from_path, resolve_config_path};
use emuview::App;
use emuview_engine::{Error, PaletteRow, Result, RowKind};
use hotkey::Hotkey;
use logging::{self as logshared, buffer};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(name = "emuview", about = "Headless N64 front-end shell: menus, hotkeys, command palette", version)]
/// Command-line interface for the `emuview` binary.
struct Cli {
    /// What to do.
    #[command(subcommand)]
    command: Command,

    /// Logging controls
    #[command(flatten)]
    log: logshared::LogArgs,

    /// Optional path to the config file
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Print the last N log events to stderr before exiting
    #[arg(long, value_name = "N", global = true)]
    log_tail: Option<usize>,
}

#[derive(Subcommand, Debug)]
/// Top-level CLI subcommands.
enum Command {
    /// Print the menu bar.
    Menu,
    /// Print the command palette rows for a query.
    Palette {
        /// Filter text
        query: Option<String>,
    },
    /// Press an action (and persist any resulting changes).
    Invoke {
        /// Action path, e.g. "Mupen64 > Emulation > Pause"
        path: String,
        /// Release instead of press
        #[arg(long)]
        up: bool,
    },
    /// Load a ROM, recording it in the recent list.
    Open {
        /// ROM file path
        rom: String,
    },
    /// Press and release a hotkey through the hotkey tracker.
    Press {
        /// Hotkey spec, e.g. "ctrl+o"
        hotkey: String,
    },
    /// Bind a hotkey to an action and persist the table.
    Bind {
        /// Action path
        path: String,
        /// Hotkey spec, e.g. "ctrl+shift+f5", or "none" to clear
        hotkey: String,
        /// What to do when another action already uses the hotkey
        #[arg(long, value_enum, default_value_t = OnConflict::Cancel)]
        on_conflict: OnConflict,
    },
    /// Print the hotkey table.
    Keys {
        /// Include actions without a binding
        #[arg(long)]
        all: bool,
    },
    /// Load and validate the configuration then exit.
    Check {
        /// Path to configuration file to check (defaults to ~/.emuview/config.ron)
        path: Option<PathBuf>,

        /// Dump the parsed configuration as JSON to stdout
        #[arg(long)]
        dump: bool,
    },
}

/// Conflict answers selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OnConflict {
    /// Clear the hotkey from the other actions.
    KeepNew,
    /// Leave the other actions alone and clear this one.
    KeepOld,
    /// Bind anyway; several actions share the hotkey.
    Proceed,
    /// Change nothing.
    Cancel,
}

impl From<OnConflict> for ConflictPolicy {
    fn from(c: OnConflict) -> Self {
        match c {
            OnConflict::KeepNew => Self::KeepNew,
            OnConflict::KeepOld => Self::KeepOld,
            OnConflict::Proceed => Self::ProceedAnyway,
            OnConflict::Cancel => Self::Cancel,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let env_filter = logshared::env_filter_from_spec(&cli.log.spec());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().without_time().with_writer(io::stderr))
        .with(buffer::layer())
        .try_init()
        .ok();

    let result = run(&cli);
    if let Some(n) = cli.log_tail {
        let logs = buffer::snapshot();
        for log in &logs[logs.len().saturating_sub(n)..] {
            eprintln!("{}", log.line());
        }
    }
    if let Err(e) = result {
        eprintln!("{}", e.pretty());
        process::exit(1);
    }
}

/// Execute the selected subcommand.
fn run(cli: &Cli) -> Result<()> {
    let config_path = resolve_config_path(cli.config.as_deref());
    debug!(path = %config_path.display(), "config path");

    if let Command::Check { path, dump } = &cli.command {
        let path = path.clone().unwrap_or(config_path);
        let cfg = load_from_path(&path)?;
        if *dump {
            let json = serde_json::to_string_pretty(&cfg)
                .map_err(|e| Error::Msg(format!("Failed to serialize config: {e}")))?;
            println!("{json}");
        } else {
            println!("OK");
        }
        return Ok(());
    }

    let mut app = App::load(&config_path)?;
    match &cli.command {
        Command::Menu => print!("{}", app.menu_text()?),
        Command::Palette { query } => {
            let rows = app.palette_rows(query.as_deref().unwrap_or(""))?;
            let width = app.frontend().config.borrow().palette_hint_width as usize;
            for row in &rows {
                println!("{}", palette_line(row, width));
            }
        }
        Command::Invoke { path, up } => {
            app.invoke(path, *up)?;
            app.save()?;
        }
        Command::Open { rom } => {
            app.open_rom(rom)?;
            app.save()?;
        }
        Command::Press { hotkey } => {
            let hotkey = parse_hotkey(hotkey)?;
            let pressed = app.key(hotkey, false)?;
            app.key(hotkey, true)?;
            println!("{pressed:?}");
            app.save()?;
        }
        Command::Bind {
            path,
            hotkey,
            on_conflict,
        } => {
            let hotkey = parse_hotkey(hotkey)?;
            let mut policy = ConflictPolicy::from(*on_conflict);
            let outcome = app.bind(path, hotkey, &mut policy);
            println!("{}", describe(&outcome));
            if !outcome.is_success() {
                return Err(Error::Msg(format!("binding {hotkey} to {path} failed")));
            }
            app.save()?;
        }
        Command::Keys { all } => {
            for (path, hotkey) in app.shell().registry().hotkeys() {
                if *all || !hotkey.is_empty() {
                    println!("{path}\t{}", hotkey.to_text());
                }
            }
        }
        Command::Check { .. } => {}
    }
    Ok(())
}

/// Parse a hotkey spec from the command line.
fn parse_hotkey(spec: &str) -> Result<Hotkey> {
    Hotkey::parse(spec).map_err(|e| Error::Msg(format!("invalid hotkey {spec:?}: {e}")))
}

/// One printed palette row.
fn palette_line(row: &PaletteRow, hint_width: usize) -> String {
    if row.kind == RowKind::Group {
        return row.text.clone();
    }
    let mark = match (row.activatable, row.active) {
        (true, true) => "[x] ",
        (true, false) => "[ ] ",
        _ => "",
    };
    let mut line = format!("  {mark}{}", row.text);
    if let Some(hint) = &row.hint {
        line = format!("{line:<48}{hint:>hint_width$}");
    }
    if !row.enabled {
        line.push_str("  (disabled)");
    }
    line
}

/// Human-readable conflict outcome.
fn describe(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Cleared => "cleared".to_string(),
        Outcome::Unchanged => "unchanged".to_string(),
        Outcome::Bound => "bound".to_string(),
        Outcome::KeptNew(cleared) => format!("bound; cleared {}", cleared.join(", ")),
        Outcome::KeptOld => "kept the existing binding; this action is now unbound".to_string(),
        Outcome::ProceededAnyway(shared) => format!("bound; shared with {}", shared.join(", ")),
        Outcome::Cancelled => "cancelled: hotkey already in use".to_string(),
        Outcome::UnknownAction => "no such action".to_string(),
        Outcome::AlreadyBound => "action already has a hotkey".to_string(),
    }
}
