//! The assembled front end: config, standard actions, shell, and task pool.

use std::{
    cell::RefCell,
    mem,
    path::{Path, PathBuf},
    rc::Rc,
    thread,
    time::{Duration, Instant},
};

use actions::{ActionRegistry, ConflictPrompt, Outcome, join_segments};
use config::{Config, ConfigOptions, load_from_path, save_to_path};
use emuview_engine::{
    Dispatched, Error, PaletteRow, Result, Shell, TaskPool, UiEvent,
    headless::{HeadlessMenu, ScriptedEditor, ScriptedPrompt},
};
use hotkey::Hotkey;
use tracing::{debug, info, warn};

use crate::{
    standard::{self, APP},
    state::Frontend,
};

/// How long to wait for core requests to finish before giving up.
const SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

/// The front end, driven headlessly.
pub struct App {
    /// Registry owner and projections.
    shell: Shell,
    /// Menu backend, kept for rendering.
    menu: HeadlessMenu,
    /// State the standard actions act on.
    frontend: Frontend,
    /// Where the config is saved; `None` keeps it in memory.
    config_path: Option<PathBuf>,
}

impl App {
    /// Load the config at `path` (missing means defaults) and assemble the front end.
    pub fn load(path: &Path) -> Result<Self> {
        let config = load_from_path(path)?;
        Self::with_config(config, Some(path.to_path_buf()))
    }

    /// Assemble the front end around `config`.
    pub fn with_config(config: Config, config_path: Option<PathBuf>) -> Result<Self> {
        let config = Rc::new(RefCell::new(config));
        let frontend = Frontend::new(config.clone(), TaskPool::new()?);

        let mut registry = ActionRegistry::new();
        let rejected = standard::register(&mut registry, &frontend);
        if rejected > 0 {
            return Err(Error::Msg(format!("{rejected} standard actions were rejected")));
        }
        config.borrow_mut().apply_hotkeys(&mut registry);

        let menu = HeadlessMenu::new();
        let shell = Shell::new(
            registry,
            Box::new(menu.clone()),
            Box::new(ConfigOptions::new(config, config_path.clone())),
            Box::new(ScriptedPrompt::default()),
            Box::new(ScriptedEditor::default()),
        );
        debug!(path = ?config_path, "front end assembled");
        Ok(Self {
            shell,
            menu,
            frontend,
            config_path,
        })
    }

    /// The shell.
    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    /// The state the standard actions act on.
    pub fn frontend(&self) -> &Frontend {
        &self.frontend
    }

    /// Render the menu bar as it would look when opened.
    pub fn menu_text(&mut self) -> Result<String> {
        self.shell.dispatch(UiEvent::MenuOpening)?;
        Ok(self.menu.render())
    }

    /// Open the palette with `query` and return its rows.
    pub fn palette_rows(&mut self, query: &str) -> Result<Vec<PaletteRow>> {
        self.shell.dispatch(UiEvent::OpenPalette)?;
        self.shell.dispatch(UiEvent::PaletteQuery(query.to_string()))?;
        Ok(self.shell.palette().rows().to_vec())
    }

    /// Press (or release, with `up`) the action at `path`, then let core requests finish.
    pub fn invoke(&mut self, path: &str, up: bool) -> Result<()> {
        if !self.shell.registry_mut().invoke(path, up, true) {
            return Err(Error::Msg(format!("no action at {path}")));
        }
        self.settle()
    }

    /// Feed a key transition through the hotkey tracker.
    pub fn key(&mut self, hotkey: Hotkey, up: bool) -> Result<Dispatched> {
        let out = self.shell.dispatch(UiEvent::Key {
            key: hotkey.key,
            modifiers: hotkey.modifiers(),
            up,
        })?;
        self.settle()?;
        Ok(out)
    }

    /// Load `rom` as if picked from the open dialog.
    pub fn open_rom(&mut self, rom: &str) -> Result<()> {
        let notifier = self.shell.registry().notifier();
        standard::open_rom(&self.frontend, &notifier, rom);
        self.shell.registry_mut().flush_notices();
        self.settle()
    }

    /// Bind `hotkey` to `path`, resolving conflicts with `prompt`. Successful bindings are
    /// captured into the config.
    pub fn bind(&mut self, path: &str, hotkey: Hotkey, prompt: &mut dyn ConflictPrompt) -> Outcome {
        let outcome = self
            .shell
            .registry_mut()
            .try_associate_hotkey(path, hotkey, true, prompt);
        if outcome.is_success() {
            self.frontend
                .config
                .borrow_mut()
                .capture_hotkeys(self.shell.registry());
        }
        info!(%path, %hotkey, ?outcome, "bind");
        outcome
    }

    /// Wait for outstanding core requests, then refresh everything that may depend on them.
    ///
    /// Core requests finish off the UI thread and cannot notify the registry themselves.
    pub fn settle(&mut self) -> Result<()> {
        let deadline = Instant::now() + SETTLE_TIMEOUT;
        while self.frontend.tasks.pending_count() > 0 {
            if Instant::now() >= deadline {
                warn!(pending = self.frontend.tasks.pending_count(), "core requests still running");
                break;
            }
            thread::sleep(Duration::from_millis(1));
        }
        let everything = join_segments(&[APP, "*"]);
        let registry = self.shell.registry_mut();
        registry.begin_batch_work();
        registry.notify_enabled_changed(&everything);
        registry.notify_active_changed(&everything);
        registry.end_batch_work();

        let requested = mem::take(&mut self.frontend.ui.borrow_mut().palette_requested);
        if requested {
            self.shell.dispatch(UiEvent::OpenPalette)?;
        }
        Ok(())
    }

    /// Persist hotkeys, recent lists, and options.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.config_path else {
            return Ok(());
        };
        self.frontend.store_recent_lists();
        let mut config = self.frontend.config.borrow_mut();
        config.capture_hotkeys(self.shell.registry());
        save_to_path(&config, path)?;
        Ok(())
    }
}
