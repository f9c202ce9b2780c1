//! Emulator-facing state the standard actions read and mutate.
//!
//! The emulator core itself is out of reach of this front end; [`CoreState`] records what the
//! core has been asked to do. It sits behind a mutex because ROM start/stop requests run on the
//! task pool. Everything else is UI-thread state.

use std::{cell::RefCell, rc::Rc, sync::Arc};

use actions::RecentList;
use config::Config;
use emuview_engine::TaskPool;
use parking_lot::Mutex;

/// Number of save-state slots.
pub const SLOT_COUNT: usize = 10;

/// Slowest and fastest emulation speed, in percent.
pub const SPEED_RANGE: (u32, u32) = (25, 1000);

/// Speed change per step, in percent.
pub const SPEED_STEP: u32 = 25;

/// What the core has been asked to do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoreState {
    /// The loaded ROM.
    pub rom: Option<String>,
    /// Number of resets since the ROM was loaded.
    pub resets: u32,
    /// Which save-state slots hold a state.
    pub saved: [bool; SLOT_COUNT],
}

impl CoreState {
    /// Whether a ROM is running.
    pub fn running(&self) -> bool {
        self.rom.is_some()
    }
}

/// Movie recorder state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MovieState {
    /// No movie.
    #[default]
    Idle,
    /// Recording input.
    Recording,
    /// Playing back.
    Playing,
}

/// UI-thread emulation state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    /// Emulation paused.
    pub paused: bool,
    /// Fast-forward held.
    pub fast_forward: bool,
    /// Emulation speed in percent.
    pub speed: u32,
    /// Frames stepped with frame advance.
    pub frames_advanced: u32,
    /// Frames per multi-frame advance.
    pub multi_frame_count: u32,
    /// Selected save-state slot, one-based.
    pub slot: usize,
    /// Movie recorder state.
    pub movie: MovieState,
    /// Movie read-only mode.
    pub readonly: bool,
    /// Restart playback at the end.
    pub loop_playback: bool,
    /// Pause at the end of playback.
    pub wait_at_movie_end: bool,
    /// Full-screen window.
    pub fullscreen: bool,
    /// Video capture running.
    pub capturing: bool,
    /// Screenshots taken.
    pub screenshots: u32,
    /// The command palette was requested by an action.
    pub palette_requested: bool,
    /// Running Lua script instances.
    pub scripts: Vec<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            paused: false,
            fast_forward: false,
            speed: 100,
            frames_advanced: 0,
            multi_frame_count: 2,
            slot: 1,
            movie: MovieState::Idle,
            readonly: false,
            loop_playback: false,
            wait_at_movie_end: false,
            fullscreen: false,
            capturing: false,
            screenshots: 0,
            palette_requested: false,
            scripts: Vec::new(),
        }
    }
}

/// Shared handles the standard actions capture.
#[derive(Clone)]
pub struct Frontend {
    /// UI-thread state.
    pub ui: Rc<RefCell<UiState>>,
    /// Core requests, shared with pool tasks.
    pub core: Arc<Mutex<CoreState>>,
    /// The settings being edited; persisted by the app.
    pub config: Rc<RefCell<Config>>,
    /// Recent ROMs.
    pub recent_roms: Rc<RefCell<RecentList>>,
    /// Recent movies.
    pub recent_movies: Rc<RefCell<RecentList>>,
    /// Recent scripts.
    pub recent_scripts: Rc<RefCell<RecentList>>,
    /// Worker pool for core requests.
    pub tasks: Rc<TaskPool>,
}

impl Frontend {
    /// Handles over `config`, with recent lists seeded from it.
    pub fn new(config: Rc<RefCell<Config>>, tasks: TaskPool) -> Self {
        let (roms, movies, scripts) = {
            let c = config.borrow();
            (
                c.recent_roms.clone(),
                c.recent_movies.clone(),
                c.recent_scripts.clone(),
            )
        };
        Self {
            ui: Rc::new(RefCell::new(UiState::default())),
            core: Arc::new(Mutex::new(CoreState::default())),
            config,
            recent_roms: Rc::new(RefCell::new(roms)),
            recent_movies: Rc::new(RefCell::new(movies)),
            recent_scripts: Rc::new(RefCell::new(scripts)),
            tasks: Rc::new(tasks),
        }
    }

    /// Copy the recent lists back into the config for saving.
    pub fn store_recent_lists(&self) {
        let mut c = self.config.borrow_mut();
        c.recent_roms = self.recent_roms.borrow().clone();
        c.recent_movies = self.recent_movies.borrow().clone();
        c.recent_scripts = self.recent_scripts.borrow().clone();
    }

    /// Whether a ROM is running.
    pub fn rom_running(&self) -> bool {
        self.core.lock().running()
    }
}
