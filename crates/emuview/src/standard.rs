//! The standard application actions under the `Mupen64` root.
//!
//! Actions that would open a native dialog or a plugin window only log the request: this front
//! end has no windows. Requests that reach the emulator core (start, close, reset) go through
//! the task pool with de-duplication keys so repeated presses do not pile up.

use std::{cell::RefCell, rc::Rc};

use actions::{
    ActionParams, ActionRegistry, Notifier, RecentList, join_segments,
    recent::{self, push_recent},
};
use hotkey::{Hotkey, Key, Modifiers};
use tracing::{debug, info, warn};

use crate::state::{CoreState, Frontend, MovieState, SLOT_COUNT, SPEED_RANGE, SPEED_STEP, UiState};

/// De-duplication key for close requests.
pub const ASYNC_KEY_CLOSE_ROM: u64 = 1;
/// De-duplication key for start requests.
pub const ASYNC_KEY_START_ROM: u64 = 2;
/// De-duplication key for reset requests.
pub const ASYNC_KEY_RESET_ROM: u64 = 3;
/// De-duplication key for movie playback requests.
pub const ASYNC_KEY_PLAY_MOVIE: u64 = 4;

/// Root namespace of every standard action.
pub const APP: &str = "Mupen64";

/// Standard action paths.
pub mod paths {
    #![allow(missing_docs)]

    pub const LOAD_ROM: &str = "Mupen64 > File > Load ROM...";
    pub const CLOSE_ROM: &str = "Mupen64 > File > Close ROM";
    pub const RESET_ROM: &str = "Mupen64 > File > Reset ROM";
    pub const REFRESH_ROM_LIST: &str = "Mupen64 > File > Refresh ROM List ---";
    pub const RECENT_ROMS: &str = "Mupen64 > File > Recent ROMs ---";
    pub const EXIT: &str = "Mupen64 > File > Exit";

    pub const PAUSE: &str = "Mupen64 > Emulation > Pause";
    pub const SPEED_DOWN: &str = "Mupen64 > Emulation > Speed Down";
    pub const SPEED_UP: &str = "Mupen64 > Emulation > Speed Up";
    pub const SPEED_RESET: &str = "Mupen64 > Emulation > Reset Speed";
    pub const FAST_FORWARD: &str = "Mupen64 > Emulation > Fast-Forward";
    pub const GS_BUTTON: &str = "Mupen64 > Emulation > GS Button ---";
    pub const FRAME_ADVANCE: &str = "Mupen64 > Emulation > Frame Advance";
    pub const MULTI_FRAME_ADVANCE: &str = "Mupen64 > Emulation > Multi-Frame Advance";
    pub const MULTI_FRAME_ADVANCE_INCREMENT: &str = "Mupen64 > Emulation > Multi-Frame Advance +1";
    pub const MULTI_FRAME_ADVANCE_DECREMENT: &str = "Mupen64 > Emulation > Multi-Frame Advance -1";
    pub const MULTI_FRAME_ADVANCE_RESET: &str = "Mupen64 > Emulation > Multi-Frame Advance Reset ---";
    pub const SAVE_STATE: &str = "Mupen64 > Emulation > Save State";
    pub const SAVE_CURRENT_SLOT: &str = "Mupen64 > Emulation > Save State > Save Current Slot";
    pub const SAVE_STATE_FILE: &str = "Mupen64 > Emulation > Save State > Save as File... ---";
    pub const LOAD_STATE: &str = "Mupen64 > Emulation > Load State";
    pub const LOAD_CURRENT_SLOT: &str = "Mupen64 > Emulation > Load State > Load Current Slot";
    pub const LOAD_STATE_FILE: &str = "Mupen64 > Emulation > Load State > Load from File... ---";
    pub const SELECT_SLOT: &str = "Mupen64 > Emulation > Current State Slot";
    pub const UNDO_LOAD_STATE: &str = "Mupen64 > Emulation > Undo Load State";

    pub const FULL_SCREEN: &str = "Mupen64 > Options > Full Screen ---";
    pub const PLUGIN_SETTINGS: &str = "Mupen64 > Options > Plugin Settings ---";
    pub const STATUSBAR: &str = "Mupen64 > Options > Statusbar ---";
    pub const SETTINGS: &str = "Mupen64 > Options > Settings";

    pub const START_MOVIE_RECORDING: &str = "Mupen64 > Movie > Start Movie Recording";
    pub const START_MOVIE_PLAYBACK: &str = "Mupen64 > Movie > Start Movie Playback";
    pub const CONTINUE_MOVIE_RECORDING: &str = "Mupen64 > Movie > Continue Movie Recording ---";
    pub const STOP_MOVIE: &str = "Mupen64 > Movie > Stop Movie";
    pub const CREATE_MOVIE_BACKUP: &str = "Mupen64 > Movie > Create Movie Backup ---";
    pub const RECENT_MOVIES: &str = "Mupen64 > Movie > Recent Movies ---";
    pub const LOOP_MOVIE_PLAYBACK: &str = "Mupen64 > Movie > Loop Movie Playback";
    pub const READONLY: &str = "Mupen64 > Movie > Read-Only";
    pub const WAIT_AT_MOVIE_END: &str = "Mupen64 > Movie > Wait at Movie End";

    pub const COMMAND_PALETTE: &str = "Mupen64 > Utilities > Command Palette ---";
    pub const PIANO_ROLL: &str = "Mupen64 > Utilities > Piano Roll";
    pub const CHEATS: &str = "Mupen64 > Utilities > Cheats";
    pub const SEEK_TO: &str = "Mupen64 > Utilities > Seek...";
    pub const USAGE_STATISTICS: &str = "Mupen64 > Utilities > Usage Statistics ---";
    pub const CORE_INFORMATION: &str = "Mupen64 > Utilities > Core Information";
    pub const DEBUGGER: &str = "Mupen64 > Utilities > Debugger";
    pub const START_TRACE_LOGGER: &str = "Mupen64 > Utilities > Start Trace Logger...";
    pub const STOP_TRACE_LOGGER: &str = "Mupen64 > Utilities > Stop Trace Logger ---";
    pub const VIDEO_CAPTURE_START: &str = "Mupen64 > Utilities > Video Capture > Start Capture...";
    pub const VIDEO_CAPTURE_START_PRESET: &str =
        "Mupen64 > Utilities > Video Capture > Start Capture from Preset... ---";
    pub const VIDEO_CAPTURE_STOP: &str = "Mupen64 > Utilities > Video Capture > Stop Capture ---";
    pub const SCREENSHOT: &str = "Mupen64 > Utilities > Video Capture > Take Screenshot";

    pub const CHECK_FOR_UPDATES: &str = "Mupen64 > Help > Check for Updates";
    pub const ABOUT: &str = "Mupen64 > Help > About";

    pub const SHOW_INSTANCES: &str = "Mupen64 > Lua Script > Show Instances ---";
    pub const RECENT_SCRIPTS: &str = "Mupen64 > Lua Script > Recent Scripts ---";
    pub const CLOSE_ALL: &str = "Mupen64 > Lua Script > Close All";
}

use paths::*;

/// Letter or digit key.
fn ch(c: u8) -> Key {
    Key(i32::from(c.to_ascii_uppercase()))
}

/// `key` with Ctrl.
fn ctrl(key: Key) -> Hotkey {
    Hotkey::new(key, Modifiers::new(true, false, false))
}

/// `key` with Ctrl+Shift.
fn ctrl_shift(key: Key) -> Hotkey {
    Hotkey::new(key, Modifiers::new(true, true, false))
}

/// `key` with Shift.
fn shift(key: Key) -> Hotkey {
    Hotkey::new(key, Modifiers::new(false, true, false))
}

/// `key` with Alt.
fn alt(key: Key) -> Hotkey {
    Hotkey::new(key, Modifiers::new(false, false, true))
}

/// Function key `n` (one-based).
fn f(n: usize) -> Key {
    Key(Key::F1.code() + i32::try_from(n).unwrap_or(1) - 1)
}

/// Digit key for slot `n` (one-based); slot 10 is `0`.
fn slot_digit(n: usize) -> Key {
    ch(b'0' + u8::try_from(n % 10).unwrap_or(0))
}

/// `prefix > *`.
fn below(prefix: &str) -> String {
    join_segments(&[prefix, "*"])
}

/// Registration bookkeeping: counts rejected paths.
struct Registrar<'a> {
    /// Target registry.
    registry: &'a mut ActionRegistry,
    /// Rejected registrations.
    rejected: usize,
}

impl Registrar<'_> {
    /// Register one action.
    fn add(&mut self, params: ActionParams) {
        if !self.registry.add(params) {
            self.rejected += 1;
        }
    }
}

/// An action whose only effect is logging that a window or dialog was requested.
fn request(path: &str, what: &'static str) -> ActionParams {
    ActionParams::new(path).on_press(move || info!(what, "window requested; not available headless"))
}

/// A UI flag toggled on press and shown as a check mark.
fn ui_toggle(fe: &Frontend, notifier: &Notifier, path: &str, field: fn(&mut UiState) -> &mut bool) -> ActionParams {
    let (read, write) = (fe.ui.clone(), fe.ui.clone());
    let notifier = notifier.clone();
    let filter = path.to_string();
    ActionParams::new(path)
        .active(move || *field(&mut read.borrow_mut()))
        .on_press(move || {
            let mut ui = write.borrow_mut();
            let flag = field(&mut ui);
            *flag = !*flag;
            debug!(path = %filter, on = *flag, "toggled");
            notifier.active_changed(&filter);
        })
}

/// Record `value` in a recent list unless it is frozen.
fn remember(list: &Rc<RefCell<RecentList>>, value: &str) -> bool {
    let mut list = list.borrow_mut();
    let frozen = list.frozen;
    push_recent(&mut list.items, value, frozen)
}

/// Ask the core to load `rom`, recording it in the recent list.
pub fn open_rom(fe: &Frontend, notifier: &Notifier, rom: &str) -> bool {
    if remember(&fe.recent_roms, rom) {
        notifier.display_name_changed(&below(RECENT_ROMS));
        notifier.enabled_changed(&below(RECENT_ROMS));
    }
    let core = fe.core.clone();
    let rom = rom.to_string();
    fe.tasks.submit(
        move || {
            let mut c = core.lock();
            info!(%rom, "starting rom");
            *c = CoreState {
                rom: Some(rom),
                ..CoreState::default()
            };
        },
        ASYNC_KEY_START_ROM,
    )
}

/// Ask the core to stop the running ROM.
fn close_rom(fe: &Frontend) {
    let core = fe.core.clone();
    fe.tasks.submit(
        move || {
            let mut c = core.lock();
            if let Some(rom) = c.rom.take() {
                info!(%rom, "rom closed");
            }
        },
        ASYNC_KEY_CLOSE_ROM,
    );
}

/// Start playing `movie`, recording it in the recent list.
pub fn play_movie(fe: &Frontend, notifier: &Notifier, movie: &str) -> bool {
    if !fe.rom_running() {
        warn!(%movie, "cannot play a movie without a running rom");
        return false;
    }
    if remember(&fe.recent_movies, movie) {
        notifier.display_name_changed(&below(RECENT_MOVIES));
        notifier.enabled_changed(&below(RECENT_MOVIES));
    }
    fe.ui.borrow_mut().movie = MovieState::Playing;
    notifier.enabled_changed(&below("Mupen64 > Movie"));
    let movie = movie.to_string();
    fe.tasks.submit(move || info!(%movie, "movie playback started"), ASYNC_KEY_PLAY_MOVIE)
}

/// Start `script`, recording it in the recent list.
pub fn run_script(fe: &Frontend, notifier: &Notifier, script: &str) {
    if remember(&fe.recent_scripts, script) {
        notifier.display_name_changed(&below(RECENT_SCRIPTS));
        notifier.enabled_changed(&below(RECENT_SCRIPTS));
    }
    fe.ui.borrow_mut().scripts.push(script.to_string());
    notifier.enabled_changed(CLOSE_ALL);
    info!(%script, "script started");
}

/// Register every standard action. Returns the number of rejected registrations.
pub fn register(registry: &mut ActionRegistry, fe: &Frontend) -> usize {
    let notifier = registry.notifier();
    registry.begin_batch_work();
    let mut r = Registrar { registry, rejected: 0 };

    register_file(&mut r, fe, &notifier);
    register_emulation(&mut r, fe, &notifier);
    register_states(&mut r, fe, &notifier);
    register_options(&mut r, fe, &notifier);
    register_movie(&mut r, fe, &notifier);
    register_utilities(&mut r, fe, &notifier);
    register_scripts(&mut r, fe, &notifier);

    let rejected = r.rejected;
    registry.end_batch_work();
    if rejected > 0 {
        warn!(rejected, "some standard actions were rejected");
    }
    rejected
}

/// Whether a ROM is running, as an enabled predicate.
fn when_running(fe: &Frontend) -> impl Fn() -> bool + 'static {
    let core = fe.core.clone();
    move || core.lock().running()
}

/// A recent menu under `menu`, opening items through `open`.
fn recent_menu(r: &mut Registrar<'_>, menu: &str, list: &Rc<RefCell<RecentList>>, open: Rc<dyn Fn(&str)>) {
    if !recent::register_recent_menu(r.registry, menu, list.clone(), open) {
        r.rejected += 1;
    }
}

/// `File` menu.
fn register_file(r: &mut Registrar<'_>, fe: &Frontend, notifier: &Notifier) {
    r.add(request(LOAD_ROM, "open rom dialog").default_hotkey(ctrl(ch(b'o'))));

    let close_fe = fe.clone();
    r.add(
        ActionParams::new(CLOSE_ROM)
            .enabled(when_running(fe))
            .on_press(move || close_rom(&close_fe))
            .default_hotkey(ctrl(ch(b'w'))),
    );

    let (core, tasks) = (fe.core.clone(), fe.tasks.clone());
    r.add(
        ActionParams::new(RESET_ROM)
            .enabled(when_running(fe))
            .on_press(move || {
                let core = core.clone();
                tasks.submit(
                    move || {
                        let mut c = core.lock();
                        c.resets += 1;
                        info!(resets = c.resets, "rom reset");
                    },
                    ASYNC_KEY_RESET_ROM,
                );
            })
            .default_hotkey(ctrl(ch(b'r'))),
    );
    r.add(ActionParams::new(REFRESH_ROM_LIST).on_press(|| info!("rom list refreshed")));

    let (open_fe, open_notifier) = (fe.clone(), notifier.clone());
    recent_menu(
        r,
        RECENT_ROMS,
        &fe.recent_roms,
        Rc::new(move |rom: &str| {
            open_rom(&open_fe, &open_notifier, rom);
        }),
    );
    r.add(ActionParams::new(EXIT).on_press(|| info!("exit requested")));
}

/// `Emulation` menu, minus save states.
fn register_emulation(r: &mut Registrar<'_>, fe: &Frontend, notifier: &Notifier) {
    r.add(
        ui_toggle(fe, notifier, PAUSE, |ui| &mut ui.paused)
            .enabled(when_running(fe))
            .default_hotkey(Hotkey::key(Key::PAUSE)),
    );

    let speed_names = below("Mupen64 > Emulation");
    for (path, delta, hotkey) in [
        (SPEED_DOWN, -1, Hotkey::key(Key::OEM_MINUS)),
        (SPEED_UP, 1, Hotkey::key(Key::OEM_PLUS)),
        (SPEED_RESET, 0, ctrl(Key::OEM_PLUS)),
    ] {
        let (ui, name_ui) = (fe.ui.clone(), fe.ui.clone());
        let notifier = notifier.clone();
        let names = speed_names.clone();
        let mut params = ActionParams::new(path)
            .on_press(move || {
                let mut ui = ui.borrow_mut();
                ui.speed = match delta {
                    0 => 100,
                    d if d < 0 => ui.speed.saturating_sub(SPEED_STEP).max(SPEED_RANGE.0),
                    _ => (ui.speed + SPEED_STEP).min(SPEED_RANGE.1),
                };
                info!(speed = ui.speed, "speed changed");
                notifier.display_name_changed(&names);
            })
            .default_hotkey(hotkey);
        if delta == 0 {
            params = params.display_name(move || format!("Reset Speed ({}%)", name_ui.borrow().speed));
        }
        r.add(params);
    }

    let (down, up) = (fe.ui.clone(), fe.ui.clone());
    let (down_n, up_n) = (notifier.clone(), notifier.clone());
    let active = fe.ui.clone();
    r.add(
        ActionParams::new(FAST_FORWARD)
            .active(move || active.borrow().fast_forward)
            .on_press(move || {
                down.borrow_mut().fast_forward = true;
                down_n.active_changed(FAST_FORWARD);
            })
            .on_release(move || {
                up.borrow_mut().fast_forward = false;
                up_n.active_changed(FAST_FORWARD);
            })
            .hold_on_repress()
            .default_hotkey(Hotkey::key(Key::TAB)),
    );
    r.add(
        ActionParams::new(GS_BUTTON)
            .enabled(when_running(fe))
            .on_press(|| debug!("gs button down"))
            .on_release(|| debug!("gs button up")),
    );

    let ui = fe.ui.clone();
    r.add(
        ActionParams::new(FRAME_ADVANCE)
            .enabled(when_running(fe))
            .on_press(move || {
                let mut ui = ui.borrow_mut();
                ui.paused = true;
                ui.frames_advanced += 1;
            })
            .default_hotkey(Hotkey::key(Key::OEM_5)),
    );
    let (ui, name_ui) = (fe.ui.clone(), fe.ui.clone());
    r.add(
        ActionParams::new(MULTI_FRAME_ADVANCE)
            .enabled(when_running(fe))
            .display_name(move || format!("Multi-Frame Advance ({})", name_ui.borrow().multi_frame_count))
            .on_press(move || {
                let mut ui = ui.borrow_mut();
                ui.paused = true;
                ui.frames_advanced += ui.multi_frame_count;
            }),
    );
    for (path, change) in [
        (MULTI_FRAME_ADVANCE_INCREMENT, 1_i32),
        (MULTI_FRAME_ADVANCE_DECREMENT, -1),
        (MULTI_FRAME_ADVANCE_RESET, 0),
    ] {
        let ui = fe.ui.clone();
        let notifier = notifier.clone();
        r.add(ActionParams::new(path).on_press(move || {
            let mut ui = ui.borrow_mut();
            ui.multi_frame_count = match change {
                0 => 2,
                c if c < 0 => ui.multi_frame_count.saturating_sub(1).max(1),
                _ => ui.multi_frame_count + 1,
            };
            notifier.display_name_changed(MULTI_FRAME_ADVANCE);
        }));
    }
}

/// Save and load state items, plus slot selection.
fn register_states(r: &mut Registrar<'_>, fe: &Frontend, notifier: &Notifier) {
    let loads = below(LOAD_STATE);
    let slots = below(SELECT_SLOT);

    let (ui, core, n) = (fe.ui.clone(), fe.core.clone(), notifier.clone());
    let loads_filter = loads.clone();
    r.add(
        ActionParams::new(SAVE_CURRENT_SLOT)
            .enabled(when_running(fe))
            .on_press(move || {
                let slot = ui.borrow().slot;
                core.lock().saved[slot - 1] = true;
                info!(slot, "state saved");
                n.enabled_changed(&loads_filter);
            })
            .default_hotkey(Hotkey::key(ch(b'i'))),
    );
    r.add(request(SAVE_STATE_FILE, "save state dialog").enabled(when_running(fe)));

    let (ui, core, enabled_ui, enabled_core) = (fe.ui.clone(), fe.core.clone(), fe.ui.clone(), fe.core.clone());
    r.add(
        ActionParams::new(LOAD_CURRENT_SLOT)
            .enabled(move || enabled_core.lock().saved[enabled_ui.borrow().slot - 1])
            .on_press(move || {
                let slot = ui.borrow().slot;
                info!(slot, saved = core.lock().saved[slot - 1], "state loaded");
            })
            .default_hotkey(Hotkey::key(ch(b'p'))),
    );
    r.add(request(LOAD_STATE_FILE, "load state dialog").enabled(when_running(fe)));

    for n in 1..=SLOT_COUNT {
        let (core, notify) = (fe.core.clone(), notifier.clone());
        let loads_filter = loads.clone();
        r.add(
            ActionParams::new(join_segments(&[SAVE_STATE.to_string(), format!("Save Slot {n}")]))
                .enabled(when_running(fe))
                .on_press(move || {
                    core.lock().saved[n - 1] = true;
                    info!(slot = n, "state saved");
                    notify.enabled_changed(&loads_filter);
                })
                .default_hotkey(shift(f(n))),
        );

        let (core, enabled_core) = (fe.core.clone(), fe.core.clone());
        r.add(
            ActionParams::new(join_segments(&[LOAD_STATE.to_string(), format!("Load Slot {n}")]))
                .enabled(move || enabled_core.lock().saved[n - 1])
                .on_press(move || info!(slot = n, saved = core.lock().saved[n - 1], "state loaded"))
                .default_hotkey(Hotkey::key(f(n))),
        );

        let (ui, active_ui, notify) = (fe.ui.clone(), fe.ui.clone(), notifier.clone());
        let (slots_filter, loads_filter) = (slots.clone(), loads.clone());
        r.add(
            ActionParams::new(join_segments(&[SELECT_SLOT.to_string(), format!("Slot {n}")]))
                .active(move || active_ui.borrow().slot == n)
                .on_press(move || {
                    ui.borrow_mut().slot = n;
                    debug!(slot = n, "slot selected");
                    notify.active_changed(&slots_filter);
                    notify.enabled_changed(&loads_filter);
                })
                .default_hotkey(Hotkey::key(slot_digit(n))),
        );
    }
    r.add(ActionParams::new(UNDO_LOAD_STATE).enabled(when_running(fe)).on_press(|| info!("load undone")));
}

/// `Options` menu.
fn register_options(r: &mut Registrar<'_>, fe: &Frontend, notifier: &Notifier) {
    r.add(ui_toggle(fe, notifier, FULL_SCREEN, |ui| &mut ui.fullscreen).default_hotkey(alt(Key::RETURN)));
    for (name, what) in [
        ("Video Settings", "video plugin settings"),
        ("Audio Settings", "audio plugin settings"),
        ("Input Settings", "input plugin settings"),
        ("RSP Settings", "rsp plugin settings"),
    ] {
        r.add(request(&join_segments(&[PLUGIN_SETTINGS, name]), what));
    }

    let (config, active) = (fe.config.clone(), fe.config.clone());
    let notifier = notifier.clone();
    r.add(
        ActionParams::new(STATUSBAR)
            .active(move || active.borrow().statusbar)
            .on_press(move || {
                let mut c = config.borrow_mut();
                c.statusbar = !c.statusbar;
                notifier.active_changed(STATUSBAR);
            })
            .default_hotkey(alt(ch(b's'))),
    );
    r.add(request(SETTINGS, "settings dialog").default_hotkey(ctrl(ch(b's'))));
}

/// `Movie` menu.
fn register_movie(r: &mut Registrar<'_>, fe: &Frontend, notifier: &Notifier) {
    let movie_items = below("Mupen64 > Movie");
    let idle_and_running = |fe: &Frontend| {
        let (ui, core) = (fe.ui.clone(), fe.core.clone());
        move || core.lock().running() && ui.borrow().movie == MovieState::Idle
    };

    let (ui, n, items) = (fe.ui.clone(), notifier.clone(), movie_items.clone());
    r.add(
        ActionParams::new(START_MOVIE_RECORDING)
            .enabled(idle_and_running(fe))
            .on_press(move || {
                ui.borrow_mut().movie = MovieState::Recording;
                info!("movie recording started");
                n.enabled_changed(&items);
            })
            .default_hotkey(ctrl_shift(ch(b'r'))),
    );
    r.add(
        request(START_MOVIE_PLAYBACK, "movie playback dialog")
            .enabled(idle_and_running(fe))
            .default_hotkey(ctrl_shift(ch(b'p'))),
    );
    r.add(request(CONTINUE_MOVIE_RECORDING, "continue recording dialog").enabled(idle_and_running(fe)));

    let (ui, enabled_ui, n, items) = (fe.ui.clone(), fe.ui.clone(), notifier.clone(), movie_items);
    r.add(
        ActionParams::new(STOP_MOVIE)
            .enabled(move || enabled_ui.borrow().movie != MovieState::Idle)
            .on_press(move || {
                ui.borrow_mut().movie = MovieState::Idle;
                info!("movie stopped");
                n.enabled_changed(&items);
            })
            .default_hotkey(ctrl_shift(ch(b's'))),
    );
    let enabled_ui = fe.ui.clone();
    r.add(
        ActionParams::new(CREATE_MOVIE_BACKUP)
            .enabled(move || enabled_ui.borrow().movie == MovieState::Recording)
            .on_press(|| info!("movie backup created")),
    );

    let (open_fe, open_notifier) = (fe.clone(), notifier.clone());
    recent_menu(
        r,
        RECENT_MOVIES,
        &fe.recent_movies,
        Rc::new(move |movie: &str| {
            play_movie(&open_fe, &open_notifier, movie);
        }),
    );
    r.add(ui_toggle(fe, notifier, LOOP_MOVIE_PLAYBACK, |ui| &mut ui.loop_playback));
    r.add(ui_toggle(fe, notifier, READONLY, |ui| &mut ui.readonly).default_hotkey(shift(ch(b'r'))));
    r.add(ui_toggle(fe, notifier, WAIT_AT_MOVIE_END, |ui| &mut ui.wait_at_movie_end));
}

/// `Utilities` and `Help` menus.
fn register_utilities(r: &mut Registrar<'_>, fe: &Frontend, notifier: &Notifier) {
    let ui = fe.ui.clone();
    r.add(
        ActionParams::new(COMMAND_PALETTE)
            .on_press(move || ui.borrow_mut().palette_requested = true)
            .default_hotkey(ctrl(ch(b'p'))),
    );
    r.add(request(PIANO_ROLL, "piano roll").enabled(when_running(fe)));
    r.add(request(CHEATS, "cheats"));
    r.add(request(SEEK_TO, "seek dialog").enabled(when_running(fe)));
    r.add(request(USAGE_STATISTICS, "usage statistics"));
    r.add(request(CORE_INFORMATION, "core information"));
    r.add(request(DEBUGGER, "debugger").enabled(when_running(fe)));
    r.add(request(START_TRACE_LOGGER, "trace logger dialog").enabled(when_running(fe)));
    r.add(request(STOP_TRACE_LOGGER, "trace logger").enabled(when_running(fe)));

    let capture_items = below("Mupen64 > Utilities > Video Capture");
    for (path, start) in [(VIDEO_CAPTURE_START, true), (VIDEO_CAPTURE_START_PRESET, true), (VIDEO_CAPTURE_STOP, false)] {
        let (ui, enabled_ui, core) = (fe.ui.clone(), fe.ui.clone(), fe.core.clone());
        let (n, items) = (notifier.clone(), capture_items.clone());
        r.add(
            ActionParams::new(path)
                .enabled(move || enabled_ui.borrow().capturing != start && (!start || core.lock().running()))
                .on_press(move || {
                    ui.borrow_mut().capturing = start;
                    info!(capturing = start, "video capture");
                    n.enabled_changed(&items);
                }),
        );
    }
    let ui = fe.ui.clone();
    r.add(
        ActionParams::new(SCREENSHOT)
            .enabled(when_running(fe))
            .on_press(move || {
                let mut ui = ui.borrow_mut();
                ui.screenshots += 1;
                info!(count = ui.screenshots, "screenshot taken");
            })
            .default_hotkey(Hotkey::key(f(12))),
    );

    r.add(request(CHECK_FOR_UPDATES, "update check"));
    r.add(request(ABOUT, "about dialog"));
}

/// `Lua Script` menu.
fn register_scripts(r: &mut Registrar<'_>, fe: &Frontend, notifier: &Notifier) {
    r.add(request(SHOW_INSTANCES, "script instances").default_hotkey(ctrl(ch(b'n'))));

    let (open_fe, open_notifier) = (fe.clone(), notifier.clone());
    recent_menu(
        r,
        RECENT_SCRIPTS,
        &fe.recent_scripts,
        Rc::new(move |script: &str| run_script(&open_fe, &open_notifier, script)),
    );

    let (ui, enabled_ui, n) = (fe.ui.clone(), fe.ui.clone(), notifier.clone());
    r.add(
        ActionParams::new(CLOSE_ALL)
            .enabled(move || !enabled_ui.borrow().scripts.is_empty())
            .on_press(move || {
                let closed = ui.borrow_mut().scripts.drain(..).count();
                info!(closed, "scripts closed");
                n.enabled_changed(CLOSE_ALL);
            }),
    );
}
