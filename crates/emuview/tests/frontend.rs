use actions::{ConflictPolicy, Outcome, normalize_filter, recent};
use config::Config;
use emuview::{
    App,
    standard::paths::{
        CLOSE_ROM, FAST_FORWARD, LOAD_ROM, PAUSE, RECENT_ROMS, SPEED_RESET, SPEED_UP,
    },
    state::MovieState,
};
use emuview_engine::{Dispatched, RowKind};
use hotkey::{Hotkey, Key};

fn app() -> App {
    App::with_config(Config::default(), None).expect("app")
}

fn hk(spec: &str) -> Hotkey {
    Hotkey::parse(spec).expect("hotkey spec")
}

#[test]
fn standard_actions_register_with_default_hotkeys() {
    let app = app();
    let reg = app.shell().registry();
    assert!(reg.contains(LOAD_ROM));
    assert_eq!(reg.hotkey(LOAD_ROM), Some(hk("ctrl+o")));
    assert_eq!(reg.hotkey(PAUSE), Some(hk("pause")));
    assert!(!reg.get_enabled(CLOSE_ROM));
    assert!(reg.get_activatability(FAST_FORWARD));
    assert!(!reg.release_on_repress(FAST_FORWARD));
    assert_eq!(
        app.frontend().config.borrow().initial_hotkey(LOAD_ROM),
        hk("ctrl+o")
    );
}

#[test]
fn menu_bar_lists_sections_and_disables_idle_items() {
    let mut app = app();
    let text = app.menu_text().expect("menu");
    let top: Vec<&str> = text.lines().filter(|l| !l.starts_with(' ')).collect();
    assert_eq!(
        top,
        ["File", "Emulation", "Options", "Movie", "Utilities", "Help", "Lua Script"]
    );
    assert!(text.contains("  Load ROM...  <Ctrl O>\n"));
    assert!(text.contains("  Close ROM  <Ctrl W>  (disabled)\n"));
    assert!(text.contains("  Reset Speed (100%)  <Ctrl =+>\n"));
}

#[test]
fn opening_a_rom_enables_rom_actions_and_records_recent() {
    let mut app = app();
    app.open_rom("mario.z64").expect("open");
    let reg = app.shell().registry();
    assert!(app.frontend().rom_running());
    assert!(reg.get_enabled(CLOSE_ROM));
    let first = recent::slot_path(RECENT_ROMS, 0);
    assert_eq!(reg.get_display_name(&first, false), "mario.z64");
    assert!(reg.get_enabled(&first));
    assert!(!reg.get_enabled(&recent::slot_path(RECENT_ROMS, 1)));

    let text = app.menu_text().expect("menu");
    assert!(text.contains("  Close ROM  <Ctrl W>\n"));

    app.invoke(CLOSE_ROM, false).expect("close");
    assert!(!app.frontend().rom_running());
    assert!(!app.shell().registry().get_enabled(CLOSE_ROM));
}

#[test]
fn fast_forward_holds_across_repeated_presses() {
    let mut app = app();
    let tab = Hotkey::key(Key::TAB);
    for _ in 0..3 {
        app.key(tab, false).expect("press");
        assert!(app.frontend().ui.borrow().fast_forward);
    }
    assert!(app.shell().registry().get_active(FAST_FORWARD));
    app.key(tab, true).expect("release");
    assert!(!app.frontend().ui.borrow().fast_forward);
}

#[test]
fn speed_changes_show_in_reset_label() {
    let mut app = app();
    app.invoke(SPEED_UP, false).expect("speed up");
    assert_eq!(app.frontend().ui.borrow().speed, 125);
    assert_eq!(
        app.shell().registry().get_display_name(SPEED_RESET, false),
        "Reset Speed (125%)"
    );
    assert_eq!(
        app.shell().registry().get_display_name(SPEED_RESET, true),
        "Reset Speed"
    );
}

#[test]
fn slot_selection_is_exclusive_and_gates_loading() {
    let mut app = app();
    app.open_rom("zelda.z64").expect("open");

    let out = app.key(Hotkey::key(Key(i32::from(b'3'))), false).expect("select");
    assert!(matches!(out, Dispatched::Invoked(ref p) if p.len() == 1));
    let reg = app.shell().registry();
    assert!(reg.get_active("Mupen64 > Emulation > Current State Slot > Slot 3"));
    assert!(!reg.get_active("Mupen64 > Emulation > Current State Slot > Slot 1"));

    let load_current = "Mupen64 > Emulation > Load State > Load Current Slot";
    assert!(!reg.get_enabled(load_current));
    app.key(Hotkey::key(Key(i32::from(b'I'))), false).expect("save");
    assert!(app.shell().registry().get_enabled(load_current));
    assert!(app.shell().registry().get_enabled("Mupen64 > Emulation > Load State > Load Slot 3"));
    assert!(!app.shell().registry().get_enabled("Mupen64 > Emulation > Load State > Load Slot 2"));
}

#[test]
fn palette_hotkey_opens_palette_and_locks_hotkeys() {
    let mut app = app();
    app.key(hk("ctrl+p"), false).expect("press");
    assert!(app.shell().palette().is_open());
    assert!(app.shell().registry().get_hotkeys_locked());

    // Keys now drive the palette, not actions.
    app.key(Hotkey::key(Key::TAB), false).expect("tab");
    assert!(!app.frontend().ui.borrow().fast_forward);

    app.key(Hotkey::key(Key::ESCAPE), false).expect("escape");
    assert!(!app.shell().palette().is_open());
    assert!(!app.shell().registry().get_hotkeys_locked());
}

#[test]
fn palette_rows_group_actions_under_headers() {
    let mut app = app();
    let rows = app.palette_rows("pause").expect("palette");
    assert!(rows.iter().any(|r| r.kind == RowKind::Group && r.text == "Mupen64 > Emulation"));
    let pause = rows
        .iter()
        .find(|r| matches!(&r.kind, RowKind::Action { path } if *path == normalize_filter(PAUSE)))
        .expect("pause row");
    assert!(pause.activatable);
    assert!(!pause.enabled);
}

#[test]
fn binding_resolves_conflicts_and_is_captured() {
    let mut app = app();
    let ctrl_o = hk("ctrl+o");

    assert_eq!(
        app.bind(PAUSE, ctrl_o, &mut ConflictPolicy::Cancel),
        Outcome::Cancelled
    );
    assert_eq!(app.shell().registry().hotkey(PAUSE), Some(hk("pause")));

    let outcome = app.bind(PAUSE, ctrl_o, &mut ConflictPolicy::KeepNew);
    assert_eq!(outcome, Outcome::KeptNew(vec![normalize_filter(LOAD_ROM)]));
    let reg = app.shell().registry();
    assert_eq!(reg.hotkey(PAUSE), Some(ctrl_o));
    assert!(reg.hotkey(LOAD_ROM).is_some_and(|h| h.is_empty()));

    let config = app.frontend().config.borrow();
    assert_eq!(config.hotkeys.get(&normalize_filter(PAUSE)), Some(&ctrl_o));
    assert_eq!(config.initial_hotkey(PAUSE), hk("pause"));
}

#[test]
fn movie_playback_needs_a_running_rom() {
    let app = app();
    let notifier = app.shell().registry().notifier();
    assert!(!emuview::standard::play_movie(app.frontend(), &notifier, "run.m64"));
    assert_eq!(app.frontend().ui.borrow().movie, MovieState::Idle);
}
