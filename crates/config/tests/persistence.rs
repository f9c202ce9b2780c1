use std::{
    env, fs,
    path::PathBuf,
    process,
    time::{SystemTime, UNIX_EPOCH},
};

use actions::{ActionParams, ActionRegistry};
use config::{Config, Error, load_from_path, resolve_config_path, save_to_path};
use hotkey::Hotkey;

fn unique_tmp_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time")
        .as_nanos();
    let mut dir = env::temp_dir();
    dir.push(format!("emuview-{name}-{}-{nanos}", process::id()));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

#[test]
fn missing_file_is_default() {
    let dir = unique_tmp_dir("missing");
    let cfg = load_from_path(&dir.join("nope.ron")).expect("default");
    assert_eq!(cfg, Config::default());
}

#[test]
fn save_then_load_keeps_bindings_and_recents() {
    let dir = unique_tmp_dir("save");
    let path = dir.join("nested").join("config.ron");

    let mut reg = ActionRegistry::new();
    reg.add(ActionParams::new("Mupen64 > Emulation > Pause").default_hotkey(
        Hotkey::parse("pause").expect("hotkey"),
    ));
    let mut cfg = Config::default();
    cfg.apply_hotkeys(&mut reg);
    cfg.recent_roms.items.push("/roms/sm64.z64".into());
    cfg.recent_movies.frozen = true;
    save_to_path(&cfg, &path).expect("save");

    let back = load_from_path(&path).expect("load");
    assert_eq!(back, cfg);
    assert_eq!(
        back.hotkeys["Mupen64>Emulation>Pause"].to_text(),
        "Pause"
    );
}

#[test]
fn malformed_file_reports_path() {
    let dir = unique_tmp_dir("bad");
    let path = dir.join("config.ron");
    fs::write(&path, "(statusbar: maybe)").expect("write");
    let err = load_from_path(&path).expect_err("malformed");
    assert!(matches!(err, Error::Parse { .. }));
    assert!(err.pretty().contains("config.ron"));
}

#[test]
fn explicit_path_wins() {
    let explicit = PathBuf::from("/etc/emuview.ron");
    assert_eq!(resolve_config_path(Some(&explicit)), explicit);
    assert!(resolve_config_path(None).ends_with(".emuview/config.ron"));
}
