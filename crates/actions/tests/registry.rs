use std::{
    cell::RefCell,
    panic::{self, AssertUnwindSafe},
    rc::Rc,
};

use actions::{
    ActionParams, ActionRegistry, Conflict, ConflictChoice, ConflictPolicy, ConflictPrompt,
    Outcome, PathError, RegistryEvent, normalize_filter,
};
use hotkey::{Hotkey, Key, Modifiers};
use proptest::prelude::*;

type Log = Rc<RefCell<Vec<String>>>;

fn logged(log: &Log, path: &str) -> ActionParams {
    let press = log.clone();
    let release = log.clone();
    let p = path.to_string();
    let q = path.to_string();
    ActionParams::new(path)
        .on_press(move || press.borrow_mut().push(format!("press {p}")))
        .on_release(move || release.borrow_mut().push(format!("release {q}")))
}

fn ctrl(c: char) -> Hotkey {
    Hotkey::new(Key(c as i32), Modifiers::new(true, false, false))
}

fn drain(rx: &mut tokio::sync::mpsc::UnboundedReceiver<RegistryEvent>) -> Vec<RegistryEvent> {
    let mut out = Vec::new();
    while let Ok(e) = rx.try_recv() {
        out.push(e);
    }
    out
}

#[test]
fn add_then_filter_contains_path() {
    let mut reg = ActionRegistry::new();
    assert!(reg.add(ActionParams::new(" Mupen64 > Emulation > Pause ")));
    assert!(reg.add(ActionParams::new("Mupen64 > Emulation > Reset")));
    assert!(reg.add(ActionParams::new("Mupen64 > File > Load ROM...")));

    let all = reg.get_actions_matching_filter("*");
    assert!(all.contains(&"Mupen64>Emulation>Pause".to_string()));
    assert_eq!(
        reg.get_actions_matching_filter("Mupen64 > Emulation > *"),
        vec!["Mupen64>Emulation>Pause", "Mupen64>Emulation>Reset"]
    );
    assert_eq!(
        reg.get_actions_matching_filter("Mupen64>File>Load ROM..."),
        vec!["Mupen64>File>Load ROM..."]
    );
    assert!(reg.get_actions_matching_filter("Mupen64>Emulation").is_empty());
    assert!(reg.get_actions_matching_filter("Mupen64>*>Pause").is_empty());
}

#[test]
fn invalid_paths_are_rejected() {
    let mut reg = ActionRegistry::new();
    assert_eq!(reg.try_add(ActionParams::new("  ")), Err(PathError::Empty));
    assert!(matches!(
        reg.try_add(ActionParams::new("A>>B")),
        Err(PathError::EmptySegment { .. })
    ));
    assert!(matches!(
        reg.try_add(ActionParams::new("A>*")),
        Err(PathError::Wildcard { .. })
    ));
    assert!(reg.add(ActionParams::new("A>B")));
    assert!(!reg.add(ActionParams::new("A > B")));
    assert!(!reg.add(ActionParams::new("A>B>C")));
    assert!(!reg.add(ActionParams::new("A")));
    assert_eq!(reg.get_actions_matching_filter("*"), vec!["A>B"]);

    // The rejected add left no namespace behind at A>B.
    assert_eq!(reg.remove("A>B"), vec!["A>B"]);
    assert!(reg.add(ActionParams::new("A>B>C")));
    assert_eq!(reg.get_actions_matching_filter("A>*"), vec!["A>B>C"]);
}

#[test]
fn remove_runs_callbacks_and_prunes() {
    let mut reg = ActionRegistry::new();
    let removed: Log = Rc::default();
    for p in ["A>X", "A>Y", "B>Z"] {
        let r = removed.clone();
        let name = p.to_string();
        reg.add(ActionParams::new(p).on_removed(move || r.borrow_mut().push(name.clone())));
    }
    let mut rx = reg.subscribe();
    assert_eq!(reg.remove("A>*"), vec!["A>X", "A>Y"]);
    assert_eq!(*removed.borrow(), vec!["A>X", "A>Y"]);
    assert_eq!(reg.get_actions_matching_filter("*"), vec!["B>Z"]);
    assert!(reg.outline().iter().all(|n| n.segment != "A"));
    assert_eq!(drain(&mut rx), vec![RegistryEvent::Changed]);

    // Once removed, the callback does not fire again.
    assert!(reg.remove("A>X").is_empty());
    assert_eq!(removed.borrow().len(), 2);
}

#[test]
fn removal_callback_runs_before_the_action_is_gone() {
    let mut reg = ActionRegistry::new();
    assert!(reg.add(ActionParams::new("A>X").on_removed(|| panic!("teardown failed"))));
    let result = panic::catch_unwind(AssertUnwindSafe(|| reg.remove("A>X")));
    assert!(result.is_err());
    assert!(reg.contains("A>X"));
}

#[test]
fn display_names() {
    let mut reg = ActionRegistry::new();
    reg.add(ActionParams::new("Mupen64 > View > Statusbar ---"));
    reg.add(ActionParams::new("Mupen64 > View > Theme").display_name(|| "Theme: Dark".into()));

    assert_eq!(reg.get_display_name("Mupen64>View>Statusbar ---", false), "Statusbar");
    assert_eq!(reg.get_display_name("Mupen64>View>Theme", false), "Theme: Dark");
    assert_eq!(reg.get_display_name("Mupen64>View>Theme", true), "Theme");
    assert_eq!(reg.get_display_name("Mupen64 > View", false), "View");
    assert_eq!(reg.get_display_name("Mupen64>View>*", false), "");
}

#[test]
fn enabled_active_activatable() {
    let mut reg = ActionRegistry::new();
    let paused = Rc::new(RefCell::new(false));
    let p = paused.clone();
    reg.add(ActionParams::new("Pause").active(move || *p.borrow()));
    reg.add(ActionParams::new("Reset").enabled(|| false));

    assert!(reg.get_enabled("Pause"));
    assert!(!reg.get_enabled("Reset"));
    assert!(!reg.get_enabled("Missing"));
    assert!(reg.get_activatability("Pause"));
    assert!(!reg.get_activatability("Reset"));
    assert!(!reg.get_active("Pause"));
    *paused.borrow_mut() = true;
    assert!(reg.get_active("Pause"));
}

#[test]
fn repress_releases_first() {
    let mut reg = ActionRegistry::new();
    let log: Log = Rc::default();
    reg.add(logged(&log, "FF"));

    assert!(reg.invoke("FF", false, true));
    assert!(reg.invoke("FF", false, true));
    assert_eq!(*log.borrow(), vec!["press FF", "release FF", "press FF"]);

    log.borrow_mut().clear();
    reg.invoke("FF", true, true);
    reg.invoke("FF", true, true);
    assert_eq!(*log.borrow(), vec!["release FF"]);
}

#[test]
fn repress_without_release() {
    let mut reg = ActionRegistry::new();
    let log: Log = Rc::default();
    reg.add(logged(&log, "FF"));
    reg.add(logged(&log, "Held").hold_on_repress());

    reg.invoke("FF", false, false);
    reg.invoke("FF", false, false);
    assert_eq!(*log.borrow(), vec!["press FF", "press FF"]);

    log.borrow_mut().clear();
    assert!(!reg.release_on_repress("Held"));
    reg.invoke("Held", false, true);
    reg.invoke("Held", false, true);
    assert_eq!(*log.borrow(), vec!["press Held", "press Held"]);
}

#[test]
fn invoke_unknown_is_false() {
    let mut reg = ActionRegistry::new();
    assert!(!reg.invoke("Nope", false, true));
    assert!(!reg.invoke("*", false, true));
}

#[test]
fn batch_coalesces_notifications() {
    let mut reg = ActionRegistry::new();
    reg.add(ActionParams::new("A>X"));
    reg.add(ActionParams::new("A>Y"));
    let mut rx = reg.subscribe();

    reg.begin_batch_work();
    reg.notify_active_changed("A>X");
    reg.notify_active_changed("A>*");
    reg.add(ActionParams::new("A>Z"));
    reg.remove("A>Z");
    reg.notify_enabled_changed("A>Y");
    assert!(drain(&mut rx).is_empty());
    reg.end_batch_work();

    assert_eq!(
        drain(&mut rx),
        vec![
            RegistryEvent::Changed,
            RegistryEvent::EnabledChanged(vec!["A>Y".into()]),
            RegistryEvent::ActiveChanged(vec!["A>X".into(), "A>Y".into()]),
        ]
    );
}

#[test]
fn notifier_from_callback() {
    let mut reg = ActionRegistry::new();
    let n = reg.notifier();
    reg.add(ActionParams::new("View>Statusbar").active(|| true));
    reg.add(ActionParams::new("View>Toggle").on_press(move || n.active_changed("View>*")));
    let mut rx = reg.subscribe();
    reg.invoke("View>Toggle", false, true);
    assert_eq!(
        drain(&mut rx),
        vec![RegistryEvent::ActiveChanged(vec![
            "View>Statusbar".into(),
            "View>Toggle".into()
        ])]
    );
}

#[test]
fn notify_empty_match_is_silent() {
    let mut reg = ActionRegistry::new();
    let mut rx = reg.subscribe();
    reg.notify_display_name_changed("Nothing>*");
    assert!(drain(&mut rx).is_empty());
}

#[test]
fn hotkey_table_entries_and_defaults() {
    let mut reg = ActionRegistry::new();
    reg.add(ActionParams::new("A"));
    reg.add(ActionParams::new("B").default_hotkey(ctrl('P')));
    reg.add(ActionParams::new("C").default_hotkey(ctrl('P')));

    assert_eq!(reg.hotkey("A"), Some(Hotkey::unassigned()));
    assert_eq!(reg.hotkey("B"), Some(ctrl('P')));
    // The default collides with B's binding, so C stays unbound.
    assert_eq!(reg.hotkey("C"), Some(Hotkey::unassigned()));
}

#[test]
fn associate_respects_overwrite_flag() {
    let mut reg = ActionRegistry::new();
    reg.add(ActionParams::new("A"));
    assert!(reg.associate_hotkey("A", ctrl('P'), false));
    assert!(!reg.associate_hotkey("A", ctrl('Q'), false));
    assert_eq!(reg.hotkey("A"), Some(ctrl('P')));
    assert!(reg.associate_hotkey("A", ctrl('Q'), true));
    assert_eq!(reg.hotkey("A"), Some(ctrl('Q')));
    assert!(!reg.associate_hotkey("Missing", ctrl('Q'), true));
}

#[test]
fn associate_empty_clears() {
    let mut reg = ActionRegistry::new();
    reg.add(ActionParams::new("A").default_hotkey(ctrl('P')));
    assert!(reg.associate_hotkey("A", Hotkey::unassigned(), true));
    let h = reg.hotkey("A").expect("entry");
    assert!(h.is_empty());
    assert!(h.is_assigned());
}

#[test]
fn conflict_without_prompt_cancels() {
    let mut reg = ActionRegistry::new();
    reg.add(ActionParams::new("A").default_hotkey(ctrl('P')));
    reg.add(ActionParams::new("B"));
    assert!(!reg.associate_hotkey("B", ctrl('P'), true));
    assert_eq!(reg.hotkey("B"), Some(Hotkey::unassigned()));
}

struct Recording {
    seen: Rc<RefCell<Vec<Conflict>>>,
    answer: Option<ConflictChoice>,
}

impl ConflictPrompt for Recording {
    fn choose(&mut self, conflict: &Conflict) -> Option<ConflictChoice> {
        self.seen.borrow_mut().push(conflict.clone());
        self.answer
    }
}

#[test]
fn keep_new_clears_others_and_notifies() {
    let mut reg = ActionRegistry::new();
    reg.add(ActionParams::new("A").default_hotkey(ctrl('P')));
    reg.add(ActionParams::new("B"));
    let seen = Rc::new(RefCell::new(Vec::new()));
    reg.set_conflict_prompt(Box::new(Recording {
        seen: seen.clone(),
        answer: Some(ConflictChoice::KeepNew),
    }));
    let mut rx = reg.subscribe();

    assert!(reg.associate_hotkey("B", ctrl('P'), true));
    assert_eq!(seen.borrow()[0].existing, vec!["A"]);
    assert_eq!(reg.hotkey("A"), Some(Hotkey::empty()));
    assert_eq!(reg.hotkey("B"), Some(ctrl('P')));
    assert_eq!(
        drain(&mut rx),
        vec![RegistryEvent::DisplayNameChanged(vec!["A".into(), "B".into()])]
    );
}

#[test]
fn keep_old_clears_the_rebound_action() {
    let mut reg = ActionRegistry::new();
    reg.add(ActionParams::new("A").default_hotkey(ctrl('P')));
    reg.add(ActionParams::new("B"));
    let outcome = reg.try_associate_hotkey("B", ctrl('P'), true, &mut ConflictPolicy::KeepOld);
    assert_eq!(outcome, Outcome::KeptOld);
    assert_eq!(reg.hotkey("A"), Some(ctrl('P')));
    assert_eq!(reg.hotkey("B"), Some(Hotkey::empty()));
}

#[test]
fn proceed_anyway_keeps_both() {
    let mut reg = ActionRegistry::new();
    reg.add(ActionParams::new("A").default_hotkey(ctrl('P')));
    reg.add(ActionParams::new("B"));
    let outcome =
        reg.try_associate_hotkey("B", ctrl('P'), true, &mut ConflictPolicy::ProceedAnyway);
    assert_eq!(outcome, Outcome::ProceededAnyway(vec!["A".into()]));
    assert_eq!(reg.hotkey("A"), Some(ctrl('P')));
    assert_eq!(reg.hotkey("B"), Some(ctrl('P')));
}

#[test]
fn hotkey_lock_flag() {
    let mut reg = ActionRegistry::new();
    assert!(!reg.get_hotkeys_locked());
    reg.lock_hotkeys(true);
    assert!(reg.get_hotkeys_locked());
    reg.lock_hotkeys(false);
    assert!(!reg.get_hotkeys_locked());
}

#[test]
fn set_hotkeys_fills_missing_entries() {
    let mut reg = ActionRegistry::new();
    reg.add(ActionParams::new("A"));
    reg.add(ActionParams::new("B"));
    let mut table = actions::HotkeyTable::new();
    table.insert("A".into(), ctrl('A'));
    table.insert("Gone".into(), ctrl('G'));
    reg.set_hotkeys(table);
    assert_eq!(reg.hotkey("A"), Some(ctrl('A')));
    assert_eq!(reg.hotkey("B"), Some(Hotkey::unassigned()));
    assert_eq!(reg.hotkey("Gone"), Some(ctrl('G')));
}

#[test]
fn clear_removes_everything() {
    let mut reg = ActionRegistry::new();
    let count = Rc::new(RefCell::new(0));
    for p in ["A>X", "B"] {
        let c = count.clone();
        reg.add(ActionParams::new(p).on_removed(move || *c.borrow_mut() += 1));
    }
    reg.clear();
    assert_eq!(*count.borrow(), 2);
    assert!(reg.get_actions_matching_filter("*").is_empty());
}

fn segment() -> impl Strategy<Value = String> {
    "[ ]{0,2}[A-Za-z0-9.]{1,6}( [A-Za-z]{1,4})?[ ]{0,2}"
}

proptest! {
    #[test]
    fn normalize_is_idempotent(segs in prop::collection::vec(segment(), 0..5)) {
        let filter = segs.join(">");
        let once = normalize_filter(&filter);
        prop_assert_eq!(normalize_filter(&once), once.clone());
    }

    #[test]
    fn registered_paths_round_trip(segs in prop::collection::vec(segment(), 1..4)) {
        let mut reg = ActionRegistry::new();
        let path = segs.join(" > ");
        let canonical = reg.try_add(ActionParams::new(path.clone())).expect("valid path");
        prop_assert_eq!(canonical.clone(), normalize_filter(&path));
        prop_assert_eq!(reg.get_actions_matching_filter(&path), vec![canonical]);
    }
}
