//! Most-recently-used item lists and the menus that expose them.

use std::{cell::RefCell, path::Path, rc::Rc};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ActionParams, ActionRegistry, path::join_segments};

/// Most items a recent list keeps.
pub const MAX_RECENT_ITEMS: usize = 6;

/// A persisted recent list plus its freeze flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecentList {
    /// Most recent first.
    pub items: Vec<String>,
    /// A frozen list ignores additions.
    pub frozen: bool,
}

/// Two entries name the same item when they are equal ignoring case or as paths.
fn same_item(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase() || Path::new(a) == Path::new(b)
}

/// Move or insert `value` at the front of `items`, capping the length.
///
/// Returns false (leaving `items` untouched) when `frozen`.
pub fn push_recent(items: &mut Vec<String>, value: &str, frozen: bool) -> bool {
    if frozen {
        return false;
    }
    items.retain(|existing| !same_item(existing, value));
    items.insert(0, value.to_string());
    items.truncate(MAX_RECENT_ITEMS);
    true
}

/// Record `value` in a recent list and refresh the display names under `menu_path`.
pub fn add(
    registry: &mut ActionRegistry,
    menu_path: &str,
    items: &mut Vec<String>,
    value: &str,
    frozen: bool,
) {
    if !push_recent(items, value, frozen) {
        return;
    }
    debug!(menu = %menu_path, %value, "recent item added");
    registry.notify_display_name_changed(&join_segments(&[menu_path, "*"]));
}

/// Path of the `index`th (zero-based) slot action under `menu_path`.
pub fn slot_path(menu_path: &str, index: usize) -> String {
    join_segments(&[menu_path.to_string(), slot_segment(index)])
}

fn slot_segment(index: usize) -> String {
    let seg = format!("Load Recent Item #{}", index + 1);
    if index + 1 == MAX_RECENT_ITEMS {
        format!("{seg} ---")
    } else {
        seg
    }
}

/// Register the slot, freeze, and clear actions backing a recent menu.
///
/// Slot names track the list contents; empty slots are disabled. `on_open` receives the item of
/// an invoked slot. Returns false if any registration was rejected.
pub fn register_recent_menu(
    registry: &mut ActionRegistry,
    menu_path: &str,
    list: Rc<RefCell<RecentList>>,
    on_open: Rc<dyn Fn(&str)>,
) -> bool {
    let notifier = registry.notifier();
    let wildcard = join_segments(&[menu_path, "*"]);
    let mut ok = true;

    for index in 0..MAX_RECENT_ITEMS {
        let name_list = list.clone();
        let enabled_list = list.clone();
        let press_list = list.clone();
        let open = on_open.clone();
        ok &= registry.add(
            ActionParams::new(slot_path(menu_path, index))
                .display_name(move || {
                    name_list
                        .borrow()
                        .items
                        .get(index)
                        .cloned()
                        .unwrap_or_else(|| "(nothing)".to_string())
                })
                .enabled(move || index < enabled_list.borrow().items.len())
                .on_press(move || {
                    let item = press_list.borrow().items.get(index).cloned();
                    if let Some(item) = item {
                        open(&item);
                    }
                }),
        );
    }

    let freeze_list = list.clone();
    let active_list = list.clone();
    let freeze_notifier = notifier.clone();
    let freeze_path = join_segments(&[menu_path, "Freeze"]);
    let freeze_filter = freeze_path.clone();
    ok &= registry.add(
        ActionParams::new(freeze_path)
            .active(move || active_list.borrow().frozen)
            .on_press(move || {
                let mut l = freeze_list.borrow_mut();
                l.frozen = !l.frozen;
                freeze_notifier.active_changed(&freeze_filter);
            }),
    );

    let clear_list = list;
    ok &= registry.add(
        ActionParams::new(join_segments(&[menu_path, "Clear"])).on_press(move || {
            clear_list.borrow_mut().items.clear();
            notifier.display_name_changed(&wildcard);
            notifier.enabled_changed(&wildcard);
        }),
    );
    ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RegistryEvent;

    #[test]
    fn push_dedups_and_caps() {
        let mut items = Vec::new();
        for i in 0..8 {
            assert!(push_recent(&mut items, &format!("rom{i}.z64"), false));
        }
        assert_eq!(items.len(), MAX_RECENT_ITEMS);
        assert_eq!(items[0], "rom7.z64");

        push_recent(&mut items, "ROM4.Z64", false);
        assert_eq!(items[0], "ROM4.Z64");
        assert_eq!(items.len(), MAX_RECENT_ITEMS);
        assert_eq!(
            items.iter().filter(|i| i.eq_ignore_ascii_case("rom4.z64")).count(),
            1
        );
    }

    #[test]
    fn frozen_list_is_untouched() {
        let mut items = vec!["a".to_string()];
        assert!(!push_recent(&mut items, "b", true));
        assert_eq!(items, vec!["a"]);
    }

    #[test]
    fn add_notifies_menu_names() {
        let mut reg = ActionRegistry::new();
        let list = Rc::new(RefCell::new(RecentList::default()));
        assert!(register_recent_menu(
            &mut reg,
            "Mupen64 > File > Recent ROMs",
            list.clone(),
            Rc::new(|_: &str| {})
        ));
        let mut rx = reg.subscribe();
        let mut items = list.borrow().items.clone();
        add(&mut reg, "Mupen64 > File > Recent ROMs", &mut items, "a.z64", false);
        list.borrow_mut().items = items;

        let Ok(RegistryEvent::DisplayNameChanged(paths)) = rx.try_recv() else {
            panic!("expected display name notification");
        };
        assert_eq!(paths.len(), MAX_RECENT_ITEMS + 2);
        assert_eq!(
            reg.get_display_name(&slot_path("Mupen64>File>Recent ROMs", 0), false),
            "a.z64"
        );
        assert!(reg.get_enabled(&slot_path("Mupen64>File>Recent ROMs", 0)));
        assert!(!reg.get_enabled(&slot_path("Mupen64>File>Recent ROMs", 1)));
    }

    #[test]
    fn slots_open_freeze_and_clear() {
        let mut reg = ActionRegistry::new();
        let list = Rc::new(RefCell::new(RecentList {
            items: vec!["x.m64".into(), "y.m64".into()],
            frozen: false,
        }));
        let opened = Rc::new(RefCell::new(Vec::<String>::new()));
        let sink = opened.clone();
        register_recent_menu(
            &mut reg,
            "Movies",
            list.clone(),
            Rc::new(move |item: &str| sink.borrow_mut().push(item.to_string())),
        );

        reg.invoke(&slot_path("Movies", 1), false, true);
        assert_eq!(*opened.borrow(), vec!["y.m64"]);

        assert!(!reg.get_active("Movies>Freeze"));
        reg.invoke("Movies>Freeze", false, true);
        assert!(reg.get_active("Movies>Freeze"));

        let mut rx = reg.subscribe();
        reg.invoke("Movies>Clear", false, true);
        assert!(list.borrow().items.is_empty());
        assert!(matches!(
            rx.try_recv(),
            Ok(RegistryEvent::DisplayNameChanged(_))
        ));
        assert!(matches!(rx.try_recv(), Ok(RegistryEvent::EnabledChanged(_))));
        assert_eq!(reg.get_display_name(&slot_path("Movies", 0), false), "(nothing)");
    }
}
