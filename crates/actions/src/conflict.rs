//! Hotkey conflict resolution.
//!
//! Resolution is a pure function over the hotkey table: it decides which entries to write and
//! reports what happened, and the caller applies the result. Interactive hosts answer conflicts
//! through a [`ConflictPrompt`]; [`ConflictPolicy`] answers them non-interactively.

use std::collections::BTreeMap;

use hotkey::Hotkey;

/// Canonical action path to hotkey.
pub type HotkeyTable = BTreeMap<String, Hotkey>;

/// The user's answer to a hotkey conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictChoice {
    /// Bind to the new action and clear the hotkey from the others.
    KeepNew,
    /// Leave the existing bindings as they are and clear the new action's hotkey.
    KeepOld,
    /// Bind to the new action and keep the others bound too.
    ProceedAnyway,
}

/// A hotkey about to be bound to `path` while `existing` actions already use it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    /// The action being bound.
    pub path: String,
    /// The contested hotkey.
    pub hotkey: Hotkey,
    /// Actions currently bound to it, in table order.
    pub existing: Vec<String>,
}

impl Conflict {
    /// The question shown to the user.
    pub fn message(&self) -> String {
        let mut out = format!(
            "The key combination {} is already used by:\n\n",
            self.hotkey.to_text()
        );
        for p in &self.existing {
            out.push_str(&format!("- {p}\n"));
        }
        out.push_str("\nHow would you like to proceed?");
        out
    }
}

/// Asks how to resolve a hotkey conflict. `None` cancels the association.
pub trait ConflictPrompt {
    /// Choose a resolution for `conflict`.
    fn choose(&mut self, conflict: &Conflict) -> Option<ConflictChoice>;
}

/// A fixed answer for non-interactive use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Always [`ConflictChoice::KeepNew`].
    KeepNew,
    /// Always [`ConflictChoice::KeepOld`].
    KeepOld,
    /// Always [`ConflictChoice::ProceedAnyway`].
    ProceedAnyway,
    /// Cancel every conflicting association.
    #[default]
    Cancel,
}

impl ConflictPrompt for ConflictPolicy {
    fn choose(&mut self, _conflict: &Conflict) -> Option<ConflictChoice> {
        match self {
            Self::KeepNew => Some(ConflictChoice::KeepNew),
            Self::KeepOld => Some(ConflictChoice::KeepOld),
            Self::ProceedAnyway => Some(ConflictChoice::ProceedAnyway),
            Self::Cancel => None,
        }
    }
}

/// What an association did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The binding was cleared (the new hotkey was empty).
    Cleared,
    /// The action already had exactly this hotkey.
    Unchanged,
    /// Bound with no conflict.
    Bound,
    /// Bound after clearing the listed actions.
    KeptNew(Vec<String>),
    /// The existing bindings were kept and the action's hotkey cleared.
    KeptOld,
    /// Bound while the listed actions keep the same hotkey.
    ProceededAnyway(Vec<String>),
    /// The prompt was dismissed.
    Cancelled,
    /// The path does not name a registered action.
    UnknownAction,
    /// The action already had an assigned binding and overwriting was not requested.
    AlreadyBound,
}

impl Outcome {
    /// Whether the association went through (or was a deliberate no-op).
    pub fn is_success(&self) -> bool {
        !matches!(
            self,
            Self::Cancelled | Self::UnknownAction | Self::AlreadyBound
        )
    }
}

/// The decided result of an association: what happened and which entries to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Summary of the decision.
    pub outcome: Outcome,
    /// Table writes to apply, in order.
    pub assignments: Vec<(String, Hotkey)>,
}

impl Resolution {
    fn nothing(outcome: Outcome) -> Self {
        Self {
            outcome,
            assignments: Vec::new(),
        }
    }

    /// Write the assignments into `table`, returning the paths whose entry changed.
    pub fn apply(&self, table: &mut HotkeyTable) -> Vec<String> {
        let mut changed = Vec::new();
        for (path, hotkey) in &self.assignments {
            if table.get(path) != Some(hotkey) {
                table.insert(path.clone(), *hotkey);
                changed.push(path.clone());
            }
        }
        changed
    }
}

/// Actions other than `path` bound to exactly `hotkey`.
pub fn conflicts_for(table: &HotkeyTable, path: &str, hotkey: &Hotkey) -> Vec<String> {
    table
        .iter()
        .filter(|(p, h)| p.as_str() != path && *h == hotkey)
        .map(|(p, _)| p.clone())
        .collect()
}

/// Decide how binding `hotkey` to `path` plays out against `table`.
pub fn resolve(
    table: &HotkeyTable,
    path: &str,
    hotkey: Hotkey,
    prompt: &mut dyn ConflictPrompt,
) -> Resolution {
    if hotkey.is_empty() {
        return Resolution {
            outcome: Outcome::Cleared,
            assignments: vec![(path.to_string(), Hotkey::empty())],
        };
    }
    if table.get(path) == Some(&hotkey) {
        return Resolution::nothing(Outcome::Unchanged);
    }
    let existing = conflicts_for(table, path, &hotkey);
    if existing.is_empty() {
        return Resolution {
            outcome: Outcome::Bound,
            assignments: vec![(path.to_string(), hotkey)],
        };
    }
    let conflict = Conflict {
        path: path.to_string(),
        hotkey,
        existing,
    };
    match prompt.choose(&conflict) {
        None => Resolution::nothing(Outcome::Cancelled),
        Some(ConflictChoice::KeepOld) => Resolution {
            outcome: Outcome::KeptOld,
            assignments: vec![(path.to_string(), Hotkey::empty())],
        },
        Some(ConflictChoice::KeepNew) => {
            let mut assignments: Vec<(String, Hotkey)> = conflict
                .existing
                .iter()
                .map(|p| (p.clone(), Hotkey::empty()))
                .collect();
            assignments.push((path.to_string(), hotkey));
            Resolution {
                outcome: Outcome::KeptNew(conflict.existing),
                assignments,
            }
        }
        Some(ConflictChoice::ProceedAnyway) => Resolution {
            outcome: Outcome::ProceededAnyway(conflict.existing),
            assignments: vec![(path.to_string(), hotkey)],
        },
    }
}

/// Resolve and apply directly on a table, for callers that do not go through a registry.
pub fn associate(
    table: &mut HotkeyTable,
    path: &str,
    hotkey: Hotkey,
    prompt: &mut dyn ConflictPrompt,
) -> Outcome {
    let resolution = resolve(table, path, hotkey, prompt);
    resolution.apply(table);
    resolution.outcome
}

#[cfg(test)]
mod tests {
    use hotkey::{Key, Modifiers};

    use super::*;

    fn ctrl(c: char) -> Hotkey {
        Hotkey::new(Key(c as i32), Modifiers::new(true, false, false))
    }

    fn table() -> HotkeyTable {
        let mut t = HotkeyTable::new();
        t.insert("A".into(), ctrl('P'));
        t.insert("B".into(), Hotkey::unassigned());
        t.insert("C".into(), ctrl('P'));
        t
    }

    #[test]
    fn empty_hotkey_clears() {
        let mut t = table();
        let out = associate(&mut t, "A", Hotkey::unassigned(), &mut ConflictPolicy::Cancel);
        assert_eq!(out, Outcome::Cleared);
        assert_eq!(t["A"], Hotkey::empty());
    }

    #[test]
    fn same_hotkey_is_unchanged() {
        let r = resolve(&table(), "A", ctrl('P'), &mut ConflictPolicy::Cancel);
        assert_eq!(r.outcome, Outcome::Unchanged);
        assert!(r.assignments.is_empty());
    }

    #[test]
    fn keep_new_clears_every_conflict() {
        let mut t = table();
        let out = associate(&mut t, "B", ctrl('P'), &mut ConflictPolicy::KeepNew);
        assert_eq!(out, Outcome::KeptNew(vec!["A".into(), "C".into()]));
        assert_eq!(t["A"], Hotkey::empty());
        assert_eq!(t["C"], Hotkey::empty());
        assert_eq!(t["B"], ctrl('P'));
    }

    #[test]
    fn keep_old_clears_the_new_path() {
        let mut t = table();
        let out = associate(&mut t, "B", ctrl('P'), &mut ConflictPolicy::KeepOld);
        assert_eq!(out, Outcome::KeptOld);
        assert_eq!(t["B"], Hotkey::empty());
        assert_eq!(t["A"], ctrl('P'));
        assert_eq!(t["C"], ctrl('P'));
    }

    #[test]
    fn cancel_changes_nothing() {
        let mut t = table();
        let out = associate(&mut t, "B", ctrl('P'), &mut ConflictPolicy::Cancel);
        assert!(!out.is_success());
        assert_eq!(t, table());
    }

    #[test]
    fn proceed_anyway_shares_the_hotkey() {
        let mut t = table();
        let out = associate(&mut t, "B", ctrl('P'), &mut ConflictPolicy::ProceedAnyway);
        assert_eq!(out, Outcome::ProceededAnyway(vec!["A".into(), "C".into()]));
        assert_eq!(conflicts_for(&t, "", &ctrl('P')).len(), 3);
    }

    #[test]
    fn unassigned_same_key_is_not_a_conflict() {
        let mut t = HotkeyTable::new();
        let mut stale = ctrl('Q');
        stale.assigned = false;
        t.insert("A".into(), stale);
        let r = resolve(&t, "B", ctrl('Q'), &mut ConflictPolicy::Cancel);
        assert_eq!(r.outcome, Outcome::Bound);
    }

    #[test]
    fn message_lists_conflicts() {
        let c = Conflict {
            path: "B".into(),
            hotkey: ctrl('P'),
            existing: vec!["A".into()],
        };
        let msg = c.message();
        assert!(msg.contains("Ctrl P"));
        assert!(msg.contains("- A\n"));
    }
}
