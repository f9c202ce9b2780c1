use std::{cell::RefCell, mem, rc::Rc};

use tokio::sync::mpsc;

/// Change notifications delivered to registry subscribers.
///
/// Path lists hold canonical action paths (filters are expanded before delivery).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// Actions were added or removed; the tree shape may differ.
    Changed,
    /// The display names of these actions may differ.
    DisplayNameChanged(Vec<String>),
    /// The enabled state of these actions may differ.
    EnabledChanged(Vec<String>),
    /// The active state of these actions may differ.
    ActiveChanged(Vec<String>),
}

/// Notifications accumulated while a batch is open.
#[derive(Debug, Default)]
pub(crate) struct Pending {
    changed: bool,
    display_names: Vec<String>,
    enabled: Vec<String>,
    active: Vec<String>,
}

fn extend_unique(into: &mut Vec<String>, paths: Vec<String>) {
    for p in paths {
        if !into.contains(&p) {
            into.push(p);
        }
    }
}

impl Pending {
    pub(crate) fn record(&mut self, event: RegistryEvent) {
        match event {
            RegistryEvent::Changed => self.changed = true,
            RegistryEvent::DisplayNameChanged(p) => extend_unique(&mut self.display_names, p),
            RegistryEvent::EnabledChanged(p) => extend_unique(&mut self.enabled, p),
            RegistryEvent::ActiveChanged(p) => extend_unique(&mut self.active, p),
        }
    }

    /// One event per kind that saw activity, in a fixed order.
    pub(crate) fn into_events(self) -> Vec<RegistryEvent> {
        let mut out = Vec::new();
        if self.changed {
            out.push(RegistryEvent::Changed);
        }
        if !self.display_names.is_empty() {
            out.push(RegistryEvent::DisplayNameChanged(self.display_names));
        }
        if !self.enabled.is_empty() {
            out.push(RegistryEvent::EnabledChanged(self.enabled));
        }
        if !self.active.is_empty() {
            out.push(RegistryEvent::ActiveChanged(self.active));
        }
        out
    }
}

/// Subscriber fan-out. Closed receivers are dropped on the next send.
#[derive(Debug, Default)]
pub(crate) struct Subscribers {
    senders: Vec<mpsc::UnboundedSender<RegistryEvent>>,
}

impl Subscribers {
    pub(crate) fn subscribe(&mut self) -> mpsc::UnboundedReceiver<RegistryEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.senders.push(tx);
        rx
    }

    pub(crate) fn send(&mut self, event: &RegistryEvent) {
        self.senders.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

/// A deferred notification request queued through a [`Notifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Notice {
    DisplayName(String),
    Enabled(String),
    Active(String),
}

/// Cloneable handle for requesting notifications from inside action callbacks.
///
/// Callbacks run while the registry is borrowed, so they cannot call `notify_*` directly.
/// Requests queued here are expanded and delivered once the current invocation returns (or on
/// [`ActionRegistry::flush_notices`](crate::ActionRegistry::flush_notices)).
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    queue: Rc<RefCell<Vec<Notice>>>,
}

impl Notifier {
    /// Display names under `filter` may have changed.
    pub fn display_name_changed(&self, filter: &str) {
        self.queue
            .borrow_mut()
            .push(Notice::DisplayName(filter.to_string()));
    }

    /// Enabled states under `filter` may have changed.
    pub fn enabled_changed(&self, filter: &str) {
        self.queue
            .borrow_mut()
            .push(Notice::Enabled(filter.to_string()));
    }

    /// Active states under `filter` may have changed.
    pub fn active_changed(&self, filter: &str) {
        self.queue
            .borrow_mut()
            .push(Notice::Active(filter.to_string()));
    }

    pub(crate) fn take(&self) -> Vec<Notice> {
        mem::take(&mut *self.queue.borrow_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_coalesces_per_kind() {
        let mut p = Pending::default();
        p.record(RegistryEvent::ActiveChanged(vec!["A".into()]));
        p.record(RegistryEvent::Changed);
        p.record(RegistryEvent::ActiveChanged(vec!["A".into(), "B".into()]));
        p.record(RegistryEvent::Changed);
        assert_eq!(
            p.into_events(),
            vec![
                RegistryEvent::Changed,
                RegistryEvent::ActiveChanged(vec!["A".into(), "B".into()]),
            ]
        );
    }

    #[test]
    fn closed_subscribers_are_dropped() {
        let mut subs = Subscribers::default();
        let mut keep = subs.subscribe();
        drop(subs.subscribe());
        subs.send(&RegistryEvent::Changed);
        assert_eq!(subs.senders.len(), 1);
        assert_eq!(keep.try_recv().ok(), Some(RegistryEvent::Changed));
    }
}
