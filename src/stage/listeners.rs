use std::collections::BTreeMap;

use crate::foundation::core::PanelId;

/// Host hook a mounted panel holds on to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListenerKind {
    /// Scroll position feed driving the timeline.
    ScrollBinding,
    /// Per-frame callback running refreshes and reconciliation.
    FrameCallback,
    /// Viewport resize notification.
    Resize,
}

impl ListenerKind {
    /// Everything a panel acquires on mount.
    pub const PER_PANEL: [ListenerKind; 3] = [
        ListenerKind::ScrollBinding,
        ListenerKind::FrameCallback,
        ListenerKind::Resize,
    ];
}

/// Receipt for one acquired listener. Must be handed back to
/// [`ListenerRegistry::release`].
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a listener handle that is never released leaks"]
pub struct ListenerHandle {
    id: u64,
    kind: ListenerKind,
}

impl ListenerHandle {
    /// Listener kind.
    pub fn kind(&self) -> ListenerKind {
        self.kind
    }
}

/// Every live host listener, keyed by handle.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    live: BTreeMap<u64, (PanelId, ListenerKind)>,
    next: u64,
}

impl ListenerRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener owned by `panel`.
    pub fn acquire(&mut self, panel: &PanelId, kind: ListenerKind) -> ListenerHandle {
        let id = self.next;
        self.next += 1;
        self.live.insert(id, (panel.clone(), kind));
        ListenerHandle { id, kind }
    }

    /// Register one of each [`ListenerKind::PER_PANEL`].
    pub fn acquire_panel(&mut self, panel: &PanelId) -> Vec<ListenerHandle> {
        ListenerKind::PER_PANEL
            .iter()
            .map(|&k| self.acquire(panel, k))
            .collect()
    }

    /// Remove a listener. Returns `false` if it was already gone.
    pub fn release(&mut self, handle: ListenerHandle) -> bool {
        self.live.remove(&handle.id).is_some()
    }

    /// Whether `panel` currently listens for `kind`.
    pub fn is_listening(&self, panel: &PanelId, kind: ListenerKind) -> bool {
        self.live.values().any(|(p, k)| p == panel && *k == kind)
    }

    /// Live listeners across all panels.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// No live listeners.
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Live listeners owned by `panel`.
    pub fn count_for(&self, panel: &PanelId) -> usize {
        self.live.values().filter(|(p, _)| p == panel).count()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stage/listeners.rs"]
mod tests;
