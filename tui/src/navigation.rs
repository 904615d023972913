//! Which view is current, and the history that back/forward walk.

use srcview_protocol::HistoryEntry;
use srcview_protocol::ViewState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavigationMode {
    /// Record a history entry for the new view.
    Push,
    /// Show the new view without touching history.
    Replace,
}

#[derive(Debug, Default)]
pub struct NavigationState {
    entries: Vec<HistoryEntry>,
    /// Index of the entry the user is at. Meaningful only when `entries` is
    /// not empty.
    cursor: usize,
    current: Option<ViewState>,
}

impl NavigationState {
    pub fn current(&self) -> Option<&ViewState> {
        self.current.as_ref()
    }

    pub fn current_entry(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.cursor)
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn navigate(&mut self, view: ViewState, mode: NavigationMode) {
        if mode == NavigationMode::Push {
            self.push_entry(HistoryEntry::for_view(&view));
        }
        self.current = Some(view);
    }

    /// Record a history entry that has no view behind it, as after a failed
    /// request.
    pub fn push_placeholder(&mut self, url: impl Into<String>) {
        self.push_entry(HistoryEntry::placeholder(url));
    }

    fn push_entry(&mut self, entry: HistoryEntry) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push(entry);
        self.cursor = self.entries.len() - 1;
    }

    pub fn can_go_back(&self) -> bool {
        !self.entries.is_empty() && self.cursor > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn back(&mut self) -> Option<&ViewState> {
        if !self.can_go_back() {
            return None;
        }
        self.cursor -= 1;
        self.restore(self.entries[self.cursor].clone());
        self.current()
    }

    pub fn forward(&mut self) -> Option<&ViewState> {
        if !self.can_go_forward() {
            return None;
        }
        self.cursor += 1;
        self.restore(self.entries[self.cursor].clone());
        self.current()
    }

    /// Show a recorded view again without requesting anything.
    pub fn restore(&mut self, entry: HistoryEntry) {
        let view = match entry.state {
            Some(view) => view,
            None => ViewState::error(format!("Nothing was loaded for {}", entry.url)),
        };
        self.current = Some(view);
    }
}
