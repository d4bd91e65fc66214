use crate::document::Document;

/// Maximum number of snapshots kept; the oldest is evicted beyond this.
pub const HISTORY_CAP: usize = 20;

/// Bounded linear undo/redo history of document snapshots.
///
/// Invariants: `0 <= index < entries.len() <= HISTORY_CAP`, and the stack is
/// never empty (it starts with a single empty snapshot).
#[derive(Debug, Clone)]
pub struct HistoryStack {
    entries: Vec<Document>,
    index: usize,
}

impl HistoryStack {
    /// A fresh history containing exactly the given snapshot at index 0.
    pub fn with_initial(snapshot: Document) -> Self {
        Self {
            entries: vec![snapshot],
            index: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// Records a new snapshot.
    ///
    /// Any snapshots beyond the current index (a stale redo branch) are
    /// discarded first. When the cap is exceeded the oldest snapshot is
    /// evicted and the index clamped, which always lands on the new last
    /// entry.
    pub fn push(&mut self, snapshot: Document) {
        self.entries.truncate(self.index + 1);
        self.entries.push(snapshot);
        self.index = self.entries.len() - 1;
        if self.entries.len() > HISTORY_CAP {
            self.entries.remove(0);
            self.index = self.index.min(HISTORY_CAP - 1);
        }
    }

    /// Steps back one snapshot and returns it, or `None` at the boundary.
    /// A boundary call neither panics nor mutates state.
    pub fn undo(&mut self) -> Option<&Document> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        Some(&self.entries[self.index])
    }

    /// Steps forward one snapshot and returns it, or `None` at the boundary.
    pub fn redo(&mut self) -> Option<&Document> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        Some(&self.entries[self.index])
    }

    /// The snapshot the index currently denotes.
    pub fn current(&self) -> &Document {
        &self.entries[self.index]
    }
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::with_initial(Document::new())
    }
}
