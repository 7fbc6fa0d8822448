//! Linear undo/redo over full document snapshots.

use crate::document::Document;

/// Snapshot history with a step pointer.
///
/// The snapshot at `step` always equals the last committed document.
/// Committing after an undo discards the redo tail.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Document>,
    step: usize,
    /// Maximum number of snapshots kept. Zero means unbounded.
    max_len: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(Document::default(), 0)
    }
}

impl History {
    /// Start a history whose first snapshot is `initial`.
    pub fn new(initial: Document, max_len: usize) -> Self {
        Self {
            snapshots: vec![initial],
            step: 0,
            max_len,
        }
    }

    /// Record a new snapshot after the current step.
    pub fn commit(&mut self, document: Document) {
        self.snapshots.truncate(self.step + 1);
        self.snapshots.push(document);
        if self.max_len > 0 && self.snapshots.len() > self.max_len {
            let excess = self.snapshots.len() - self.max_len;
            self.snapshots.drain(..excess);
        }
        self.step = self.snapshots.len() - 1;
        log::debug!("History commit, step {} of {}", self.step, self.snapshots.len());
    }

    /// Step back. Returns the snapshot now current.
    pub fn undo(&mut self) -> Option<&Document> {
        if !self.can_undo() {
            return None;
        }
        self.step -= 1;
        self.snapshots.get(self.step)
    }

    /// Step forward. Returns the snapshot now current.
    pub fn redo(&mut self) -> Option<&Document> {
        if !self.can_redo() {
            return None;
        }
        self.step += 1;
        self.snapshots.get(self.step)
    }

    pub fn can_undo(&self) -> bool {
        self.step > 0
    }

    pub fn can_redo(&self) -> bool {
        self.step + 1 < self.snapshots.len()
    }

    /// The snapshot at the step pointer.
    pub fn current(&self) -> Option<&Document> {
        self.snapshots.get(self.step)
    }

    /// Number of snapshots, including the initial one.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn step(&self) -> usize {
        self.step
    }
}
