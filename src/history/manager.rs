use crate::history::snapshot::Snapshot;

/// Bounded undo/redo stack with a cursor.
///
/// `pointer` names the entry matching the live state (`None` while empty). Committing drops any
/// entries after the pointer, so a new edit abandons the redo branch. When the stack outgrows its
/// capacity the oldest entry is evicted and the pointer shifts with it.
#[derive(Clone, Debug)]
pub struct History {
    stack: Vec<Snapshot>,
    pointer: Option<usize>,
    capacity: usize,
}

impl History {
    /// Empty history retaining at most `capacity` snapshots (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            stack: Vec::new(),
            pointer: None,
            capacity: capacity.max(1),
        }
    }

    /// Maximum retained snapshots.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Retained snapshots.
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Whether nothing has been committed.
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Cursor position.
    pub fn pointer(&self) -> Option<usize> {
        self.pointer
    }

    /// Snapshot at the cursor.
    pub fn current(&self) -> Option<&Snapshot> {
        self.pointer.and_then(|p| self.stack.get(p))
    }

    /// Whether [`History::undo`] would move.
    pub fn can_undo(&self) -> bool {
        self.pointer.is_some_and(|p| p > 0)
    }

    /// Whether [`History::redo`] would move.
    pub fn can_redo(&self) -> bool {
        self.pointer.is_some_and(|p| p + 1 < self.stack.len())
    }

    /// Record `snapshot` after the cursor.
    ///
    /// A snapshot equal to the one at the cursor is ignored. Returns whether it was recorded.
    pub fn commit(&mut self, snapshot: Snapshot) -> bool {
        if self.current().is_some_and(|cur| cur.same_state(&snapshot)) {
            return false;
        }
        self.discard_redo();
        self.stack.push(snapshot);
        self.pointer = Some(self.stack.len() - 1);

        if self.stack.len() > self.capacity {
            let excess = self.stack.len() - self.capacity;
            self.stack.drain(..excess);
            self.pointer = Some(self.stack.len() - 1);
        }
        true
    }

    /// Drop every entry after the cursor.
    pub fn discard_redo(&mut self) {
        let keep = self.pointer.map_or(0, |p| p + 1);
        self.stack.truncate(keep);
    }

    /// Step back; returns the snapshot to restore.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        let p = self.pointer.filter(|&p| p > 0)?;
        self.pointer = Some(p - 1);
        self.stack.get(p - 1)
    }

    /// Step forward; returns the snapshot to restore.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        let p = self.pointer.filter(|&p| p + 1 < self.stack.len())?;
        self.pointer = Some(p + 1);
        self.stack.get(p + 1)
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.stack.clear();
        self.pointer = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/history/manager.rs"]
mod tests;
