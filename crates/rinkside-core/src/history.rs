//! Bounded undo/redo history over whole-state snapshots.
//!
//! The history is a single list of snapshots plus a cursor. Entries at or
//! before the cursor are undoable; entries after it are redoable. Undo and
//! redo exchange the live state with the slot they move across, so the slot
//! always holds "the other side" of that step and no separate redo stack is
//! needed.

/// Default number of snapshots retained.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Snapshot history with a cursor.
///
/// Invariant: `cursor` is `None` or `< entries.len()`, and
/// `entries.len() <= capacity`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History<T> {
    entries: Vec<T>,
    cursor: Option<usize>,
    capacity: usize,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl<T> History<T> {
    /// Create an empty history keeping at most `capacity` snapshots
    /// (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: None,
            capacity: capacity.max(1),
        }
    }

    /// Record the pre-mutation state.
    ///
    /// Anything redoable is discarded. When the list exceeds capacity the
    /// oldest entries are evicted.
    pub fn push(&mut self, snapshot: T) {
        let keep = self.cursor.map_or(0, |c| c.saturating_add(1));
        self.entries.truncate(keep);
        self.entries.push(snapshot);
        let overflow = self.entries.len().saturating_sub(self.capacity);
        if overflow > 0 {
            self.entries.drain(..overflow);
        }
        self.cursor = self.entries.len().checked_sub(1);
    }

    /// Step back one entry, exchanging it with `live`.
    ///
    /// Returns `false` (and leaves `live` untouched) when nothing can be
    /// undone.
    pub fn undo(&mut self, live: &mut T) -> bool {
        let Some(cursor) = self.cursor else {
            return false;
        };
        let Some(slot) = self.entries.get_mut(cursor) else {
            return false;
        };
        std::mem::swap(slot, live);
        self.cursor = cursor.checked_sub(1);
        true
    }

    /// Step forward one entry, exchanging it with `live`.
    ///
    /// Returns `false` when nothing can be redone.
    pub fn redo(&mut self, live: &mut T) -> bool {
        let next = self.cursor.map_or(0, |c| c.saturating_add(1));
        let Some(slot) = self.entries.get_mut(next) else {
            return false;
        };
        std::mem::swap(slot, live);
        self.cursor = Some(next);
        true
    }

    /// Whether [`undo`](Self::undo) would do anything.
    pub const fn can_undo(&self) -> bool {
        self.cursor.is_some()
    }

    /// Whether [`redo`](Self::redo) would do anything.
    pub fn can_redo(&self) -> bool {
        let next = self.cursor.map_or(0, |c| c.saturating_add(1));
        next < self.entries.len()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }

    /// Number of stored snapshots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no snapshots are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of stored snapshots.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Stored snapshots, oldest first.
    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    /// Cursor in the persisted encoding: `-1` when nothing can be undone.
    pub fn index(&self) -> i64 {
        self.cursor
            .and_then(|c| i64::try_from(c).ok())
            .unwrap_or(-1)
    }

    /// Rebuild from persisted parts.
    ///
    /// Entries beyond capacity are dropped from the front and the index is
    /// clamped into range, so a hand-edited document cannot break the
    /// cursor invariant.
    pub fn restore(&mut self, mut entries: Vec<T>, index: i64) {
        let overflow = entries.len().saturating_sub(self.capacity);
        if overflow > 0 {
            entries.drain(..overflow);
        }
        let index = index.saturating_sub(i64::try_from(overflow).unwrap_or(i64::MAX));
        self.cursor = usize::try_from(index)
            .ok()
            .and_then(|i| entries.len().checked_sub(1).map(|last| i.min(last)));
        self.entries = entries;
    }
}

impl<T: Clone> History<T> {
    /// Clone the stored snapshots (for persistence).
    pub fn to_vec(&self) -> Vec<T> {
        self.entries.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_history_has_nothing_to_do() {
        let mut history: History<u32> = History::default();
        let mut live = 7;
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(!history.undo(&mut live));
        assert!(!history.redo(&mut live));
        assert_eq!(live, 7);
        assert_eq!(history.index(), -1);
    }

    #[test]
    fn undo_then_redo_restores_both_sides() {
        let mut history = History::default();
        let mut live = 0;
        history.push(live);
        live = 1;

        assert!(history.undo(&mut live));
        assert_eq!(live, 0);
        assert!(history.can_redo());

        assert!(history.redo(&mut live));
        assert_eq!(live, 1);
        assert!(!history.can_redo());
        assert!(history.can_undo());
    }

    #[test]
    fn multi_step_undo_redo_walks_in_order() {
        let mut history = History::default();
        let mut live = 0;
        for next in 1..=3 {
            history.push(live);
            live = next;
        }
        assert!(history.undo(&mut live));
        assert_eq!(live, 2);
        assert!(history.undo(&mut live));
        assert_eq!(live, 1);
        assert!(history.redo(&mut live));
        assert_eq!(live, 2);
        assert!(history.redo(&mut live));
        assert_eq!(live, 3);
    }

    #[test]
    fn push_after_undo_discards_redo_branch() {
        let mut history = History::default();
        let mut live = 0;
        history.push(live);
        live = 1;
        history.push(live);
        live = 2;

        assert!(history.undo(&mut live));
        assert_eq!(live, 1);
        history.push(live);
        live = 10;

        assert!(!history.can_redo());
        assert_eq!(history.len(), 2);
        assert!(history.undo(&mut live));
        assert_eq!(live, 1);
        assert!(history.undo(&mut live));
        assert_eq!(live, 0);
    }

    #[test]
    fn capacity_evicts_oldest_first() {
        let mut history = History::new(50);
        for i in 0..60_u32 {
            history.push(i);
        }
        assert_eq!(history.len(), 50);
        assert_eq!(history.entries().first().copied(), Some(10));
        assert_eq!(history.entries().last().copied(), Some(59));
        assert_eq!(history.index(), 49);
    }

    #[test]
    fn restore_clamps_out_of_range_index() {
        let mut history: History<u32> = History::new(3);
        history.restore(vec![1, 2], 9);
        assert_eq!(history.index(), 1);

        history.restore(vec![1, 2], -1);
        assert!(!history.can_undo());
        assert!(history.can_redo());

        history.restore(vec![1, 2, 3, 4, 5], 4);
        assert_eq!(history.entries(), &[3, 4, 5]);
        assert_eq!(history.index(), 2);
    }
}
