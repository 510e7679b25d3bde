//! Stack-pair undo/redo bookkeeping.
//!
//! A [`HistoryEntry`] pairs the action list that *undoes* a committed change
//! (`actions`) with the list that *redoes* it (`last`). The manager owns two
//! stacks and only moves entries between them; it never dispatches anything
//! itself -- the dispatcher pops an entry, replays the appropriate list, and
//! hands the entry back. This keeps the manager an owned value with no global
//! state, so every test builds a fresh one.

use std::time::SystemTime;

use crate::action::Action;

// ---------------------------------------------------------------------------
// HistoryEntry
// ---------------------------------------------------------------------------

/// One undoable step.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    /// Actions that undo the committed change.
    pub actions: Vec<Action>,
    /// Actions that redo it.
    pub last: Vec<Action>,
    /// When the entry was pushed.
    pub date: SystemTime,
}

impl HistoryEntry {
    /// The entry that lands on the opposite stack after this one is replayed:
    /// the same pair with the roles swapped.
    fn swapped(self) -> Self {
        Self {
            actions: self.last,
            last: self.actions,
            date: self.date,
        }
    }
}

// ---------------------------------------------------------------------------
// HistoryManager
// ---------------------------------------------------------------------------

/// The pair of undo (`previous`) and redo (`next`) stacks.
#[derive(Debug, Default)]
pub struct HistoryManager {
    previous: Vec<HistoryEntry>,
    next: Vec<HistoryEntry>,
}

impl HistoryManager {
    /// An empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new undoable step. Any redoable entries are discarded: a new
    /// mutation after an undo invalidates the redo branch.
    ///
    /// With `override_last`, the top of the undo stack is replaced instead of
    /// appending -- this coalesces a train of fine-grained updates (such as a
    /// drag-resize) into a single entry.
    pub fn push(&mut self, actions: Vec<Action>, last: Vec<Action>, override_last: bool) {
        debug_assert!(
            actions
                .iter()
                .chain(last.iter())
                .all(|a| a.persist() != Some(true)),
            "history entries must hold unpersisted actions"
        );
        let entry = HistoryEntry {
            actions,
            last,
            date: SystemTime::now(),
        };
        if override_last {
            if let Some(top) = self.previous.last_mut() {
                *top = entry;
            } else {
                self.previous.push(entry);
            }
        } else {
            self.previous.push(entry);
        }
        self.next.clear();
    }

    /// Pop the most recent undoable entry. `None` when the stack is empty
    /// (undo on an empty history is a documented no-op).
    pub fn begin_undo(&mut self) -> Option<HistoryEntry> {
        self.previous.pop()
    }

    /// File an entry whose `actions` were just replayed onto the redo stack.
    pub fn finish_undo(&mut self, entry: HistoryEntry) {
        self.next.push(entry.swapped());
    }

    /// Pop the most recent redoable entry. `None` when the stack is empty.
    pub fn begin_redo(&mut self) -> Option<HistoryEntry> {
        self.next.pop()
    }

    /// File a replayed redo entry back onto the undo stack.
    pub fn finish_redo(&mut self, entry: HistoryEntry) {
        self.previous.push(entry.swapped());
    }

    /// Clear both stacks (scene reset / new document load).
    pub fn reset(&mut self) {
        self.previous.clear();
        self.next.clear();
    }

    /// Number of undoable entries.
    pub fn undo_depth(&self) -> usize {
        self.previous.len()
    }

    /// Number of redoable entries.
    pub fn redo_depth(&self) -> usize {
        self.next.len()
    }

    /// Whether an undo is available.
    pub fn can_undo(&self) -> bool {
        !self.previous.is_empty()
    }

    /// Whether a redo is available.
    pub fn can_redo(&self) -> bool {
        !self.next.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
