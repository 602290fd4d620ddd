//! Bounded undo/redo over full-grid snapshots.
//!
//! Every mutating edit pushes one snapshot of the pre-edit state; undo and
//! redo move snapshots between the two stacks. History is linear: a new edit
//! discards everything on the redo stack.

use crate::grid::Grid;
use crate::models::Snapshot;
use std::collections::VecDeque;

/// Maximum number of snapshots kept on each stack.
pub const DEFAULT_CAPACITY: usize = 50;

/// Undo and redo stacks of grid snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    undo_stack: VecDeque<Snapshot>,
    redo_stack: VecDeque<Snapshot>,
    capacity: usize,
}

impl History {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a history holding at most `capacity` snapshots per stack.
    ///
    /// A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Record the current state of `grid` before it is mutated.
    ///
    /// Must be called exactly once per user-visible edit, before the edit is
    /// applied. Evicts the oldest snapshot when full and clears the redo stack.
    pub fn push_state(&mut self, grid: &Grid) {
        self.push_snapshot(grid.snapshot());
    }

    /// Record an already-captured snapshot as the most recent undo point.
    pub fn push_snapshot(&mut self, snapshot: Snapshot) {
        push_bounded(&mut self.undo_stack, snapshot, self.capacity);
        self.redo_stack.clear();
        log::debug!("history push: {} undo, redo cleared", self.undo_stack.len());
    }

    /// Restore the most recent undo snapshot into `grid`.
    ///
    /// The current state moves onto the redo stack. Returns `false` and leaves
    /// everything untouched if there is nothing to undo.
    pub fn undo(&mut self, grid: &mut Grid) -> bool {
        let Some(previous) = self.undo_stack.pop_back() else {
            return false;
        };
        push_bounded(&mut self.redo_stack, grid.snapshot(), self.capacity);
        grid.restore(previous);
        log::debug!("undo: {} undo, {} redo", self.undo_stack.len(), self.redo_stack.len());
        true
    }

    /// Re-apply the most recently undone snapshot into `grid`.
    ///
    /// The current state moves onto the undo stack. Returns `false` if there
    /// is nothing to redo.
    pub fn redo(&mut self, grid: &mut Grid) -> bool {
        let Some(next) = self.redo_stack.pop_back() else {
            return false;
        };
        push_bounded(&mut self.undo_stack, grid.snapshot(), self.capacity);
        grid.restore(next);
        log::debug!("redo: {} undo, {} redo", self.undo_stack.len(), self.redo_stack.len());
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// The snapshot the next `undo` would restore.
    pub fn peek_undo(&self) -> Option<&Snapshot> {
        self.undo_stack.back()
    }

    /// Drop all recorded history.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

fn push_bounded(stack: &mut VecDeque<Snapshot>, snapshot: Snapshot, capacity: usize) {
    while stack.len() >= capacity {
        stack.pop_front();
    }
    stack.push_back(snapshot);
}
