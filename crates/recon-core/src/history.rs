//! Bounded snapshot history for undo/redo.

use chrono::{DateTime, Utc};

use recon_model::EngineState;

/// Number of undo steps retained before the oldest snapshot is evicted.
pub const HISTORY_CAPACITY: usize = 50;

/// One saved state, tagged with the description of the action that replaced
/// it and the moment it was parked.
#[derive(Debug, Clone)]
pub struct HistorySnapshot {
    pub state: EngineState,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

/// Double-stack undo/redo over full [`EngineState`] value snapshots.
///
/// Callers record the state as it was *before* each mutation, so undo is a
/// plain pop-and-restore. Snapshots are owned copies; restoring one can
/// never alias live state. Recording a new action clears the redo stack.
#[derive(Debug)]
pub struct History {
    undo_stack: Vec<HistorySnapshot>,
    redo_stack: Vec<HistorySnapshot>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(HISTORY_CAPACITY)
    }
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Parks the pre-mutation `state` under `description`. Evicts the oldest
    /// snapshot once the stack exceeds capacity.
    pub fn record(&mut self, state: EngineState, description: impl Into<String>) {
        self.undo_stack.push(HistorySnapshot {
            state,
            description: description.into(),
            timestamp: Utc::now(),
        });
        self.redo_stack.clear();
        if self.undo_stack.len() > self.capacity {
            self.undo_stack.remove(0);
        }
    }

    /// Restores the most recent snapshot into `live`, parking the current
    /// state on the redo stack. Returns the description of the undone
    /// action, or `None` when there is nothing to undo.
    pub fn undo(&mut self, live: &mut EngineState) -> Option<String> {
        let snapshot = self.undo_stack.pop()?;
        let description = snapshot.description.clone();
        let parked = HistorySnapshot {
            state: std::mem::replace(live, snapshot.state),
            description: description.clone(),
            timestamp: Utc::now(),
        };
        self.redo_stack.push(parked);
        Some(description)
    }

    /// Re-applies the most recently undone action. Returns its description,
    /// or `None` when there is nothing to redo.
    pub fn redo(&mut self, live: &mut EngineState) -> Option<String> {
        let snapshot = self.redo_stack.pop()?;
        let description = snapshot.description.clone();
        let parked = HistorySnapshot {
            state: std::mem::replace(live, snapshot.state),
            description: description.clone(),
            timestamp: Utc::now(),
        };
        self.undo_stack.push(parked);
        Some(description)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
