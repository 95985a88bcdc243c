//! # Field History
//!
//! Wraps a value with `{current, original, history}` for bounded undo.
//!
//! ## Design
//!
//! - Before a change lands, the previous `current` is pushed to the front of
//!   `history`, but only when more than `ms_between_undo` elapsed since the
//!   newest entry. Rapid edits collapse into one undo step.
//! - When the history grows past `max_history_length`, the second-oldest
//!   entry is dropped; the oldest one is the baseline and is kept.
//! - Undo pops `history[0]` into `current`. With a single entry left, undo
//!   restores `original` and clears the history instead.
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut field = FieldWithHistory::new(doc);
//! field.update(edited, clock.now_millis(), &policy);
//! field.undo();
//! ```

use serde::{Deserialize, Serialize};

/// Debounce and length limits for history pushes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryPolicy {
    pub ms_between_undo: i64,
    pub max_history_length: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry<T> {
    pub value: T,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct FieldWithHistory<T> {
    pub current: T,
    pub original: T,
    #[serde(default)]
    pub history: Vec<HistoryEntry<T>>,
}

/// What an undo did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoStep {
    /// `current` took the newest history entry
    Popped,
    /// `current` was reset to `original` and history cleared
    Reset,
    /// History was empty
    Nothing,
}

impl<T: Clone + PartialEq> FieldWithHistory<T> {
    pub fn new(value: T) -> Self {
        Self {
            current: value.clone(),
            original: value,
            history: Vec::new(),
        }
    }

    /// Timestamp of the newest history entry
    pub fn last_push(&self) -> Option<i64> {
        self.history.first().map(|entry| entry.timestamp)
    }

    /// Push `current` if the debounce window has passed; returns whether it did
    pub fn push_history(&mut self, now: i64, policy: &HistoryPolicy) -> bool {
        let since = now - self.last_push().unwrap_or(0);
        if since <= policy.ms_between_undo {
            return false;
        }

        self.history.insert(
            0,
            HistoryEntry {
                value: self.current.clone(),
                timestamp: now,
            },
        );
        if self.history.len() > policy.max_history_length && self.history.len() >= 2 {
            let second_oldest = self.history.len() - 2;
            self.history.remove(second_oldest);
        }
        true
    }

    /// Replace `current`, recording history first; unchanged values are ignored
    pub fn update(&mut self, value: T, now: i64, policy: &HistoryPolicy) -> bool {
        if value == self.current {
            return false;
        }
        self.push_history(now, policy);
        self.current = value;
        true
    }

    pub fn undo(&mut self) -> UndoStep {
        match self.history.len() {
            0 => UndoStep::Nothing,
            1 => {
                self.current = self.original.clone();
                self.history.clear();
                UndoStep::Reset
            }
            _ => {
                let entry = self.history.remove(0);
                self.current = entry.value;
                UndoStep::Popped
            }
        }
    }

    /// Current value differs from the loaded baseline
    pub fn is_unsaved(&self) -> bool {
        self.current != self.original
    }

    /// Accept `current` as the new baseline
    pub fn mark_saved(&mut self) {
        self.original = self.current.clone();
        self.history.clear();
    }
}
