//! # Structural Operations
//!
//! Move, insert and erase of block and list-item elements, inside one pane
//! document or across two.
//!
//! Every operation reads whole fields from the [`DocumentStore`], mutates a
//! copy of the current document, runs [`Document::sync`] and writes the field
//! back with a history push. Failed preconditions are not errors: they come
//! back as [`Outcome::Skipped`] and leave the store untouched.
//!
//! ## Move routing
//!
//! | source | target | algorithm |
//! |---|---|---|
//! | block | block, same document | adjacent-swap walk over the top level |
//! | item | item of the same list | adjacent-swap walk inside the list |
//! | anything else | | extract, unshift into the destination container, walk |
//!
//! [`Document::sync`]: crate::Document::sync

mod carry_over;
mod erase;
mod insert;
mod move_element;
mod placement;
mod splice;
mod transfer;
mod walk;

pub use placement::{can_apply_adjusted, next_element};

use crate::clock::{Clock, SystemClock};
use crate::config::EditorConfig;
use crate::document::Document;
use crate::errors::EditorError;
use crate::history::UndoStep;
use crate::store::{DocumentField, DocumentStore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, instrument};

/// Address of an element: `idx` is `None` for a top-level block and the
/// item index for an element inside the list at `outer_idx`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    pub fragment_id: String,
    pub pane_id: String,
    pub outer_idx: usize,
    pub idx: Option<usize>,
}

impl Coordinate {
    pub fn block(fragment_id: impl Into<String>, pane_id: impl Into<String>, outer_idx: usize) -> Self {
        Self {
            fragment_id: fragment_id.into(),
            pane_id: pane_id.into(),
            outer_idx,
            idx: None,
        }
    }

    pub fn item(
        fragment_id: impl Into<String>,
        pane_id: impl Into<String>,
        outer_idx: usize,
        idx: usize,
    ) -> Self {
        Self {
            fragment_id: fragment_id.into(),
            pane_id: pane_id.into(),
            outer_idx,
            idx: Some(idx),
        }
    }

    pub fn is_list_item(&self) -> bool {
        self.idx.is_some()
    }

    pub fn same_document(&self, other: &Coordinate) -> bool {
        self.fragment_id == other.fragment_id && self.pane_id == other.pane_id
    }

    /// Whether the element exists in `doc`
    pub fn exists_in(&self, doc: &Document) -> bool {
        match self.idx {
            Some(idx) => doc.semantic.is_list_item_at(self.outer_idx, idx),
            None => self.outer_idx < doc.semantic.children.len(),
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.idx {
            Some(idx) => write!(f, "{}:{}[{}.{}]", self.fragment_id, self.pane_id, self.outer_idx, idx),
            None => write!(f, "{}:{}[{}]", self.fragment_id, self.pane_id, self.outer_idx),
        }
    }
}

/// Side of the target an element lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Before,
    After,
}

impl Placement {
    pub fn is_after(&self) -> bool {
        matches!(self, Placement::After)
    }
}

impl FromStr for Placement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "before" => Ok(Placement::Before),
            "after" => Ok(Placement::After),
            other => Err(format!("unknown placement '{}'", other)),
        }
    }
}

/// Why an operation left the store untouched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Resolved target is the source itself
    SelfMove,
    MissingFragment(String),
    MissingSource,
    MissingTarget,
    NothingToUndo,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::SelfMove => write!(f, "element moved onto itself"),
            SkipReason::MissingFragment(id) => write!(f, "no fragment '{}'", id),
            SkipReason::MissingSource => write!(f, "source element does not exist"),
            SkipReason::MissingTarget => write!(f, "target element does not exist"),
            SkipReason::NothingToUndo => write!(f, "history is empty"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Skipped(SkipReason),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

pub(crate) fn skipped(operation: &'static str, reason: SkipReason) -> Outcome {
    debug!(operation, reason = %reason, "Operation skipped");
    Outcome::Skipped(reason)
}

/// Entry point for structural edits
pub struct Engine<C: Clock = SystemClock> {
    config: EditorConfig,
    clock: C,
}

impl Engine<SystemClock> {
    pub fn new(config: EditorConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl Default for Engine<SystemClock> {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl<C: Clock> Engine<C> {
    pub fn with_clock(config: EditorConfig, clock: C) -> Self {
        Self { config, clock }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Push history, install `doc` as the current value and update the
    /// pane's unsaved flag
    pub(crate) fn commit(
        &self,
        store: &mut impl DocumentStore,
        coordinate: &Coordinate,
        mut field: DocumentField,
        doc: Document,
    ) -> Result<(), EditorError> {
        let policy = self.config.history_policy();
        let pushed = field.push_history(self.clock.now_millis(), &policy);
        field.current = doc;
        let unsaved = field.is_unsaved();

        store.set(&coordinate.fragment_id, field)?;
        store.mark_unsaved(&coordinate.pane_id, unsaved);
        debug!(
            fragment = %coordinate.fragment_id,
            pane = %coordinate.pane_id,
            pushed,
            unsaved,
            "Committed document"
        );
        Ok(())
    }

    /// Restore the previous value of a document field
    #[instrument(skip(self, store))]
    pub fn undo(
        &self,
        store: &mut impl DocumentStore,
        fragment_id: &str,
        pane_id: &str,
    ) -> Result<Outcome, EditorError> {
        let Some(mut field) = store.get(fragment_id) else {
            return Ok(skipped("undo", SkipReason::MissingFragment(fragment_id.to_string())));
        };

        let step = field.undo();
        if step == UndoStep::Nothing {
            return Ok(skipped("undo", SkipReason::NothingToUndo));
        }

        let unsaved = field.is_unsaved();
        store.set(fragment_id, field)?;
        store.mark_unsaved(pane_id, unsaved);
        info!(?step, unsaved, "Undo applied");
        Ok(Outcome::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::store::MemoryStore;

    #[test]
    fn test_coordinate_existence() {
        let doc = Document::from_markdown("...\n\n* a\n* b").unwrap();
        assert!(Coordinate::block("f", "p", 1).exists_in(&doc));
        assert!(Coordinate::item("f", "p", 1, 1).exists_in(&doc));
        assert!(!Coordinate::item("f", "p", 1, 2).exists_in(&doc));
        assert!(!Coordinate::item("f", "p", 0, 0).exists_in(&doc));
        assert!(!Coordinate::block("f", "p", 2).exists_in(&doc));
    }

    #[test]
    fn test_undo_missing_and_empty() {
        let engine = Engine::with_clock(EditorConfig::default(), ManualClock::new(0));
        let mut store = MemoryStore::new();
        assert_eq!(
            engine.undo(&mut store, "f", "p").unwrap(),
            Outcome::Skipped(SkipReason::MissingFragment("f".to_string()))
        );

        store.insert("f", Document::from_markdown("...").unwrap());
        assert_eq!(
            engine.undo(&mut store, "f", "p").unwrap(),
            Outcome::Skipped(SkipReason::NothingToUndo)
        );
    }

    #[test]
    fn test_placement_from_str() {
        assert_eq!("after".parse::<Placement>().unwrap(), Placement::After);
        assert!("inside".parse::<Placement>().is_err());
    }
}
