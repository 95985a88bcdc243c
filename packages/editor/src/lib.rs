//! # Storykeep Editor
//!
//! Structural editing engine for story fragment panes.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ parser: markup text → semantic tree         │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ evaluator: semantic tree → render tree      │
//! │            render tree → ordinal lookup     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: documents + structural operations   │
//! │  - Move / insert / erase elements           │
//! │  - Style override arrays follow elements    │
//! │  - Debounced field history with undo        │
//! │  - Store injected by the caller             │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Semantic tree is source of truth**: source text is its serialization
//! 2. **Render nodes are transplanted**: attributes survive moves
//! 3. **Styles follow elements**: override arrays shuffle with every edit
//! 4. **Failed preconditions are no-ops**: reported as [`Outcome::Skipped`]
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storykeep_editor::{Coordinate, Document, Engine, MemoryStore, Placement};
//!
//! let mut store = MemoryStore::new();
//! store.insert("fragment-1", Document::from_markdown("one\n\ntwo\n\n## three")?);
//!
//! let engine = Engine::default();
//! engine.move_element(
//!     &mut store,
//!     &Coordinate::block("fragment-1", "pane-1", 1),
//!     &Coordinate::block("fragment-1", "pane-1", 2),
//!     Placement::After,
//! )?;
//! ```

mod clock;
mod config;
mod document;
mod errors;
mod history;
mod operations;
mod signals;
mod store;
mod story;
mod styles;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{EditorConfig, ToolAddMode, MAX_HISTORY_LENGTH, MS_BETWEEN_UNDO};
pub use document::{Document, DocumentData, InvariantViolation};
pub use errors::{EditorError, StoreError};
pub use history::{FieldWithHistory, HistoryEntry, HistoryPolicy, UndoStep};
pub use operations::{
    can_apply_adjusted, next_element, Coordinate, Engine, Outcome, Placement, SkipReason,
};
pub use signals::{EditorSignal, NoSignals, SignalSink};
pub use store::{DocumentField, DocumentStore, MemoryStore};
pub use story::{move_pane, remove_pane, MoveDirection};
pub use styles::{
    extract_at, insert_at, remove_at, resize_to_count, swap, swap_runs, unshift_with_trim,
    ButtonData, CarriedStyle, OverrideArray, PanePayload, StylePayload, TagStyles, Tuple,
    TupleValue,
};

// Re-export common types for convenience
pub use storykeep_evaluator::{OrdinalLookup, RenderTree, VNode};
pub use storykeep_parser::ast::{Node, Root};
