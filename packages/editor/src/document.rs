//! # Dual-Tree Document
//!
//! One pane document: serialized source, semantic tree, render tree and the
//! pane's style payload.
//!
//! The semantic tree is the structural source of truth. The render tree is
//! derived from it but owned separately, so transplanted nodes keep attributes
//! the markup cannot express. After every operation [`Document::sync`]
//! re-serializes the source, re-derives the render tree and reconciles the
//! style arrays against the new occurrence counts.
//!
//! Persisted form is `{source, payload}`; both trees are rebuilt on load.

use crate::errors::EditorError;
use crate::styles::PanePayload;
use serde::{Deserialize, Serialize};
use storykeep_evaluator::{derive_render_tree, is_styleable, OrdinalLookup, RenderTree};
use storykeep_parser::ast::Root;
use storykeep_parser::{parse, serialize};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DocumentData", into = "DocumentData")]
pub struct Document {
    pub source: String,
    pub semantic: Root,
    pub render: RenderTree,
    pub payload: PanePayload,
}

/// Serialized form of a document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentData {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub payload: PanePayload,
}

impl TryFrom<DocumentData> for Document {
    type Error = EditorError;

    fn try_from(data: DocumentData) -> Result<Self, Self::Error> {
        Document::from_source(&data.source, data.payload)
    }
}

impl From<Document> for DocumentData {
    fn from(doc: Document) -> Self {
        DocumentData {
            source: doc.source,
            payload: doc.payload,
        }
    }
}

/// A broken document invariant
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvariantViolation {
    #[error("source text is not the serialization of the semantic tree")]
    SourceMismatch,

    #[error("source text does not parse back to the semantic tree")]
    RoundTripMismatch,

    #[error("render tree does not match the semantic tree")]
    RenderMismatch,

    #[error("semantic tree cannot be rendered: {0}")]
    Underivable(String),

    #[error("tag '{tag}' has count {count} but {occurrences} occurrences")]
    CountMismatch {
        tag: String,
        count: usize,
        occurrences: usize,
    },

    #[error("override '{property}' of tag '{tag}' has {len} slots for {count} occurrences")]
    OverrideLength {
        tag: String,
        property: String,
        len: usize,
        count: usize,
    },
}

impl Document {
    /// Parse source text and derive both trees
    pub fn from_source(source: &str, payload: PanePayload) -> Result<Self, EditorError> {
        let semantic = parse(source)?;
        let render = derive_render_tree(&semantic)?;
        Ok(Document {
            source: source.to_string(),
            semantic,
            render,
            payload,
        })
    }

    pub fn from_markdown(source: &str) -> Result<Self, EditorError> {
        Self::from_source(source, PanePayload::default())
    }

    pub fn is_empty(&self) -> bool {
        self.semantic.children.is_empty()
    }

    pub fn lookup(&self) -> OrdinalLookup {
        OrdinalLookup::build(&self.render)
    }

    /// Re-derive source and render tree from the semantic tree, then fit the
    /// style arrays to the resulting occurrence counts
    pub fn sync(&mut self) -> Result<(), EditorError> {
        self.source = serialize(&self.semantic);

        // Surgery can leave flags the markup cannot express (a loose list
        // reduced to one item); adopt the canonical tree.
        let canonical = parse(&self.source)?;
        if canonical != self.semantic {
            debug!("Normalized semantic tree to its canonical form");
            self.semantic = canonical;
        }

        let derived = derive_render_tree(&self.semantic)?;
        if !self.render.same_shape(&derived) {
            warn!(
                nodes = derived.len(),
                "Render tree diverged from semantic tree, re-derived"
            );
            self.render = derived;
        }

        let lookup = self.lookup();
        self.payload.class_names_payload.reconcile(&lookup);
        Ok(())
    }

    /// Every violated invariant, empty when the document is consistent
    pub fn check_invariants(&self) -> Vec<InvariantViolation> {
        let mut violations = Vec::new();

        if serialize(&self.semantic) != self.source {
            violations.push(InvariantViolation::SourceMismatch);
        }
        match parse(&self.source) {
            Ok(reparsed) if reparsed == self.semantic => {}
            _ => violations.push(InvariantViolation::RoundTripMismatch),
        }
        match derive_render_tree(&self.semantic) {
            Ok(derived) if derived.same_shape(&self.render) => {}
            Ok(_) => violations.push(InvariantViolation::RenderMismatch),
            Err(err) => violations.push(InvariantViolation::Underivable(err.to_string())),
        }

        let lookup = self.lookup();
        for (tag, styles) in &self.payload.class_names_payload.0 {
            if !is_styleable(tag) {
                continue;
            }
            let occurrences = lookup.count(tag);
            if styles.count != occurrences {
                violations.push(InvariantViolation::CountMismatch {
                    tag: tag.clone(),
                    count: styles.count,
                    occurrences,
                });
            }
            for (property, array) in &styles.overrides {
                if array.len() != occurrences {
                    violations.push(InvariantViolation::OverrideLength {
                        tag: tag.clone(),
                        property: property.clone(),
                        len: array.len(),
                        count: occurrences,
                    });
                }
            }
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styles::{TagStyles, Tuple};
    use std::collections::BTreeMap;
    use storykeep_parser::ast::Node;

    #[test]
    fn test_from_source_derives_both_trees() {
        let doc = Document::from_markdown("## title\n\n...").unwrap();
        assert_eq!(doc.semantic.children.len(), 2);
        assert_eq!(doc.render.nodes[0].tag(), Some("h2"));
        assert!(doc.check_invariants().is_empty());
    }

    #[test]
    fn test_sync_normalizes_single_item_loose_list() {
        let mut doc = Document::from_markdown("* a\n\n* b").unwrap();
        doc.semantic.remove_at(&[0, 1]);
        doc.render.remove_at(&[0, 1]);
        doc.sync().unwrap();

        assert_eq!(doc.source, "* a");
        assert!(matches!(doc.semantic.children[0], Node::List { spread: false, .. }));
        assert!(doc.check_invariants().is_empty());
    }

    #[test]
    fn test_check_invariants_reports_short_arrays() {
        let mut doc = Document::from_markdown("one\n\ntwo").unwrap();
        doc.payload.class_names_payload.0.insert(
            "p".to_string(),
            TagStyles {
                overrides: BTreeMap::from([("mt".to_string(), vec![Some(Tuple::text(&["4"]))])]),
                count: 2,
                ..TagStyles::default()
            },
        );
        let violations = doc.check_invariants();
        assert_eq!(
            violations,
            vec![InvariantViolation::OverrideLength {
                tag: "p".to_string(),
                property: "mt".to_string(),
                len: 1,
                count: 2,
            }]
        );

        doc.sync().unwrap();
        assert!(doc.check_invariants().is_empty());
    }

    #[test]
    fn test_persisted_form_rebuilds_trees() {
        let doc = Document::from_markdown("* `youtube(tag|title)`").unwrap();
        let json = serde_json::to_string(&doc).unwrap();
        assert!(!json.contains("semantic"));
        let restored: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, doc);
    }
}
