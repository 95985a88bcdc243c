use super::splice::{list_shape, open_slots, render_block, render_item};
use super::{skipped, Coordinate, Engine, Outcome, Placement, SkipReason};
use crate::clock::Clock;
use crate::config::ToolAddMode;
use crate::errors::EditorError;
use crate::signals::{EditorSignal, SignalSink};
use crate::store::DocumentStore;
use storykeep_parser::ast::Node;
use storykeep_parser::parse;
use tracing::{info, instrument};

impl<C: Clock> Engine<C> {
    /// Insert the seed markup of `kind` next to `at`
    ///
    /// Into an empty document the content becomes the first block whatever
    /// the coordinate. Configurable widgets raise
    /// [`EditorSignal::OpenSettings`] for the new element.
    #[instrument(skip(self, store, signals), fields(at = %at))]
    pub fn insert_element(
        &self,
        store: &mut impl DocumentStore,
        signals: &mut impl SignalSink,
        at: &Coordinate,
        kind: ToolAddMode,
        placement: Placement,
    ) -> Result<Outcome, EditorError> {
        let Some(field) = store.get(&at.fragment_id) else {
            return Ok(skipped(
                "insert",
                SkipReason::MissingFragment(at.fragment_id.clone()),
            ));
        };

        let mut doc = field.current.clone();
        let lookup = doc.lookup();
        let is_empty = doc.is_empty();

        let parent_tag = if is_empty {
            None
        } else {
            match lookup.nth_tag(at.outer_idx) {
                Some(tag) => Some(tag.to_string()),
                None => return Ok(skipped("insert", SkipReason::MissingTarget)),
            }
        };
        if !is_empty && !at.exists_in(&doc) {
            return Ok(skipped("insert", SkipReason::MissingTarget));
        }

        // Images live in bullet lists and asides in ordered lists
        let seed = self.config.insert_default(kind)?;
        let wrap_image = kind == ToolAddMode::Img && parent_tag.as_deref() != Some("ul");
        let wrap_aside = kind == ToolAddMode::Aside && parent_tag.as_deref() != Some("ol");
        let markup = if wrap_image {
            format!("* {}", seed)
        } else if wrap_aside {
            format!("1. {}", seed)
        } else {
            seed.to_string()
        };
        let idx = if wrap_aside { None } else { at.idx };
        let outer = if is_empty { 0 } else { at.outer_idx };
        let placement = if is_empty { Placement::Before } else { placement };
        let after = usize::from(placement.is_after());

        let snippet = parse(&markup)?;
        if snippet.children.is_empty() {
            return Err(EditorError::EmptyInsertDefault {
                kind: kind.to_string(),
            });
        }

        let mut inserted = Vec::new();
        match (idx, list_shape(&doc.semantic, outer)) {
            (Some(idx), Some(shape)) if !is_empty => {
                let items = snippet.children.into_iter().flat_map(|block| match block {
                    Node::List { children, .. } => children,
                    other => vec![Node::list_item(vec![other])],
                });
                for (n, item) in items.enumerate() {
                    let index = idx + after + n;
                    let vnode = render_item(&item, shape.spread)?;
                    doc.semantic.insert_at(&[outer], index, item);
                    doc.render.insert_at(&[outer], index, vnode);
                    inserted.push(vec![outer, index]);
                }
            }
            _ => {
                let start = if is_empty { 0 } else { outer + after };
                for (n, block) in snippet.children.into_iter().enumerate() {
                    let vnode = render_block(&block)?;
                    doc.semantic.insert_at(&[], start + n, block);
                    doc.render.insert_at(&[], start + n, vnode);
                    inserted.push(vec![start + n]);
                }
            }
        }
        for path in &inserted {
            open_slots(&mut doc, path);
        }
        doc.sync()?;

        // Position of the new element as the settings panel addresses it
        let new_lookup = doc.lookup();
        let mut new_outer = outer;
        let mut new_idx = idx.unwrap_or(0);
        if placement.is_after() {
            if lookup.top_level_len() < new_lookup.top_level_len() {
                new_outer = at.outer_idx + 1;
                new_idx = 0;
            } else if let Some(idx) = at.idx {
                new_idx = idx + 1;
            }
        }
        let tag = kind.tag();
        let global_nth = new_lookup
            .global_nth(tag, Some(new_idx), new_outer)
            .unwrap_or(0);

        if kind.is_configurable() {
            signals.emit(EditorSignal::OpenSettings {
                pane_id: at.pane_id.clone(),
                outer_idx: new_outer,
                idx: new_idx,
                global_nth,
                tag: tag.to_string(),
                must_config: true,
            });
        }

        self.commit(store, at, field, doc)?;
        store.mark_unsaved(&at.pane_id, true);
        info!(
            kind = %kind,
            outer = new_outer,
            idx = new_idx,
            global_nth,
            "Inserted element"
        );
        Ok(Outcome::Applied)
    }
}
