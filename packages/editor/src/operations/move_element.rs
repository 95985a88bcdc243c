use super::carry_over::carry_over_buttons;
use super::placement::{can_apply_adjusted, next_element};
use super::transfer::{extract, place, Destination};
use super::walk::walk;
use super::{skipped, Coordinate, Engine, Outcome, Placement, SkipReason};
use crate::clock::Clock;
use crate::errors::EditorError;
use crate::store::{DocumentField, DocumentStore};
use tracing::{info, instrument};

impl<C: Clock> Engine<C> {
    /// Move the element at `source` next to the element at `target`
    ///
    /// `target` may address an empty document (any coordinate), in which case
    /// the element becomes its first block.
    #[instrument(skip(self, store), fields(source = %source, target = %target))]
    pub fn move_element(
        &self,
        store: &mut impl DocumentStore,
        source: &Coordinate,
        target: &Coordinate,
        placement: Placement,
    ) -> Result<Outcome, EditorError> {
        if source == target {
            return Ok(skipped("move", SkipReason::SelfMove));
        }

        let Some(source_field) = store.get(&source.fragment_id) else {
            return Ok(skipped(
                "move",
                SkipReason::MissingFragment(source.fragment_id.clone()),
            ));
        };
        if !source.exists_in(&source_field.current) {
            return Ok(skipped("move", SkipReason::MissingSource));
        }

        let same_document = source.same_document(target);
        let target_field = if same_document {
            None
        } else {
            match store.get(&target.fragment_id) {
                Some(field) => Some(field),
                None => {
                    return Ok(skipped(
                        "move",
                        SkipReason::MissingFragment(target.fragment_id.clone()),
                    ))
                }
            }
        };

        let target_doc = target_field
            .as_ref()
            .map_or(&source_field.current, |field| &field.current);
        let target_empty = target_doc.is_empty();
        if !target_empty && !target.exists_in(target_doc) {
            return Ok(skipped("move", SkipReason::MissingTarget));
        }

        // Resolve the placement side to a neighbouring coordinate
        let mut resolved = target.clone();
        if let Some((outer, idx)) = next_element(target_doc, target.outer_idx, target.idx, placement) {
            if same_document && source.outer_idx == outer && source.idx == idx {
                return Ok(skipped("move", SkipReason::SelfMove));
            }
            if can_apply_adjusted(
                source.idx,
                target.idx,
                source.outer_idx,
                target.outer_idx,
                placement,
            ) {
                resolved.outer_idx = outer;
                resolved.idx = idx;
            }
        }

        match target_field {
            Some(target_field) => self.move_across(
                store,
                source,
                source_field,
                target,
                target_field,
                placement,
            ),
            None => self.move_within(store, source, source_field, target, &resolved, placement),
        }
    }

    fn move_within(
        &self,
        store: &mut impl DocumentStore,
        source: &Coordinate,
        field: DocumentField,
        target: &Coordinate,
        resolved: &Coordinate,
        placement: Placement,
    ) -> Result<Outcome, EditorError> {
        let mut doc = field.current.clone();

        match (source.idx, resolved.idx) {
            (Some(from), Some(to)) if source.outer_idx == resolved.outer_idx => {
                if from == to {
                    return Ok(skipped("move", SkipReason::SelfMove));
                }
                walk(&mut doc, &[source.outer_idx], from, to);
            }
            (None, None) => {
                if source.outer_idx == resolved.outer_idx {
                    return Ok(skipped("move", SkipReason::SelfMove));
                }
                walk(&mut doc, &[], source.outer_idx, resolved.outer_idx);
            }
            (None, Some(_)) if source.outer_idx == target.outer_idx => {
                // a list cannot move into itself
                return Ok(skipped("move", SkipReason::SelfMove));
            }
            _ => {
                let Some(moved) = extract(&mut doc, source.outer_idx, source.idx) else {
                    return Ok(skipped("move", SkipReason::MissingSource));
                };
                let destination =
                    Destination::resolve(target, placement, false, moved.removed_outer);
                if !place(&mut doc, moved, destination)? {
                    return Ok(skipped("move", SkipReason::MissingTarget));
                }
            }
        }

        doc.sync()?;
        self.commit(store, source, field, doc)?;
        info!(fragment = %source.fragment_id, "Moved element within document");
        Ok(Outcome::Applied)
    }

    fn move_across(
        &self,
        store: &mut impl DocumentStore,
        source: &Coordinate,
        source_field: DocumentField,
        target: &Coordinate,
        target_field: DocumentField,
        placement: Placement,
    ) -> Result<Outcome, EditorError> {
        let mut source_doc = source_field.current.clone();
        let mut target_doc = target_field.current.clone();

        let Some(moved) = extract(&mut source_doc, source.outer_idx, source.idx) else {
            return Ok(skipped("move", SkipReason::MissingSource));
        };
        let buttons = carry_over_buttons(&moved.render, &mut source_doc, &mut target_doc.payload);

        let destination = Destination::resolve(target, placement, target_doc.is_empty(), None);
        if !place(&mut target_doc, moved, destination)? {
            return Ok(skipped("move", SkipReason::MissingTarget));
        }

        source_doc.sync()?;
        target_doc.sync()?;
        self.commit(store, source, source_field, source_doc)?;
        self.commit(store, target, target_field, target_doc)?;
        info!(
            from = %source.fragment_id,
            to = %target.fragment_id,
            buttons,
            "Moved element across documents"
        );
        Ok(Outcome::Applied)
    }
}
