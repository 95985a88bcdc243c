//! Transfer of an element into another container
//!
//! Used for every move that cannot be expressed as a walk inside one
//! container: across documents, between a list and the top level, or between
//! two lists. The element is extracted with a snapshot of the styles of every
//! occurrence inside it, re-shaped for its destination, unshifted at index 0
//! of the destination container and walked to its final index.

use super::splice::{
    as_block, as_item, list_shape, remove_subtree, removal_path, unwrap_sole_child,
    unwrap_sole_item, ListShape, Reshape,
};
use super::walk::walk;
use super::{Coordinate, Placement};
use crate::document::Document;
use crate::errors::EditorError;
use crate::styles::{CarriedStyle, StylePayload};
use std::collections::{BTreeMap, VecDeque};
use storykeep_evaluator::{Occurrence, OrdinalLookup, VNode};
use storykeep_parser::ast::Node;
use tracing::debug;

/// Styles of one occurrence inside a moved element
#[derive(Debug, Clone)]
pub(crate) struct Carried {
    /// Render path relative to the element root
    pub path: Vec<usize>,
    pub style: CarriedStyle,
}

/// An element detached from its document
#[derive(Debug, Clone)]
pub(crate) struct Extracted {
    pub semantic: Node,
    pub render: VNode,
    /// Styles of every occurrence inside the element, in pre-order
    pub carried: Vec<Carried>,
    /// Shape of the list the element was an item of
    pub source_list: Option<ListShape>,
    /// Top-level index that left the document
    pub removed_outer: Option<usize>,
}

/// Container and index an element is moved to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Destination {
    Root { index: usize },
    List { outer: usize, index: usize },
}

impl Destination {
    /// Destination of a move next to `target`
    ///
    /// `removed_outer` is the top-level index vacated by the same move in the
    /// same document; later positions shift up by one.
    pub fn resolve(
        target: &Coordinate,
        placement: Placement,
        empty: bool,
        removed_outer: Option<usize>,
    ) -> Self {
        if empty {
            return Destination::Root { index: 0 };
        }
        let after = usize::from(placement.is_after());
        let shifted = |index: usize| match removed_outer {
            Some(removed) if removed < index => index - 1,
            _ => index,
        };
        match target.idx {
            Some(idx) => Destination::List {
                outer: shifted(target.outer_idx),
                index: idx + after,
            },
            None => Destination::Root {
                index: shifted(target.outer_idx + after),
            },
        }
    }
}

/// Detach the element at `(outer, idx)` with its styles
pub(crate) fn extract(doc: &mut Document, outer: usize, idx: Option<usize>) -> Option<Extracted> {
    let element_path = match idx {
        Some(idx) => vec![outer, idx],
        None => vec![outer],
    };
    let source_list = match idx {
        Some(_) => Some(list_shape(&doc.semantic, outer)?),
        None => None,
    };
    let removal = removal_path(&doc.semantic, outer, idx)?;

    let lookup = doc.lookup();
    let carried: Vec<Carried> = lookup
        .occurrences_within(&element_path)
        .into_iter()
        .map(|o| Carried {
            path: o.path.get(element_path.len()..).unwrap_or_default().to_vec(),
            style: doc.payload.class_names_payload.carried(&o.tag, o.ordinal),
        })
        .collect();

    let (mut semantic, mut render) = remove_subtree(doc, &removal)?;
    if idx.is_some() && removal.len() == 1 {
        // the list held only this item
        semantic = unwrap_sole_item(semantic);
        render = unwrap_sole_child(render);
    }

    debug!(
        outer,
        ?idx,
        occurrences = carried.len(),
        removed_list = idx.is_some() && removal.len() == 1,
        "Extracted element"
    );
    Some(Extracted {
        semantic,
        render,
        carried,
        source_list,
        removed_outer: (removal.len() == 1).then_some(outer),
    })
}

/// Insert an extracted element at `destination`; false when the destination
/// container does not exist
pub(crate) fn place(
    doc: &mut Document,
    moved: Extracted,
    destination: Destination,
) -> Result<bool, EditorError> {
    let Extracted {
        semantic,
        render,
        carried,
        source_list,
        ..
    } = moved;

    let (container, index, node, vnode, reshape) = match destination {
        Destination::Root { index } => {
            let (node, vnode, reshape) = as_block(semantic, render, source_list)?;
            (Vec::new(), index, node, vnode, reshape)
        }
        Destination::List { outer, index } => {
            let Some(shape) = list_shape(&doc.semantic, outer) else {
                return Ok(false);
            };
            let (node, vnode, reshape) = as_item(semantic, render, source_list, shape.spread)?;
            (vec![outer], index, node, vnode, reshape)
        }
    };

    if doc.render.children_at_mut(&container).is_none()
        || !doc.semantic.insert_at(&container, 0, node)
    {
        return Ok(false);
    }
    doc.render.insert_at(&container, 0, vnode);

    let mut path = container.clone();
    path.push(0);
    let lookup = doc.lookup();
    let placed: Vec<Occurrence> = lookup
        .occurrences_within(&path)
        .into_iter()
        .cloned()
        .collect();
    adopt_styles(
        &mut doc.payload.class_names_payload,
        &lookup,
        &carried,
        &placed,
        &path,
        &reshape,
    );

    let len = doc.semantic.children_at(&container).map_or(0, Vec::len);
    let to = index.min(len.saturating_sub(1));
    walk(doc, &container, 0, to);
    debug!(?destination, to, "Placed element");
    Ok(true)
}

/// Give the occurrences of a placed element the styles carried from its old
/// position
///
/// `root` is the render path the element was placed at. Occurrences the
/// re-shape created get an empty slot and a retagged root merges its carried
/// overrides into the destination tag. Every other occurrence pairs up in
/// pre-order with the surviving carried occurrence of the same tag.
pub(crate) fn adopt_styles(
    payload: &mut StylePayload,
    lookup: &OrdinalLookup,
    carried: &[Carried],
    placed: &[Occurrence],
    root: &[usize],
    reshape: &Reshape,
) {
    let mut retagged = None;
    let mut queues: BTreeMap<&str, VecDeque<&CarriedStyle>> = BTreeMap::new();
    for item in carried {
        if reshape.dropped.contains(&item.path) {
            continue;
        }
        if reshape.retag_root && item.path.is_empty() {
            retagged = Some(&item.style);
            continue;
        }
        queues
            .entry(item.style.tag.as_str())
            .or_default()
            .push_back(&item.style);
    }

    let empty = BTreeMap::new();
    for occurrence in placed {
        let relative = occurrence.path.get(root.len()..).unwrap_or_default();
        let count = lookup.count(&occurrence.tag);

        if relative.is_empty() {
            if let Some(source) = retagged.take() {
                payload.fix_payload_overrides(source, &occurrence.tag, occurrence.ordinal, count);
                payload.fix_style_classes(source, &occurrence.tag);
                continue;
            }
        }
        if reshape.created.iter().any(|path| path.as_slice() == relative) {
            payload.insert_slot(&occurrence.tag, occurrence.ordinal, &empty, count);
            continue;
        }

        match queues
            .get_mut(occurrence.tag.as_str())
            .and_then(VecDeque::pop_front)
        {
            Some(style) => {
                payload.insert_slot(&occurrence.tag, occurrence.ordinal, &style.values, count);
                payload.fix_style_classes(style, &occurrence.tag);
            }
            None => payload.insert_slot(&occurrence.tag, occurrence.ordinal, &empty, count),
        }
    }
}
