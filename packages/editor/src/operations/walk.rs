//! Adjacent-swap walk
//!
//! An element travels to its new index one neighbour at a time. At each step
//! the two sibling subtrees trade places in both trees, and for every tag
//! present in both subtrees the two ordinal runs trade places in the override
//! arrays. Tags present on one side only keep their ordinals.

use crate::document::Document;
use tracing::trace;

/// Swap children `k` and `k + 1` of the container at `container`
pub(crate) fn swap_adjacent(doc: &mut Document, container: &[usize], k: usize) -> bool {
    let len = match doc.semantic.children_at(container) {
        Some(children) => children.len(),
        None => return false,
    };
    if k + 1 >= len {
        return false;
    }

    let lookup = doc.lookup();
    let mut left_path = container.to_vec();
    left_path.push(k);
    let mut right_path = container.to_vec();
    right_path.push(k + 1);

    let left = lookup.ranges_within(&left_path);
    let right = lookup.ranges_within(&right_path);
    let payload = &mut doc.payload.class_names_payload;
    for (tag, left_range) in &left {
        if let Some(right_range) = right.get(tag) {
            if left_range.end == right_range.start {
                payload.swap_runs(tag, left_range.start, left_range.len(), right_range.len());
            }
        }
    }

    if let Some(children) = doc.semantic.children_at_mut(container) {
        children.swap(k, k + 1);
    }
    if let Some(children) = doc.render.children_at_mut(container) {
        if k + 1 < children.len() {
            children.swap(k, k + 1);
        }
    }
    trace!(?container, k, "Swapped adjacent siblings");
    true
}

/// Move child `from` of `container` to index `to` by adjacent swaps
pub(crate) fn walk(doc: &mut Document, container: &[usize], from: usize, to: usize) {
    if from < to {
        for k in from..to {
            if !swap_adjacent(doc, container, k) {
                break;
            }
        }
    } else {
        for k in (to..from).rev() {
            if !swap_adjacent(doc, container, k) {
                break;
            }
        }
    }
}
