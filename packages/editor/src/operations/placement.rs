//! Resolution of "before"/"after" requests to concrete neighbours.

use super::Placement;
use crate::document::Document;

/// Element adjacent to `(outer_idx, idx)` on the `placement` side
///
/// A list item's neighbour is the sibling item; a block's neighbour is the
/// sibling block. Returns `None` when there is no such element.
pub fn next_element(
    doc: &Document,
    outer_idx: usize,
    idx: Option<usize>,
    placement: Placement,
) -> Option<(usize, Option<usize>)> {
    let step = |i: usize| match placement {
        Placement::After => i.checked_add(1),
        Placement::Before => i.checked_sub(1),
    };

    match idx {
        Some(idx) => {
            let adjusted = step(idx)?;
            doc.semantic
                .is_list_item_at(outer_idx, adjusted)
                .then_some((outer_idx, Some(adjusted)))
        }
        None => {
            let adjusted = step(outer_idx)?;
            (adjusted < doc.semantic.children.len()).then_some((adjusted, None))
        }
    }
}

/// Whether the neighbour coordinates replace the target
///
/// Only when the move direction agrees with the placement side, otherwise the
/// walk overshoots by one. Item index 0 and block positions compare equal.
pub fn can_apply_adjusted(
    source_idx: Option<usize>,
    target_idx: Option<usize>,
    source_outer: usize,
    target_outer: usize,
    placement: Placement,
) -> bool {
    let absolute = |idx: Option<usize>| match idx {
        Some(i) if i > 0 => i as isize,
        _ => -1,
    };
    let (a1, a2) = (absolute(source_idx), absolute(target_idx));

    match placement {
        Placement::After => source_outer > target_outer || a1 > a2,
        Placement::Before => source_outer < target_outer || a1 < a2,
    }
}
