//! Anchor payload carry-over for elements leaving their document.
//!
//! Button payloads are keyed by link target in the pane payload, which the
//! markup cannot express. When an element holding links moves to another
//! pane, the payloads follow it; the source keeps a payload only while one of
//! its remaining links still points at the same target.

use crate::document::Document;
use crate::styles::PanePayload;
use storykeep_evaluator::VNode;
use tracing::debug;

/// Link targets inside a render subtree, in pre-order
pub(crate) fn link_targets(node: &VNode) -> Vec<String> {
    let mut targets = Vec::new();
    node.walk(&mut |n| {
        if n.tag() == Some("a") {
            if let Some(href) = n.attr("href") {
                if !targets.iter().any(|t| t == href) {
                    targets.push(href.to_string());
                }
            }
        }
    });
    targets
}

/// Move the button payloads of `moved`'s links from `source` into `target`;
/// returns how many were carried
pub(crate) fn carry_over_buttons(moved: &VNode, source: &mut Document, target: &mut PanePayload) -> usize {
    let lookup = source.lookup();
    let mut carried = 0;

    for href in link_targets(moved) {
        let still_linked = !lookup.links(&href).is_empty();
        let button = if still_linked {
            source.payload.buttons.get(&href).cloned()
        } else {
            source.payload.buttons.remove(&href)
        };
        if let Some(button) = button {
            debug!(href = %href, still_linked, "Carried button payload");
            target.buttons.insert(href, button);
            carried += 1;
        }
    }
    carried
}
