pub mod evaluator;
pub mod lookup;
pub mod vdom;

#[cfg(test)]
mod tests_lookup;

pub use evaluator::{derive_render_tree, EvalError, EvalResult, Evaluator};
pub use lookup::{is_styleable, NodeRef, Occurrence, OrdinalLookup, STYLEABLE_TAGS};
pub use vdom::{RenderTree, VNode};
