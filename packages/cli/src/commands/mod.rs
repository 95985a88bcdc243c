pub mod check;
pub mod edit;
pub mod render;

pub use check::{check, CheckArgs};
pub use edit::{erase, insert, move_element, undo, EraseArgs, InsertArgs, MoveArgs, UndoArgs};
pub use render::{render, RenderArgs};

use storykeep_editor::Coordinate;

/// Parse `fragment:pane:outer` or `fragment:pane:outer.idx`
pub fn parse_coordinate(value: &str) -> Result<Coordinate, String> {
    let mut parts = value.splitn(3, ':');
    let (Some(fragment_id), Some(pane_id), Some(position)) =
        (parts.next(), parts.next(), parts.next())
    else {
        return Err(format!(
            "expected fragment:pane:outer[.idx], got '{}'",
            value
        ));
    };
    if fragment_id.is_empty() || pane_id.is_empty() {
        return Err(format!("empty fragment or pane id in '{}'", value));
    }

    let number = |s: &str| {
        s.parse::<usize>()
            .map_err(|_| format!("invalid index '{}' in '{}'", s, value))
    };
    match position.split_once('.') {
        Some((outer, idx)) => Ok(Coordinate::item(
            fragment_id,
            pane_id,
            number(outer)?,
            number(idx)?,
        )),
        None => Ok(Coordinate::block(fragment_id, pane_id, number(position)?)),
    }
}
