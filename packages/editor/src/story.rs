//! Ordering of the panes of a story fragment

use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

impl FromStr for MoveDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(MoveDirection::Up),
            "down" => Ok(MoveDirection::Down),
            other => Err(format!("unknown direction '{}'", other)),
        }
    }
}

/// Swap `pane_id` with its neighbour; unchanged when there is none
pub fn move_pane(pane_ids: &[String], pane_id: &str, direction: MoveDirection) -> Vec<String> {
    let mut panes = pane_ids.to_vec();
    if panes.len() <= 1 {
        return panes;
    }
    let Some(index) = panes.iter().position(|id| id == pane_id) else {
        return panes;
    };

    match direction {
        MoveDirection::Up if index > 0 => panes.swap(index, index - 1),
        MoveDirection::Down if index + 1 < panes.len() => panes.swap(index, index + 1),
        _ => {}
    }
    panes
}

pub fn remove_pane(pane_ids: &[String], pane_id: &str) -> Vec<String> {
    pane_ids.iter().filter(|id| *id != pane_id).cloned().collect()
}
