//! # Style Override Table
//!
//! Per pane, per tag, a set of named CSS-property arrays whose index is the
//! occurrence ordinal of the tag in the document. Every structural edit must
//! shuffle these arrays in lock-step with the tree.
//!
//! ## Invariant
//!
//! For every styleable tag present in the payload:
//! `override[property].len() == count == occurrences of tag in the render tree`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use storykeep_evaluator::{is_styleable, OrdinalLookup};
use tracing::debug;

/// A single responsive value slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TupleValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

/// Responsive value tuple (mobile, tablet, desktop)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tuple(pub Vec<Option<TupleValue>>);

impl Tuple {
    pub fn text(values: &[&str]) -> Self {
        Tuple(
            values
                .iter()
                .map(|v| Some(TupleValue::Text(v.to_string())))
                .collect(),
        )
    }
}

/// One slot per occurrence of a tag
pub type OverrideArray = Vec<Option<Tuple>>;

/// Styles of one tag
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagStyles {
    /// Tag-level classes, shared by every occurrence
    #[serde(default)]
    pub classes: BTreeMap<String, Tuple>,

    /// Per-occurrence overrides
    #[serde(default, rename = "override")]
    pub overrides: BTreeMap<String, OverrideArray>,

    #[serde(default)]
    pub count: usize,
}

/// Styles carried by one occurrence while it moves between positions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarriedStyle {
    pub tag: String,
    /// Override value of this occurrence per property
    pub values: BTreeMap<String, Option<Tuple>>,
    /// Tag-level classes of the source bucket
    pub classes: BTreeMap<String, Tuple>,
    /// Whether the source payload had a bucket for the tag at all
    pub has_bucket: bool,
}

/// Map from tag name to its styles
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StylePayload(pub BTreeMap<String, TagStyles>);

/// Anchor payload attached to a link target
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonData {
    #[serde(default)]
    pub url_target: String,
    #[serde(default)]
    pub callback_payload: String,
    #[serde(default)]
    pub class_name: String,
    #[serde(default)]
    pub class_names_payload: BTreeMap<String, TagStyles>,
}

/// Options payload of one pane
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanePayload {
    #[serde(default)]
    pub class_names_payload: StylePayload,
    #[serde(default)]
    pub buttons: BTreeMap<String, ButtonData>,
}

/// Read a slot, `None` when out of range
pub fn extract_at(array: &[Option<Tuple>], idx: usize) -> Option<Tuple> {
    array.get(idx).cloned().flatten()
}

/// Append `None` or pop from the end until the length matches
pub fn resize_to_count(array: &mut OverrideArray, count: usize) {
    array.resize(count, None);
}

pub fn swap(array: &mut OverrideArray, i: usize, j: usize) {
    if i < array.len() && j < array.len() {
        array.swap(i, j);
    }
}

/// Exchange two adjacent runs `[start, start + left)` and
/// `[start + left, start + left + right)`; equivalent to `swap` for runs of one
pub fn swap_runs(array: &mut OverrideArray, start: usize, left: usize, right: usize) {
    let end = start + left + right;
    if left == 0 || right == 0 || end > array.len() {
        return;
    }
    array[start..end].rotate_left(left);
}

/// Insert at the front, then trim from the end to `max_len`
pub fn unshift_with_trim(array: &mut OverrideArray, value: Option<Tuple>, max_len: usize) {
    insert_at(array, 0, value, max_len);
}

/// Insert at `idx` (padding with `None` when the array is short), then trim to `max_len`
pub fn insert_at(array: &mut OverrideArray, idx: usize, value: Option<Tuple>, max_len: usize) {
    if array.len() < idx {
        array.resize(idx, None);
    }
    array.insert(idx, value);
    array.truncate(max_len);
}

pub fn remove_at(array: &mut OverrideArray, idx: usize) -> Option<Tuple> {
    if idx < array.len() {
        array.remove(idx)
    } else {
        None
    }
}

impl StylePayload {
    pub fn get(&self, tag: &str) -> Option<&TagStyles> {
        self.0.get(tag)
    }

    pub fn get_mut(&mut self, tag: &str) -> Option<&mut TagStyles> {
        self.0.get_mut(tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Snapshot the styles of occurrence `ordinal` of `tag`
    pub fn carried(&self, tag: &str, ordinal: usize) -> CarriedStyle {
        match self.0.get(tag) {
            Some(styles) => CarriedStyle {
                tag: tag.to_string(),
                values: styles
                    .overrides
                    .iter()
                    .map(|(key, array)| (key.clone(), extract_at(array, ordinal)))
                    .collect(),
                classes: styles.classes.clone(),
                has_bucket: true,
            },
            None => CarriedStyle {
                tag: tag.to_string(),
                ..CarriedStyle::default()
            },
        }
    }

    /// Exchange the runs of two adjacent sibling subtrees in every override array of `tag`
    pub fn swap_runs(&mut self, tag: &str, start: usize, left: usize, right: usize) {
        if let Some(styles) = self.0.get_mut(tag) {
            for array in styles.overrides.values_mut() {
                swap_runs(array, start, left, right);
            }
        }
    }

    /// Drop the slot of a removed occurrence
    pub fn remove_slot(&mut self, tag: &str, ordinal: usize) {
        if let Some(styles) = self.0.get_mut(tag) {
            for array in styles.overrides.values_mut() {
                remove_at(array, ordinal);
            }
            styles.count = styles.count.saturating_sub(1);
        }
    }

    /// Open a slot for a new occurrence of `tag`, keeping later slots attached
    /// to their elements. Values for properties missing from the bucket create
    /// the property with `None` elsewhere.
    pub fn insert_slot(
        &mut self,
        tag: &str,
        ordinal: usize,
        values: &BTreeMap<String, Option<Tuple>>,
        count: usize,
    ) {
        let carries_values = values.values().any(Option::is_some);
        if !self.0.contains_key(tag) && !carries_values {
            return;
        }

        let styles = self.0.entry(tag.to_string()).or_default();
        for key in values.keys() {
            styles
                .overrides
                .entry(key.clone())
                .or_insert_with(|| vec![None; count.saturating_sub(1)]);
        }
        for (key, array) in styles.overrides.iter_mut() {
            let value = values.get(key).cloned().flatten();
            insert_at(array, ordinal, value, count);
            resize_to_count(array, count);
        }
        styles.count = count;
    }

    /// Merge a moved element's styles into `dest_tag` at `ordinal`
    ///
    /// Key set is the union of the destination overrides with the source
    /// overrides and classes. The new slot is seeded with the source override,
    /// or with the source class tuple when the destination is a list item.
    pub fn fix_payload_overrides(
        &mut self,
        carried: &CarriedStyle,
        dest_tag: &str,
        ordinal: usize,
        count: usize,
    ) {
        if !carried.has_bucket {
            self.insert_slot(dest_tag, ordinal, &BTreeMap::new(), count);
            return;
        }

        let styles = self.0.entry(dest_tag.to_string()).or_default();
        let mut keys: Vec<String> = styles.overrides.keys().cloned().collect();
        for key in carried.values.keys().chain(carried.classes.keys()) {
            if !keys.contains(key) {
                keys.push(key.clone());
            }
        }

        let to_list_item = dest_tag == "li";
        for key in keys {
            let array = styles
                .overrides
                .entry(key.clone())
                .or_insert_with(|| vec![None; count.saturating_sub(1)]);
            let seed = carried.values.get(&key).cloned().flatten().or_else(|| {
                if to_list_item {
                    carried.classes.get(&key).cloned()
                } else {
                    None
                }
            });
            insert_at(array, ordinal, seed, count);
            resize_to_count(array, count);
        }

        debug!(
            from = %carried.tag,
            to = %dest_tag,
            ordinal,
            count,
            "Merged carried overrides"
        );
        styles.count = count;
    }

    /// Ensure the destination bucket knows every class property of the source
    pub fn fix_style_classes(&mut self, carried: &CarriedStyle, dest_tag: &str) {
        if carried.classes.is_empty() {
            return;
        }
        let styles = self.0.entry(dest_tag.to_string()).or_default();
        for key in carried.classes.keys() {
            styles
                .classes
                .entry(key.clone())
                .or_insert_with(|| Tuple(vec![None]));
        }
    }

    /// Recount every styleable bucket and pad or trim its arrays
    pub fn reconcile(&mut self, lookup: &OrdinalLookup) {
        for (tag, styles) in self.0.iter_mut() {
            if !is_styleable(tag) {
                continue;
            }
            let count = lookup.count(tag);
            if styles.count != count {
                debug!(tag = %tag, from = styles.count, to = count, "Reconciled tag count");
            }
            styles.count = count;
            for array in styles.overrides.values_mut() {
                resize_to_count(array, count);
            }
        }
    }

    /// True when any tag carries per-occurrence overrides
    pub fn has_any_overrides(&self) -> bool {
        self.0.values().any(|styles| !styles.overrides.is_empty())
    }
}
