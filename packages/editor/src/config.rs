use crate::history::HistoryPolicy;
use crate::EditorError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub const MS_BETWEEN_UNDO: i64 = 6000;
pub const MAX_HISTORY_LENGTH: usize = 10;

/// Content kinds the insert tool can add
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolAddMode {
    P,
    H2,
    H3,
    H4,
    Img,
    Signup,
    Yt,
    Bunny,
    Belief,
    Identify,
    Toggle,
    Aside,
}

impl ToolAddMode {
    pub const ALL: [ToolAddMode; 12] = [
        ToolAddMode::P,
        ToolAddMode::H2,
        ToolAddMode::H3,
        ToolAddMode::H4,
        ToolAddMode::Img,
        ToolAddMode::Signup,
        ToolAddMode::Yt,
        ToolAddMode::Bunny,
        ToolAddMode::Belief,
        ToolAddMode::Identify,
        ToolAddMode::Toggle,
        ToolAddMode::Aside,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolAddMode::P => "p",
            ToolAddMode::H2 => "h2",
            ToolAddMode::H3 => "h3",
            ToolAddMode::H4 => "h4",
            ToolAddMode::Img => "img",
            ToolAddMode::Signup => "signup",
            ToolAddMode::Yt => "yt",
            ToolAddMode::Bunny => "bunny",
            ToolAddMode::Belief => "belief",
            ToolAddMode::Identify => "identify",
            ToolAddMode::Toggle => "toggle",
            ToolAddMode::Aside => "aside",
        }
    }

    /// Seed markup inserted for this kind
    pub fn default_markup(&self) -> &'static str {
        match self {
            ToolAddMode::P => "...",
            ToolAddMode::H2 => "## title",
            ToolAddMode::H3 => "### subtitle",
            ToolAddMode::H4 => "#### section title",
            ToolAddMode::Img => "![Descriptive title](filename)",
            ToolAddMode::Signup => "* `signup(Major Updates Only|Keep in touch!|false)`",
            ToolAddMode::Yt => "* `youtube(tag|title)`",
            ToolAddMode::Bunny => "* `bunny(id|title)`",
            ToolAddMode::Belief => "* `belief(BeliefTag|likert|prompt)`",
            ToolAddMode::Identify => "* `identifyAs(BeliefTag|TARGET_VALUE|prompt)`",
            ToolAddMode::Toggle => "* `toggle(BeliefTag|prompt)`",
            ToolAddMode::Aside => "...",
        }
    }

    /// Render tag of the inserted element
    pub fn tag(&self) -> &'static str {
        match self {
            ToolAddMode::Img => "img",
            ToolAddMode::Signup
            | ToolAddMode::Yt
            | ToolAddMode::Bunny
            | ToolAddMode::Belief
            | ToolAddMode::Identify
            | ToolAddMode::Toggle => "code",
            ToolAddMode::Aside => "li",
            other => other.as_str(),
        }
    }

    /// Widgets that need the settings panel right after insertion
    pub fn is_configurable(&self) -> bool {
        matches!(
            self,
            ToolAddMode::Img
                | ToolAddMode::Yt
                | ToolAddMode::Bunny
                | ToolAddMode::Belief
                | ToolAddMode::Identify
                | ToolAddMode::Toggle
        )
    }
}

impl fmt::Display for ToolAddMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolAddMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolAddMode::ALL
            .iter()
            .find(|mode| mode.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown insert kind '{}'", s))
    }
}

fn default_ms_between_undo() -> i64 {
    MS_BETWEEN_UNDO
}

fn default_max_history_length() -> usize {
    MAX_HISTORY_LENGTH
}

fn default_insert_defaults() -> BTreeMap<ToolAddMode, String> {
    ToolAddMode::ALL
        .iter()
        .map(|mode| (*mode, mode.default_markup().to_string()))
        .collect()
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    #[serde(default = "default_ms_between_undo")]
    pub ms_between_undo: i64,

    #[serde(default = "default_max_history_length")]
    pub max_history_length: usize,

    /// Seed markup per insert kind; a configured map replaces the built-in table
    #[serde(default = "default_insert_defaults")]
    pub insert_defaults: BTreeMap<ToolAddMode, String>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            ms_between_undo: default_ms_between_undo(),
            max_history_length: default_max_history_length(),
            insert_defaults: default_insert_defaults(),
        }
    }
}

impl EditorConfig {
    pub fn history_policy(&self) -> HistoryPolicy {
        HistoryPolicy {
            ms_between_undo: self.ms_between_undo,
            max_history_length: self.max_history_length,
        }
    }

    pub fn insert_default(&self, kind: ToolAddMode) -> Result<&str, EditorError> {
        self.insert_defaults
            .get(&kind)
            .map(String::as_str)
            .ok_or_else(|| EditorError::MissingInsertDefault(kind.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        let config = serde_json::from_str(json).map_err(crate::StoreError::from)?;
        Ok(config)
    }

    /// Load from a JSON file, defaults when the file does not exist
    pub fn load(path: &Path) -> Result<Self, EditorError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(crate::StoreError::from)?;
        Self::from_json(&content)
    }
}
