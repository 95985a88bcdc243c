//! Side-channel signals raised by operations for the surrounding UI

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EditorSignal {
    /// Open the settings panel for a freshly inserted widget
    #[serde(rename_all = "camelCase")]
    OpenSettings {
        pane_id: String,
        outer_idx: usize,
        idx: usize,
        global_nth: usize,
        tag: String,
        must_config: bool,
    },
}

/// Receiver of editor signals
pub trait SignalSink {
    fn emit(&mut self, signal: EditorSignal);
}

impl SignalSink for Vec<EditorSignal> {
    fn emit(&mut self, signal: EditorSignal) {
        self.push(signal);
    }
}

/// Sink that drops every signal
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSignals;

impl SignalSink for NoSignals {
    fn emit(&mut self, _signal: EditorSignal) {}
}
