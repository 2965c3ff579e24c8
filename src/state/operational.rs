use serde::{Deserialize, Serialize};

/// Snapshot of what the backend control service is currently doing.
///
/// Fetched fresh on every poll tick and never cached past one render pass.
/// `streaming_and_recording` is its own mode reported by the backend, not the
/// conjunction of `streaming` and `recording`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationalState {
    pub streaming: bool,
    pub recording: bool,
    pub streaming_and_recording: bool,
    pub file_streaming: bool,
}

impl OperationalState {
    /// True when no operating mode is active
    pub fn is_idle(&self) -> bool {
        !(self.streaming || self.recording || self.streaming_and_recording || self.file_streaming)
    }
}
