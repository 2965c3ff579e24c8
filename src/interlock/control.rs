use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PanelError;
use crate::state::OperationalState;

/// The four mode toggles on the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlId {
    Stream,
    StreamRecord,
    Record,
    FileStream,
}

/// A busy mode reported by the backend, in interlock precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    StreamingAndRecording,
    Streaming,
    Recording,
    FileStreaming,
}

/// Button styling; serialized as the CSS class the page applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlStyle {
    /// Mode running, button stops it
    #[serde(rename = "btn-danger")]
    Active,
    /// Mode idle, button starts it
    #[serde(rename = "btn-success")]
    Idle,
}

impl ControlId {
    pub const ALL: [ControlId; 4] = [
        ControlId::Stream,
        ControlId::StreamRecord,
        ControlId::Record,
        ControlId::FileStream,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ControlId::Stream => "stream",
            ControlId::StreamRecord => "stream_record",
            ControlId::Record => "record",
            ControlId::FileStream => "file_stream",
        }
    }

    /// DOM id of the button on the control page
    pub fn element_id(&self) -> &'static str {
        match self {
            ControlId::Stream => "stream_button",
            ControlId::StreamRecord => "stream_record_button",
            ControlId::Record => "record_button",
            ControlId::FileStream => "file_stream_button",
        }
    }

    /// The mode this control switches on and off
    pub fn mode(&self) -> Mode {
        match self {
            ControlId::Stream => Mode::Streaming,
            ControlId::StreamRecord => Mode::StreamingAndRecording,
            ControlId::Record => Mode::Recording,
            ControlId::FileStream => Mode::FileStreaming,
        }
    }

    pub fn is_active(&self, state: &OperationalState) -> bool {
        self.mode().is_on(state)
    }

    /// (active, idle) labels
    pub fn labels(&self) -> (&'static str, &'static str) {
        match self {
            ControlId::Stream => ("Stop Stream", "Start Stream"),
            ControlId::StreamRecord => ("Stop Stream & Record", "Start Stream & Record"),
            ControlId::Record => ("Stop Record", "Start Record"),
            ControlId::FileStream => ("Stop File Stream", "Start File Stream"),
        }
    }

    pub fn label(&self, active: bool) -> &'static str {
        let (stop, start) = self.labels();
        if active {
            stop
        } else {
            start
        }
    }

    /// Label shown between issuing a toggle and the next reload
    pub fn pending_label(&self, active: bool) -> &'static str {
        match (self, active) {
            (_, false) => "Starting...",
            (ControlId::Record | ControlId::StreamRecord, true) => "Finalizing Recording...",
            (ControlId::Stream | ControlId::FileStream, true) => "Stopping...",
        }
    }

    /// Gateway path segment that toggles this control
    pub fn toggle_path(&self) -> String {
        format!("toggle_{}", self.as_str())
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ControlId {
    type Err = PanelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ControlId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| PanelError::UnknownAction(s.to_string()))
    }
}

impl Mode {
    /// Busy modes in the order the interlock checks them
    pub const PRECEDENCE: [Mode; 4] = [
        Mode::StreamingAndRecording,
        Mode::Streaming,
        Mode::Recording,
        Mode::FileStreaming,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::StreamingAndRecording => "streaming_and_recording",
            Mode::Streaming => "streaming",
            Mode::Recording => "recording",
            Mode::FileStreaming => "file_streaming",
        }
    }

    pub fn is_on(&self, state: &OperationalState) -> bool {
        match self {
            Mode::StreamingAndRecording => state.streaming_and_recording,
            Mode::Streaming => state.streaming,
            Mode::Recording => state.recording,
            Mode::FileStreaming => state.file_streaming,
        }
    }

    /// The control allowed to stay usable while this mode runs
    pub fn owner(&self) -> ControlId {
        match self {
            Mode::StreamingAndRecording => ControlId::StreamRecord,
            Mode::Streaming => ControlId::Stream,
            Mode::Recording => ControlId::Record,
            Mode::FileStreaming => ControlId::FileStream,
        }
    }

    /// First active mode, in precedence order, that locks `control`
    pub fn locking(state: &OperationalState, control: ControlId) -> Option<Mode> {
        Mode::PRECEDENCE
            .into_iter()
            .find(|mode| mode.is_on(state) && mode.owner() != control)
    }
}

impl ControlStyle {
    pub fn for_active(active: bool) -> Self {
        if active {
            ControlStyle::Active
        } else {
            ControlStyle::Idle
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            ControlStyle::Active => "btn-danger",
            ControlStyle::Idle => "btn-success",
        }
    }
}
