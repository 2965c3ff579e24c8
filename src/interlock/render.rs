use serde::{Deserialize, Serialize};

use super::control::{ControlId, ControlStyle, Mode};
use crate::error::{PanelError, Result};
use crate::state::OperationalState;

/// Rendered state of a single control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlView {
    pub id: ControlId,
    pub element_id: String,
    pub label: String,
    pub pending_label: String,
    pub style: ControlStyle,
    pub enabled: bool,
    /// Carries the `disabled` CSS class in addition to the disabled attribute
    pub dimmed: bool,
    pub locked_by: Option<Mode>,
}

/// Page elements not tied to a single control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedView {
    /// `.recordingActions` elements
    pub recording_actions_visible: bool,
    /// Every `input` and `select`
    pub form_controls_enabled: bool,
    /// Every `.btn-primary` button
    pub primary_actions_enabled: bool,
}

/// Full panel derived from one state snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelView {
    pub state: OperationalState,
    pub controls: Vec<ControlView>,
    pub shared: SharedView,
}

/// Renders the panel for `state`.
pub fn render(state: &OperationalState) -> PanelView {
    let controls = ControlId::ALL
        .into_iter()
        .map(|id| render_control(state, id))
        .collect();

    PanelView {
        state: *state,
        controls,
        shared: render_shared(state),
    }
}

fn render_control(state: &OperationalState, id: ControlId) -> ControlView {
    let active = id.is_active(state);
    let locked_by = Mode::locking(state, id);

    ControlView {
        id,
        element_id: id.element_id().to_string(),
        label: id.label(active).to_string(),
        pending_label: id.pending_label(active).to_string(),
        style: ControlStyle::for_active(active),
        enabled: locked_by.is_none(),
        dimmed: locked_by == Some(Mode::FileStreaming),
        locked_by,
    }
}

fn render_shared(state: &OperationalState) -> SharedView {
    let inputs_enabled = !state.recording;

    SharedView {
        recording_actions_visible: !(state.streaming_and_recording || state.recording),
        form_controls_enabled: inputs_enabled,
        primary_actions_enabled: inputs_enabled,
    }
}

impl PanelView {
    pub fn control(&self, id: ControlId) -> Option<&ControlView> {
        self.controls.iter().find(|c| c.id == id)
    }

    /// Controls that remain usable in this view
    pub fn enabled_controls(&self) -> Vec<ControlId> {
        self.controls
            .iter()
            .filter(|c| c.enabled)
            .map(|c| c.id)
            .collect()
    }

    /// Fails with `ControlLocked` when the interlock disables `control`
    pub fn ensure_unlocked(&self, control: ControlId) -> Result<()> {
        match self.control(control).and_then(|c| c.locked_by) {
            Some(mode) => Err(PanelError::ControlLocked {
                control: control.to_string(),
                mode: mode.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// View shown right after `initiator` was clicked and before the page
    /// reloads: every button is disabled and the initiator shows its
    /// pending label.
    pub fn in_flight(&self, initiator: ControlId) -> PanelView {
        let controls = self
            .controls
            .iter()
            .map(|c| {
                let mut c = c.clone();
                if c.id == initiator {
                    c.label = c.pending_label.clone();
                }
                c.enabled = false;
                c.dimmed = true;
                c
            })
            .collect();

        PanelView {
            state: self.state,
            controls,
            shared: SharedView {
                primary_actions_enabled: false,
                ..self.shared
            },
        }
    }
}
