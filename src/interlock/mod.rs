//! Button interlock rendering
//!
//! Turns an [`OperationalState`](crate::state::OperationalState) into the
//! complete set of control labels, styles and enabled flags shown on the
//! panel. The whole view is re-derived on every update; nothing is patched
//! incrementally, so rendering the same state twice always yields the same
//! view.
//!
//! # Rules
//!
//! Each control is checked against the busy modes in precedence order
//! (stream & record, stream, record, file stream). The first active mode
//! owned by a *different* control locks it. Shared page elements
//! (recording actions, inputs, selects, primary buttons) are derived once
//! from the state flags rather than from any one control.

mod control;
mod render;

pub use control::{ControlId, ControlStyle, Mode};
pub use render::{render, ControlView, PanelView, SharedView};
