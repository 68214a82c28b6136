//! Seams between the session driver and whatever front-end is attached.
//! The GUI (or console, or test script) lives behind these three traits;
//! the driver never sees widgets.

use crate::events::{Mode, UiEvent};
use lumen_core::Rgb;
use std::time::Duration;

/// Produces operator events. One call = one bounded poll: blocks up to
/// `timeout` and returns `None` when nothing happened, so the driver stays
/// live even when the operator is idle.
pub trait InputSource {
    fn next_event(&mut self, timeout: Duration) -> Option<UiEvent>;
}

/// Read/force access to the operator-facing controls. Reads return what
/// the operator currently sees; `force` is the All-On/All-Off side effect
/// that rewrites the visible controls before the send.
pub trait ControlPanel {
    /// Current slider values, each already in [0, 255].
    fn color(&self) -> Rgb;

    /// Current mode radio selection.
    fn mode(&self) -> Mode;

    fn force(&mut self, mode: Mode, color: Rgb);
}

/// Displays one status line to the operator. Fire-and-forget — there is no
/// acknowledgement and no failure path.
pub trait StatusSink {
    fn publish(&mut self, text: &str);
}
