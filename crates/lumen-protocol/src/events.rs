use lumen_core::{CommandId, Rgb};
use serde::{Deserialize, Serialize};

/// Display behavior the operator requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Hold the color constantly.
    Steady,
    /// Blink the color (timing lives in the firmware).
    Blink,
}

impl Mode {
    /// The command a color update carries under this mode.
    pub fn command(&self) -> CommandId {
        match self {
            Mode::Steady => CommandId::Steady,
            Mode::Blink => CommandId::Blink,
        }
    }

    pub fn is_steady(&self) -> bool {
        matches!(self, Mode::Steady)
    }
}

/// Which slider the operator moved. The payload is informational (logs);
/// sends always read the whole current color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorChannel {
    Red,
    Green,
    Blue,
}

/// Everything a front-end can tell the session. Closed vocabulary — there
/// is no stringly-typed widget key to mistype.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UiEvent {
    /// A port was picked while none is open.
    PortChosen(String),
    /// The port selection changed while a link is active.
    PortChanged(String),
    /// A color slider moved.
    SliderMoved(ColorChannel),
    /// The mode radio changed.
    ModeChanged(Mode),
    AllOnPressed,
    AllOffPressed,
    /// The operator closed the front-end.
    Quit,
}

/// Panel state the driver must impose before reading slider values —
/// the All-On/All-Off side effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForcedControls {
    pub mode: Mode,
    pub color: Rgb,
}

/// What the session driver must do with one polled event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Build a frame carrying `cmd` from the current slider values and
    /// write it to the active channel.
    Send {
        cmd: CommandId,
        force: Option<ForcedControls>,
    },
    /// Close the current channel and re-run port selection, trying `port`
    /// first.
    Reselect { port: String },
    /// Close the channel and end the session.
    Quit,
    /// Nothing to do this poll cycle.
    Idle,
}

/// The Active-phase decision table: maps one polled event (or a poll
/// timeout) to the action the driver takes. `mode` is the panel's current
/// mode radio at poll time.
///
/// All-On and All-Off both force the panel to Steady with the extreme
/// color AND still send their dedicated command id — the firmware treats
/// "all on" and "steady white" as different commands even though they look
/// the same on the device.
pub fn classify(event: Option<UiEvent>, mode: Mode) -> Action {
    let Some(event) = event else {
        return Action::Idle;
    };

    match event {
        UiEvent::PortChosen(port) | UiEvent::PortChanged(port) => Action::Reselect { port },
        UiEvent::SliderMoved(_) => Action::Send {
            cmd: mode.command(),
            force: None,
        },
        UiEvent::ModeChanged(mode) => Action::Send {
            cmd: mode.command(),
            force: None,
        },
        UiEvent::AllOnPressed => Action::Send {
            cmd: CommandId::AllOn,
            force: Some(ForcedControls {
                mode: Mode::Steady,
                color: Rgb::WHITE,
            }),
        },
        UiEvent::AllOffPressed => Action::Send {
            cmd: CommandId::AllOff,
            force: Some(ForcedControls {
                mode: Mode::Steady,
                color: Rgb::BLACK,
            }),
        },
        UiEvent::Quit => Action::Quit,
    }
}
