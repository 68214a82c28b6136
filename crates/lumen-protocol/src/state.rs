use serde::{Deserialize, Serialize};
use thiserror::Error;

/// # Session Phase Machine
///
/// One session = one pass through this machine. The phase is the single
/// source of truth for what the driver does with the next polled event;
/// the channel handle that accompanies `Active` is owned by the session
/// state, not the phase value.
///
/// ## Phase Transition Diagram
///
/// ```text
///                    open succeeds
///   ┌────────────────────────────────────┐
///   │                                    ▼
/// ┌─┴──────────────────────┐      ┌────────────┐
/// │ AwaitingPortSelection  │◄─────┤   Active   │
/// └─┬──────────────────────┘      └──────┬─────┘
///   │          reselect / write failure  │
///   │ quit                               │ quit
///   ▼                                    ▼
/// ┌────────────────────────────────────────────┐
/// │                 Terminated                  │
/// └────────────────────────────────────────────┘
/// ```
///
/// ## Phase Invariants
///
/// - **AwaitingPortSelection**: no channel open; only a port selection or
///   quit does anything, everything else is ignored
/// - **Active**: exactly one channel open; every qualifying event produces
///   exactly one frame and one write
/// - **Terminated**: no channel open; terminal, nothing leaves it
///
/// An open failure while awaiting selection is NOT a transition — the
/// phase stays put and the failure is reported as status text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Waiting for the operator to pick a port.
    AwaitingPortSelection,

    /// A channel is open and commands flow.
    Active,

    /// Session over; the process exits cleanly.
    Terminated,
}

impl SessionPhase {
    /// Validate if a transition to `next` is allowed from this phase.
    /// Re-entering the current phase is not a transition and is rejected.
    pub fn can_transition_to(&self, next: SessionPhase) -> bool {
        use SessionPhase::*;

        match (self, next) {
            // From AwaitingPortSelection
            (AwaitingPortSelection, Active) => true, // open succeeded
            (AwaitingPortSelection, Terminated) => true, // quit while selecting

            // From Active
            (Active, AwaitingPortSelection) => true, // reselect or write failure
            (Active, Terminated) => true,            // quit

            // Terminated is terminal; everything else is invalid
            _ => false,
        }
    }

    /// User-facing status text for entering this phase.
    pub fn status_text(&self) -> &'static str {
        match self {
            SessionPhase::AwaitingPortSelection => "select COM port",
            SessionPhase::Active => "port open",
            SessionPhase::Terminated => "closed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionPhase::Terminated)
    }
}

/// A phase transition the machine rejected. Reaching this is a driver bug,
/// not an operator error; the driver logs it and keeps the old phase.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("invalid phase transition: {from:?} → {to:?}")]
pub struct TransitionError {
    pub from: SessionPhase,
    pub to: SessionPhase,
}
