//! # Lumen Protocol
//!
//! Typed interaction vocabulary for the lumen session. This crate defines
//! the closed event set a front-end produces, the pure classification of
//! those events into driver actions, and the session phase machine. It has
//! zero dependencies on I/O or UI frameworks, making every decision rule
//! testable without hardware.
//!
//! ## Architecture
//!
//! - **UiEvent**: closed event vocabulary (front-end → session)
//! - **classify**: the Active-phase decision table (event × mode → Action)
//! - **SessionPhase**: validated phase machine (pure logic, no side effects)
//! - **InputSource / ControlPanel / StatusSink**: front-end seams
//!
//! ## Event Flow
//!
//! ```text
//! front-end → UiEvent → classify → Action → session driver
//!                                              ↓
//!                                        status text → front-end
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::todo
)]

pub mod events;
pub mod state;
pub mod ui;

pub use events::{classify, Action, ColorChannel, ForcedControls, Mode, UiEvent};
pub use state::{SessionPhase, TransitionError};
pub use ui::{ControlPanel, InputSource, StatusSink};
