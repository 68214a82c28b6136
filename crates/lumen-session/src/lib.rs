//! # Lumen Session
//!
//! The session layer: the one mutable [`SessionState`] of a running
//! session and the [`SessionDriver`] that steps it. The driver owns the
//! three front-end seams, the port opener, and the channel; everything it
//! does is driven by one bounded event poll per loop iteration.
//!
//! ## Control Flow
//!
//! ```text
//! front-end ──UiEvent──► driver ──classify──► Action
//!                          │
//!                          ├─ Send:     force panel? → read panel → encode → write
//!                          ├─ Reselect: close old once → open new → fall back on failure
//!                          └─ Quit:     close → Terminated
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::todo
)]

pub mod constants;
pub mod driver;
pub mod state;

pub use driver::SessionDriver;
pub use state::SessionState;
