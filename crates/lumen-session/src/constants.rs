//! Session loop timing constants.

/// Bounded wait for one event poll.
///
/// **Value**: 1000 ms
///
/// **Rationale**: the loop must wake periodically even when the operator
/// is idle, so status display and any future housekeeping stay live. One
/// second is generous — nothing in the loop depends on the poll returning
/// promptly, and a shorter interval only burns wakeups. Liveness only,
/// never correctness: every decision is made from the event and the panel
/// state at poll time, not from elapsed time.
pub const POLL_INTERVAL_MS: u64 = 1_000;
