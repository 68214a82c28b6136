//! Link configuration constants. The wire configuration is agreed with the
//! LED firmware and is not user-selectable — changing either value here
//! without reflashing the device breaks the link.

/// Line rate of the firmware's virtual COM port.
///
/// **Value**: 9600 baud
///
/// **Rationale**: the device enumerates as USB CDC, where the nominal rate
/// is mostly a formality, but both ends have always been configured for
/// 9600/8N1 and the firmware never renegotiates. Keep both sides agreeing.
pub const BAUD_RATE: u32 = 9_600;

/// Timeout applied to one blocking frame write.
///
/// **Value**: 1000 ms
///
/// **Rationale**: a 9-byte frame at any plausible rate completes in
/// microseconds; if a write has not finished after a full second, the
/// device is gone and the caller should hear about it rather than hang.
pub const WRITE_TIMEOUT_MS: u64 = 1_000;
