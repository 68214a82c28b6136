use serde::{Deserialize, Serialize};

/// Command identifiers understood by the LED firmware.
///
/// Wire values match the firmware's command table; [`CommandId::None`] is a
/// host-side sentinel ("nothing to send") and is never put on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandId {
    /// All channels off.
    AllOff,
    /// All channels at full intensity.
    AllOn,
    /// Hold the given color.
    Steady,
    /// Blink the given color (blink timing is firmware-side).
    Blink,
    /// No command to send. Local sentinel, never transmitted.
    None,
}

impl CommandId {
    /// Wire value of this command.
    pub fn to_u8(&self) -> u8 {
        match self {
            CommandId::AllOff => 0,
            CommandId::AllOn => 1,
            CommandId::Steady => 2,
            CommandId::Blink => 3,
            CommandId::None => 255,
        }
    }

    /// Inverse of [`to_u8`](Self::to_u8). Returns `None` for bytes that are
    /// not in the command table.
    pub fn from_u8(value: u8) -> Option<CommandId> {
        match value {
            0 => Some(CommandId::AllOff),
            1 => Some(CommandId::AllOn),
            2 => Some(CommandId::Steady),
            3 => Some(CommandId::Blink),
            255 => Some(CommandId::None),
            _ => None,
        }
    }
}
