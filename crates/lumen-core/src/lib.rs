//! Shared vocabulary for the lumen workspace: the wire frame, command
//! identifiers, color values, and the channel seams the session driver
//! talks through. No I/O lives here.

use serde::{Deserialize, Serialize};

pub mod channel;
pub mod color;
pub mod command;

pub use channel::{Channel, OpenError, PortOpener, WriteError};
pub use color::Rgb;
pub use command::CommandId;

/// One command frame as it travels over the serial link.
///
/// Layout (9 bytes):
///
/// ```text
/// [ 0x02 | cmd | red | green | blue | crc0 | crc1 | crc2 | crc3 ]
///    0      1     2      3      4      5      6      7      8
/// ```
///
/// The four CRC bytes are the little-endian CRC-32 of the first
/// [`Frame::CRC_WINDOW`] bytes. The blue byte sits outside that window —
/// the firmware's framing was built that way and the window must not be
/// widened here, or the device stops accepting frames.
///
/// A frame is built once and sent once; it is never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    bytes: [u8; Frame::LEN],
}

impl Frame {
    /// Total frame length on the wire.
    pub const LEN: usize = 9;
    /// First byte of every frame.
    pub const START_MARKER: u8 = 0x02;
    /// Number of leading bytes covered by the checksum (marker, cmd, red,
    /// green — blue excluded).
    pub const CRC_WINDOW: usize = 4;

    pub fn from_bytes(bytes: [u8; Frame::LEN]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; Frame::LEN] {
        &self.bytes
    }

    /// Raw command id byte (offset 1).
    pub fn command_code(&self) -> u8 {
        let [_, cmd, ..] = self.bytes;
        cmd
    }

    /// Color payload (offsets 2..5).
    pub fn color(&self) -> Rgb {
        let [_, _, red, green, blue, ..] = self.bytes;
        Rgb::new(red, green, blue)
    }

    /// Checksum decoded from the trailing four bytes (little-endian).
    pub fn crc(&self) -> u32 {
        let [_, _, _, _, _, c0, c1, c2, c3] = self.bytes;
        u32::from_le_bytes([c0, c1, c2, c3])
    }

    /// Lowercase contiguous hex of the whole frame, e.g. `0202800000b25b4ab3`.
    /// This is the rendering used in status lines.
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}
