use serde::{Deserialize, Serialize};
use std::fmt;

/// One 8-bit value per channel. Channels are independent — there are no
/// relationship constraints between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Builds a color from unconstrained integers by masking each channel
    /// to its low 8 bits. Out-of-range input is truncated silently, never
    /// rejected: 300 → 44, -1 → 255, 256 → 0.
    pub const fn from_raw(red: i32, green: i32, blue: i32) -> Self {
        Self {
            red: red as u8,
            green: green as u8,
            blue: blue as u8,
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.red, self.green, self.blue)
    }
}
