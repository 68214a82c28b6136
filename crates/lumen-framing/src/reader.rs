use crate::verify;
use lumen_core::Frame;

/// Streaming parser for the receive side of the link: finds the start
/// marker in an arbitrary byte stream, collects a full frame, and emits it
/// once the checksum holds.
///
/// On a checksum mismatch the candidate's marker byte is discarded and
/// scanning resumes one byte later, so a real frame starting inside a
/// corrupted window is still found.
pub struct FrameReader {
    buffer: Vec<u8>,
}

impl FrameReader {
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(Frame::LEN * 4),
        }
    }

    /// Ingest new bytes and return any complete, checksum-valid frames.
    /// Accepts arbitrary chunking, byte-at-a-time included.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<Frame> {
        self.buffer.extend_from_slice(bytes);
        let mut frames = Vec::new();

        loop {
            match self.buffer.iter().position(|&b| b == Frame::START_MARKER) {
                Some(start) => {
                    self.buffer.drain(..start);
                }
                None => {
                    // nothing resembling a frame; drop the noise
                    self.buffer.clear();
                    return frames;
                }
            }

            if self.buffer.len() < Frame::LEN {
                // marker seen, remainder still in flight
                return frames;
            }

            let mut candidate = [0u8; Frame::LEN];
            candidate.copy_from_slice(&self.buffer[..Frame::LEN]);
            let frame = Frame::from_bytes(candidate);

            if verify(&frame) {
                self.buffer.drain(..Frame::LEN);
                frames.push(frame);
            } else {
                // false marker: skip it and rescan
                self.buffer.drain(..1);
            }
        }
    }

    /// Clear any partially collected frame.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }
}

impl Default for FrameReader {
    fn default() -> Self {
        Self::new()
    }
}
