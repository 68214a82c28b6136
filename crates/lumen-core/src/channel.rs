use crate::Frame;
use thiserror::Error;

/// Failure to open a named port. Busy, nonexistent, and permission-denied
/// all collapse into [`OpenError::Unavailable`] — the session reports them
/// identically and the operator picks again.
#[derive(Error, Debug)]
pub enum OpenError {
    #[error("no port selected")]
    EmptyPortName,
    #[error("unable to open {port}: {reason}")]
    Unavailable { port: String, reason: String },
}

/// Failure while transmitting one frame.
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("write to {port} failed: {reason}")]
    Disconnected { port: String, reason: String },
    #[error("short write to {port}: {written} of {expected} bytes accepted")]
    Incomplete {
        port: String,
        written: usize,
        expected: usize,
    },
}

/// One open serial connection to a named port.
///
/// A channel is exclusively owned by the session driver, so there is never
/// more than one writer. Writes are one blocking send per frame — no
/// buffering, no queueing, no retry at this layer.
pub trait Channel {
    /// Name of the underlying port, for status and log lines.
    fn port_name(&self) -> &str;

    /// Transmit all bytes of `frame`, in order.
    fn write_frame(&mut self, frame: &Frame) -> Result<(), WriteError>;

    /// Release the underlying device. Idempotent: closing an already-closed
    /// channel is a no-op, not an error.
    fn close(&mut self);
}

/// Factory seam for opening channels by port name, at the fixed link
/// configuration. Lets the session driver run against mock channels in
/// tests and real serial ports in the binary.
pub trait PortOpener {
    type Channel: Channel;

    fn open(&mut self, port_name: &str) -> Result<Self::Channel, OpenError>;
}
