//! # Lumen Serial
//!
//! The real serial transport: a [`Channel`] implementation over an OS
//! serial port, the [`PortOpener`] that creates it at the fixed link
//! configuration, and port enumeration for front-ends.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::todo
)]

pub mod constants;

use lumen_core::{Channel, Frame, OpenError, PortOpener, WriteError};
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::Write;
use std::time::Duration;

/// One open serial port. Owned exclusively by the session driver; the
/// inner handle is dropped on [`close`](Channel::close) and the wrapper
/// stays around so close remains idempotent.
#[derive(Debug)]
pub struct SerialChannel {
    name: String,
    port: Option<Box<dyn SerialPort>>,
}

impl Channel for SerialChannel {
    fn port_name(&self) -> &str {
        &self.name
    }

    fn write_frame(&mut self, frame: &Frame) -> Result<(), WriteError> {
        let Some(port) = self.port.as_mut() else {
            return Err(WriteError::Disconnected {
                port: self.name.clone(),
                reason: "channel already closed".into(),
            });
        };

        // one blocking send per frame; partial acceptance is a failure,
        // not something to retry here
        let bytes = frame.as_bytes();
        match port.write(bytes) {
            Ok(written) if written == bytes.len() => {
                log::debug!("wrote frame to {}: {}", self.name, frame.to_hex());
                Ok(())
            }
            Ok(written) => Err(WriteError::Incomplete {
                port: self.name.clone(),
                written,
                expected: bytes.len(),
            }),
            Err(e) => Err(WriteError::Disconnected {
                port: self.name.clone(),
                reason: e.to_string(),
            }),
        }
    }

    fn close(&mut self) {
        if let Some(port) = self.port.take() {
            drop(port);
            log::debug!("closed {}", self.name);
        }
    }
}

impl Drop for SerialChannel {
    fn drop(&mut self) {
        self.close();
    }
}

/// Opens channels on real hardware at the fixed 9600/8N1 configuration.
pub struct SerialOpener;

impl PortOpener for SerialOpener {
    type Channel = SerialChannel;

    fn open(&mut self, port_name: &str) -> Result<SerialChannel, OpenError> {
        if port_name.is_empty() {
            return Err(OpenError::EmptyPortName);
        }

        match serialport::new(port_name, constants::BAUD_RATE)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(Duration::from_millis(constants::WRITE_TIMEOUT_MS))
            .open()
        {
            Ok(port) => {
                log::debug!("opened {} at {} baud", port_name, constants::BAUD_RATE);
                Ok(SerialChannel {
                    name: port_name.to_string(),
                    port: Some(port),
                })
            }
            Err(e) => {
                log::warn!("open {} failed: {}", port_name, e);
                Err(OpenError::Unavailable {
                    port: port_name.to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }
}

/// Names of the serial ports currently present, sorted so dropdowns and
/// console listings are stable across runs. Enumeration failure is logged
/// and reported as "no ports" — the operator can retry by rescanning.
pub fn list_ports() -> Vec<String> {
    match serialport::available_ports() {
        Ok(ports) => {
            let mut names: Vec<String> = ports.into_iter().map(|p| p.port_name).collect();
            names.sort();
            names
        }
        Err(e) => {
            log::warn!("port enumeration failed: {e}");
            Vec::new()
        }
    }
}
