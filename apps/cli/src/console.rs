//! Console rendition of the operator controls: a line grammar on stdin
//! parsed into session events, slider state behind a shared mutex, status
//! lines on stdout.
//!
//! A reader thread turns stdin lines into [`UiEvent`]s and pushes them
//! through an mpsc channel; the session driver polls the receiving end
//! with a timeout, which keeps the single-consumer, bounded-wait loop.

use lumen_core::Rgb;
use lumen_protocol::{ColorChannel, ControlPanel, InputSource, Mode, StatusSink, UiEvent};
use std::io::BufRead;
use std::sync::mpsc;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Forwarded to the session as-is.
    Event(UiEvent),
    /// Set one slider. The value is masked to 8 bits like any raw input.
    SetChannel(ColorChannel, i32),
    ListPorts,
    Help,
    Empty,
    Unknown(String),
}

/// Grammar, one command per line:
///
/// ```text
/// ports            list serial ports
/// open <port>      open a port (reselects when one is already open)
/// r|g|b <value>    set one color channel
/// steady | blink   pick the display mode
/// on | off         all channels full / dark
/// quit             end the session (EOF does the same)
/// ```
pub fn parse_line(line: &str) -> ConsoleCommand {
    let mut words = line.split_whitespace();
    let Some(keyword) = words.next() else {
        return ConsoleCommand::Empty;
    };
    let arg = words.next();

    match (keyword, arg) {
        ("ports", None) => ConsoleCommand::ListPorts,
        ("open", Some(port)) => ConsoleCommand::Event(UiEvent::PortChosen(port.to_string())),
        ("r" | "g" | "b", Some(value)) => match value.parse::<i32>() {
            Ok(value) => {
                let channel = match keyword {
                    "r" => ColorChannel::Red,
                    "g" => ColorChannel::Green,
                    _ => ColorChannel::Blue,
                };
                ConsoleCommand::SetChannel(channel, value)
            }
            Err(_) => ConsoleCommand::Unknown(line.trim().to_string()),
        },
        ("steady", None) => ConsoleCommand::Event(UiEvent::ModeChanged(Mode::Steady)),
        ("blink", None) => ConsoleCommand::Event(UiEvent::ModeChanged(Mode::Blink)),
        ("on", None) => ConsoleCommand::Event(UiEvent::AllOnPressed),
        ("off", None) => ConsoleCommand::Event(UiEvent::AllOffPressed),
        ("quit" | "exit", None) => ConsoleCommand::Event(UiEvent::Quit),
        ("help", None) => ConsoleCommand::Help,
        _ => ConsoleCommand::Unknown(line.trim().to_string()),
    }
}

#[derive(Debug, Clone, Copy)]
struct PanelState {
    mode: Mode,
    color: Rgb,
}

/// Slider and mode state shared between the stdin thread (writes) and the
/// driver's panel seam (reads and the All-On/All-Off force).
#[derive(Clone)]
pub struct SharedPanel {
    state: Arc<Mutex<PanelState>>,
}

impl SharedPanel {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(PanelState {
                mode: Mode::Steady,
                color: Rgb::BLACK,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PanelState> {
        // a poisoning writer can only have stored a complete PanelState
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn set_mode(&self, mode: Mode) {
        self.lock().mode = mode;
    }

    /// Set one channel from a raw console value, masked to 8 bits.
    pub fn set_channel(&self, channel: ColorChannel, value: i32) {
        let masked = value as u8;
        let mut state = self.lock();
        match channel {
            ColorChannel::Red => state.color.red = masked,
            ColorChannel::Green => state.color.green = masked,
            ColorChannel::Blue => state.color.blue = masked,
        }
    }
}

impl Default for SharedPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlPanel for SharedPanel {
    fn color(&self) -> Rgb {
        self.lock().color
    }

    fn mode(&self) -> Mode {
        self.lock().mode
    }

    fn force(&mut self, mode: Mode, color: Rgb) {
        *self.lock() = PanelState { mode, color };
    }
}

/// Receiving end of the stdin event pump.
pub struct ConsoleInput {
    rx: mpsc::Receiver<UiEvent>,
}

impl InputSource for ConsoleInput {
    fn next_event(&mut self, timeout: Duration) -> Option<UiEvent> {
        self.rx.recv_timeout(timeout).ok()
    }
}

/// Spawns the stdin reader and returns the driver's input seam. A port
/// given on the command line is injected ahead of any typed input.
pub fn spawn_stdin_reader(panel: SharedPanel, preselect: Option<String>) -> ConsoleInput {
    let (tx, rx) = mpsc::channel();

    if let Some(port) = preselect {
        let _ = tx.send(UiEvent::PortChosen(port));
    }

    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match parse_line(&line) {
                ConsoleCommand::Event(event) => {
                    // the mode radio lives in the panel; update it before
                    // the event is classified against it
                    if let UiEvent::ModeChanged(mode) = &event {
                        panel.set_mode(*mode);
                    }
                    let quit = matches!(event, UiEvent::Quit);
                    if tx.send(event).is_err() || quit {
                        break;
                    }
                }
                ConsoleCommand::SetChannel(channel, value) => {
                    panel.set_channel(channel, value);
                    if tx.send(UiEvent::SliderMoved(channel)).is_err() {
                        break;
                    }
                }
                ConsoleCommand::ListPorts => print_ports(),
                ConsoleCommand::Help => print_help(),
                ConsoleCommand::Empty => {}
                ConsoleCommand::Unknown(text) => {
                    eprintln!("unrecognized input: {text} (try \"help\")");
                }
            }
        }
        // stdin gone is the operator leaving
        let _ = tx.send(UiEvent::Quit);
    });

    ConsoleInput { rx }
}

/// Prints status lines as they come; fire-and-forget.
pub struct ConsoleStatus;

impl StatusSink for ConsoleStatus {
    fn publish(&mut self, text: &str) {
        println!("{text}");
    }
}

pub fn print_ports() {
    let ports = lumen_serial::list_ports();
    if ports.is_empty() {
        println!("no serial ports found");
    } else {
        for port in ports {
            println!("{port}");
        }
    }
}

pub fn print_help() {
    println!("commands:");
    println!("  ports            list serial ports");
    println!("  open <port>      open a port");
    println!("  r|g|b <value>    set a color channel (0-255)");
    println!("  steady | blink   pick the display mode");
    println!("  on | off         all channels full / dark");
    println!("  quit             end the session");
}
