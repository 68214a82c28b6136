//! End-to-end session flows over scripted inputs and mock channels.
//!
//! Every mock writes into one shared journal, so ordering properties
//! (close-before-open, no write on a closed channel) are asserted against
//! a single timeline.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]

use lumen_core::{Channel, Frame, OpenError, PortOpener, Rgb, WriteError};
use lumen_protocol::{ColorChannel, ControlPanel, InputSource, Mode, StatusSink, UiEvent};
use lumen_session::SessionDriver;
use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};
use std::rc::Rc;
use std::time::Duration;

/// One observable thing the session did.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Op {
    Open(String),
    OpenFailed(String),
    Write(String, [u8; Frame::LEN]),
    Close(String),
}

type Journal = Rc<RefCell<Vec<Op>>>;

struct MockChannel {
    name: String,
    open: bool,
    fail_writes: bool,
    journal: Journal,
}

impl Channel for MockChannel {
    fn port_name(&self) -> &str {
        &self.name
    }

    fn write_frame(&mut self, frame: &Frame) -> Result<(), WriteError> {
        assert!(self.open, "write on closed channel {}", self.name);
        if self.fail_writes {
            return Err(WriteError::Disconnected {
                port: self.name.clone(),
                reason: "device unplugged".into(),
            });
        }
        self.journal
            .borrow_mut()
            .push(Op::Write(self.name.clone(), *frame.as_bytes()));
        Ok(())
    }

    fn close(&mut self) {
        if self.open {
            self.open = false;
            self.journal.borrow_mut().push(Op::Close(self.name.clone()));
        }
    }
}

struct MockOpener {
    journal: Journal,
    /// Ports whose open fails.
    failing: HashSet<String>,
    /// Ports that open fine but fail every write.
    flaky: HashSet<String>,
}

impl MockOpener {
    fn new(journal: &Journal) -> Self {
        Self {
            journal: Rc::clone(journal),
            failing: HashSet::new(),
            flaky: HashSet::new(),
        }
    }
}

impl PortOpener for MockOpener {
    type Channel = MockChannel;

    fn open(&mut self, port_name: &str) -> Result<MockChannel, OpenError> {
        if port_name.is_empty() {
            return Err(OpenError::EmptyPortName);
        }
        if self.failing.contains(port_name) {
            self.journal
                .borrow_mut()
                .push(Op::OpenFailed(port_name.into()));
            return Err(OpenError::Unavailable {
                port: port_name.into(),
                reason: "no such device".into(),
            });
        }
        self.journal.borrow_mut().push(Op::Open(port_name.into()));
        Ok(MockChannel {
            name: port_name.into(),
            open: true,
            fail_writes: self.flaky.contains(port_name),
            journal: Rc::clone(&self.journal),
        })
    }
}

/// Feeds a fixed event sequence; `None` entries model poll timeouts. An
/// exhausted script behaves like the operator closing the front-end, so a
/// test can never hang the loop.
struct ScriptedInput {
    events: VecDeque<Option<UiEvent>>,
}

impl ScriptedInput {
    fn new(events: Vec<Option<UiEvent>>) -> Self {
        Self {
            events: events.into(),
        }
    }

    fn of(events: Vec<UiEvent>) -> Self {
        Self::new(events.into_iter().map(Some).collect())
    }
}

impl InputSource for ScriptedInput {
    fn next_event(&mut self, _timeout: Duration) -> Option<UiEvent> {
        self.events.pop_front().unwrap_or(Some(UiEvent::Quit))
    }
}

#[derive(Clone)]
struct MockPanel {
    state: Rc<RefCell<(Mode, Rgb)>>,
}

impl MockPanel {
    fn new(mode: Mode, color: Rgb) -> Self {
        Self {
            state: Rc::new(RefCell::new((mode, color))),
        }
    }

    fn snapshot(&self) -> (Mode, Rgb) {
        *self.state.borrow()
    }
}

impl ControlPanel for MockPanel {
    fn color(&self) -> Rgb {
        self.state.borrow().1
    }

    fn mode(&self) -> Mode {
        self.state.borrow().0
    }

    fn force(&mut self, mode: Mode, color: Rgb) {
        *self.state.borrow_mut() = (mode, color);
    }
}

#[derive(Clone)]
struct RecordingStatus {
    lines: Rc<RefCell<Vec<String>>>,
}

impl RecordingStatus {
    fn new() -> Self {
        Self {
            lines: Rc::new(RefCell::new(Vec::new())),
        }
    }

    fn contains(&self, needle: &str) -> bool {
        self.lines.borrow().iter().any(|l| l == needle)
    }
}

impl StatusSink for RecordingStatus {
    fn publish(&mut self, text: &str) {
        self.lines.borrow_mut().push(text.into());
    }
}

fn writes(journal: &Journal) -> Vec<(String, [u8; Frame::LEN])> {
    journal
        .borrow()
        .iter()
        .filter_map(|op| match op {
            Op::Write(port, bytes) => Some((port.clone(), *bytes)),
            _ => None,
        })
        .collect()
}

#[test]
fn test_end_to_end_steady_red() {
    let journal: Journal = Journal::default();
    let panel = MockPanel::new(Mode::Steady, Rgb::new(128, 0, 0));
    let status = RecordingStatus::new();
    let mut driver = SessionDriver::new(
        MockOpener::new(&journal),
        ScriptedInput::of(vec![
            UiEvent::PortChosen("COM3".into()),
            UiEvent::ModeChanged(Mode::Steady),
            UiEvent::SliderMoved(ColorChannel::Red),
        ]),
        panel,
        status.clone(),
    );
    driver.run();

    // mode change and slider move each produce exactly one write, both of
    // the same wire-pinned frame
    let expected = [0x02, 0x02, 0x80, 0x00, 0x00, 0xb2, 0x5b, 0x4a, 0xb3];
    assert_eq!(
        writes(&journal),
        vec![("COM3".into(), expected), ("COM3".into(), expected)]
    );
    assert_eq!(
        *journal.borrow().last().unwrap(),
        Op::Close("COM3".to_string())
    );
    assert!(status.contains("select COM port"));
    assert!(status.contains("COM3 open"));
    assert!(status.contains("sent cmd 2 (0x0202800000b25b4ab3)"));
    assert!(driver.state().phase().is_terminal());
    assert_eq!(driver.state().frames_sent(), 2);
}

#[test]
fn test_failed_open_keeps_selecting() {
    let journal: Journal = Journal::default();
    let mut opener = MockOpener::new(&journal);
    opener.failing.insert("BAD".into());
    let status = RecordingStatus::new();
    let mut driver = SessionDriver::new(
        opener,
        ScriptedInput::of(vec![
            UiEvent::PortChosen("BAD".into()),
            UiEvent::PortChosen("GOOD".into()),
        ]),
        MockPanel::new(Mode::Steady, Rgb::BLACK),
        status.clone(),
    );
    driver.run();

    assert_eq!(
        *journal.borrow(),
        vec![
            Op::OpenFailed("BAD".into()),
            Op::Open("GOOD".into()),
            Op::Close("GOOD".into()),
        ]
    );
    assert!(status.contains("unable to open BAD: no such device"));
    assert!(status.contains("GOOD open"));
}

#[test]
fn test_quit_during_selection() {
    let journal: Journal = Journal::default();
    let status = RecordingStatus::new();
    let mut driver = SessionDriver::new(
        MockOpener::new(&journal),
        ScriptedInput::of(vec![UiEvent::Quit]),
        MockPanel::new(Mode::Steady, Rgb::BLACK),
        status.clone(),
    );
    driver.run();

    assert!(journal.borrow().is_empty(), "no opens and no writes");
    assert!(status.contains("closed"));
    assert!(driver.state().phase().is_terminal());
}

#[test]
fn test_events_ignored_while_selecting() {
    let journal: Journal = Journal::default();
    let mut driver = SessionDriver::new(
        MockOpener::new(&journal),
        ScriptedInput::of(vec![
            UiEvent::SliderMoved(ColorChannel::Red),
            UiEvent::AllOnPressed,
            UiEvent::ModeChanged(Mode::Blink),
            UiEvent::Quit,
        ]),
        MockPanel::new(Mode::Steady, Rgb::WHITE),
        RecordingStatus::new(),
    );
    driver.run();

    assert!(journal.borrow().is_empty());
}

#[test]
fn test_all_on_all_off_send_dedicated_ids_and_force_panel() {
    let journal: Journal = Journal::default();
    // panel starts on Blink with an arbitrary color; the buttons must win
    let panel = MockPanel::new(Mode::Blink, Rgb::new(10, 20, 30));
    let mut driver = SessionDriver::new(
        MockOpener::new(&journal),
        ScriptedInput::of(vec![
            UiEvent::PortChosen("COM3".into()),
            UiEvent::AllOnPressed,
            UiEvent::AllOffPressed,
        ]),
        panel.clone(),
        RecordingStatus::new(),
    );
    driver.run();

    assert_eq!(
        writes(&journal),
        vec![
            (
                "COM3".into(),
                [0x02, 0x01, 0xff, 0xff, 0xff, 0x5f, 0x6f, 0xa9, 0x34]
            ),
            (
                "COM3".into(),
                [0x02, 0x00, 0x00, 0x00, 0x00, 0x97, 0x17, 0x4d, 0x8b]
            ),
        ]
    );
    assert_eq!(panel.snapshot(), (Mode::Steady, Rgb::BLACK));
    assert_eq!(driver.state().frames_sent(), 2);
}

#[test]
fn test_slider_command_follows_mode() {
    for (mode, expected_cmd) in [(Mode::Steady, 0x02), (Mode::Blink, 0x03)] {
        let journal: Journal = Journal::default();
        let mut driver = SessionDriver::new(
            MockOpener::new(&journal),
            ScriptedInput::of(vec![
                UiEvent::PortChosen("COM3".into()),
                UiEvent::SliderMoved(ColorChannel::Green),
            ]),
            MockPanel::new(mode, Rgb::new(1, 2, 3)),
            RecordingStatus::new(),
        );
        driver.run();

        let writes = writes(&journal);
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].1[1], expected_cmd);
        assert_eq!(writes[0].1[2..5], [1, 2, 3]);
    }
}

#[test]
fn test_reselect_closes_old_exactly_once_before_new_open() {
    let journal: Journal = Journal::default();
    let mut driver = SessionDriver::new(
        MockOpener::new(&journal),
        ScriptedInput::of(vec![
            UiEvent::PortChosen("A".into()),
            UiEvent::SliderMoved(ColorChannel::Red),
            UiEvent::PortChanged("B".into()),
            UiEvent::SliderMoved(ColorChannel::Red),
        ]),
        MockPanel::new(Mode::Steady, Rgb::new(128, 0, 0)),
        RecordingStatus::new(),
    );
    driver.run();

    let frame = [0x02, 0x02, 0x80, 0x00, 0x00, 0xb2, 0x5b, 0x4a, 0xb3];
    assert_eq!(
        *journal.borrow(),
        vec![
            Op::Open("A".into()),
            Op::Write("A".into(), frame),
            Op::Close("A".into()),
            Op::Open("B".into()),
            Op::Write("B".into(), frame),
            Op::Close("B".into()),
        ]
    );
}

#[test]
fn test_reselect_open_failure_falls_back_to_selection() {
    let journal: Journal = Journal::default();
    let mut opener = MockOpener::new(&journal);
    opener.failing.insert("BAD".into());
    let status = RecordingStatus::new();
    let mut driver = SessionDriver::new(
        opener,
        ScriptedInput::of(vec![
            UiEvent::PortChosen("A".into()),
            UiEvent::PortChanged("BAD".into()),
            UiEvent::PortChosen("C".into()),
        ]),
        MockPanel::new(Mode::Steady, Rgb::BLACK),
        status.clone(),
    );
    driver.run();

    assert_eq!(
        *journal.borrow(),
        vec![
            Op::Open("A".into()),
            Op::Close("A".into()),
            Op::OpenFailed("BAD".into()),
            Op::Open("C".into()),
            Op::Close("C".into()),
        ]
    );
    assert!(status.contains("unable to open BAD: no such device"));
    // the prompt comes back after the failed reselection
    let lines = status.lines.borrow();
    let failure = lines
        .iter()
        .position(|l| l.starts_with("unable to open BAD"))
        .unwrap();
    assert_eq!(lines[failure + 1], "select COM port");
}

#[test]
fn test_write_failure_forces_reselection() {
    let journal: Journal = Journal::default();
    let mut opener = MockOpener::new(&journal);
    opener.flaky.insert("A".into());
    let status = RecordingStatus::new();
    let mut driver = SessionDriver::new(
        opener,
        ScriptedInput::of(vec![
            UiEvent::PortChosen("A".into()),
            UiEvent::SliderMoved(ColorChannel::Blue),
            UiEvent::PortChosen("B".into()),
            UiEvent::SliderMoved(ColorChannel::Blue),
        ]),
        MockPanel::new(Mode::Blink, Rgb::new(0, 0, 40)),
        status.clone(),
    );
    driver.run();

    // the failed write never lands in the journal; A is closed once and
    // the next selection works
    assert_eq!(
        *journal.borrow(),
        vec![
            Op::Open("A".into()),
            Op::Close("A".into()),
            Op::Open("B".into()),
            Op::Write(
                "B".into(),
                [0x02, 0x03, 0x00, 0x00, 0x28, 0xce, 0xa9, 0x0b, 0x89]
            ),
            Op::Close("B".into()),
        ]
    );
    assert!(status.contains("write to A failed: device unplugged"));
    assert_eq!(driver.state().frames_sent(), 1);
}

#[test]
fn test_poll_timeouts_are_noops() {
    let journal: Journal = Journal::default();
    let mut driver = SessionDriver::new(
        MockOpener::new(&journal),
        ScriptedInput::new(vec![
            None,
            Some(UiEvent::PortChosen("A".into())),
            None,
            None,
            Some(UiEvent::Quit),
        ]),
        MockPanel::new(Mode::Steady, Rgb::BLACK),
        RecordingStatus::new(),
    );
    driver.run();

    assert_eq!(
        *journal.borrow(),
        vec![Op::Open("A".into()), Op::Close("A".into())]
    );
}
