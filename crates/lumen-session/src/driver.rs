use crate::constants;
use crate::state::SessionState;
use lumen_core::{Channel, CommandId, PortOpener};
use lumen_framing::encode;
use lumen_protocol::{
    classify, Action, ControlPanel, ForcedControls, InputSource, SessionPhase, StatusSink, UiEvent,
};
use std::time::Duration;

/// Runs one session from the selection prompt to termination.
///
/// The driver owns the port opener, the three front-end seams, and the
/// [`SessionState`]. One loop iteration = one bounded event poll followed
/// by whatever the current phase does with the result. Rapid slider events
/// are not coalesced: every qualifying event produces exactly one frame
/// and one write.
pub struct SessionDriver<O, I, P, S>
where
    O: PortOpener,
    I: InputSource,
    P: ControlPanel,
    S: StatusSink,
{
    opener: O,
    input: I,
    panel: P,
    status: S,
    state: SessionState<O::Channel>,
}

impl<O, I, P, S> SessionDriver<O, I, P, S>
where
    O: PortOpener,
    I: InputSource,
    P: ControlPanel,
    S: StatusSink,
{
    pub fn new(opener: O, input: I, panel: P, status: S) -> Self {
        Self {
            opener,
            input,
            panel,
            status,
            state: SessionState::new(),
        }
    }

    /// Session state, for inspection after (or between) runs.
    pub fn state(&self) -> &SessionState<O::Channel> {
        &self.state
    }

    /// Steps the session until it terminates. Any open channel is closed
    /// before this returns, on every path.
    pub fn run(&mut self) {
        self.status
            .publish(SessionPhase::AwaitingPortSelection.status_text());

        while !self.state.phase().is_terminal() {
            match self.state.phase() {
                SessionPhase::AwaitingPortSelection => self.selection_step(),
                SessionPhase::Active => self.active_step(),
                SessionPhase::Terminated => {}
            }
        }
    }

    fn poll(&mut self) -> Option<UiEvent> {
        self.input
            .next_event(Duration::from_millis(constants::POLL_INTERVAL_MS))
    }

    /// One poll while no port is open. Only a port selection or quit does
    /// anything here.
    fn selection_step(&mut self) {
        match self.poll() {
            Some(UiEvent::PortChosen(port)) | Some(UiEvent::PortChanged(port)) => {
                self.try_open(&port);
            }
            Some(UiEvent::Quit) => self.terminate(),
            Some(event) => log::debug!("ignoring {event:?} while no port is open"),
            None => {}
        }
    }

    /// One poll while a channel is live.
    fn active_step(&mut self) {
        let event = self.poll();
        match classify(event, self.panel.mode()) {
            Action::Idle => {}
            Action::Send { cmd, force } => self.send(cmd, force),
            Action::Reselect { port } => {
                // close the old channel exactly once, then try the new port;
                // a failed open drops back to the selection prompt
                self.state.close_channel();
                self.transition(SessionPhase::AwaitingPortSelection);
                if !self.try_open(&port) {
                    self.status
                        .publish(SessionPhase::AwaitingPortSelection.status_text());
                }
            }
            Action::Quit => self.terminate(),
        }
    }

    /// Attempt to open `port` and go Active. On failure the session stays
    /// in selection and the operator hears the reason as status.
    fn try_open(&mut self, port: &str) -> bool {
        match self.opener.open(port) {
            Ok(channel) => {
                self.state.attach(channel);
                self.transition(SessionPhase::Active);
                self.status.publish(&format!("{port} open"));
                true
            }
            Err(e) => {
                log::warn!("{e}");
                self.status.publish(&e.to_string());
                false
            }
        }
    }

    /// Build and write one frame carrying `cmd`, applying any forced panel
    /// state first so the frame reflects what the operator now sees.
    fn send(&mut self, cmd: CommandId, force: Option<ForcedControls>) {
        if let Some(forced) = force {
            self.panel.force(forced.mode, forced.color);
        }
        let mode = self.panel.mode();
        let color = self.panel.color();
        let frame = encode(cmd, color);
        log::debug!("sending cmd {} color {}", cmd.to_u8(), color);

        let Some(channel) = self.state.channel_mut() else {
            // classify only yields Send while Active, so this is a driver bug
            log::error!("send of cmd {} with no open channel", cmd.to_u8());
            return;
        };

        match channel.write_frame(&frame) {
            Ok(()) => {
                self.state.record_send(mode, color);
                self.status
                    .publish(&format!("sent cmd {} (0x{})", cmd.to_u8(), frame.to_hex()));
            }
            Err(e) => {
                // the device is likely gone; drop the link and reselect
                log::error!("{e}");
                self.status.publish(&e.to_string());
                self.state.close_channel();
                self.transition(SessionPhase::AwaitingPortSelection);
                self.status
                    .publish(SessionPhase::AwaitingPortSelection.status_text());
            }
        }
    }

    fn terminate(&mut self) {
        self.state.close_channel();
        self.transition(SessionPhase::Terminated);
        self.status.publish(SessionPhase::Terminated.status_text());
    }

    /// Phase change; a rejected transition is logged and the old phase
    /// kept.
    fn transition(&mut self, next: SessionPhase) {
        if let Err(e) = self.state.transition(next) {
            log::error!("{e}");
        }
    }
}
