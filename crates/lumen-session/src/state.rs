use lumen_core::{Channel, Rgb};
use lumen_protocol::{Mode, SessionPhase, TransitionError};

/// The single mutable value of a running session: the current phase, the
/// channel (when one is open), and the last state pushed to the device.
///
/// Only the session driver mutates this. The channel is held by `Option`
/// and closed take-first, so it is closed exactly once no matter how many
/// paths ask for it.
pub struct SessionState<C: Channel> {
    phase: SessionPhase,
    channel: Option<C>,
    last_mode: Mode,
    last_color: Rgb,
    frames_sent: u64,
}

impl<C: Channel> SessionState<C> {
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::AwaitingPortSelection,
            channel: None,
            last_mode: Mode::Steady,
            last_color: Rgb::BLACK,
            frames_sent: 0,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn channel_mut(&mut self) -> Option<&mut C> {
        self.channel.as_mut()
    }

    /// Name of the currently open port, if any.
    pub fn port_name(&self) -> Option<&str> {
        self.channel.as_ref().map(Channel::port_name)
    }

    /// Validated phase change. A rejected transition leaves the phase
    /// untouched.
    pub fn transition(&mut self, next: SessionPhase) -> Result<(), TransitionError> {
        if !self.phase.can_transition_to(next) {
            return Err(TransitionError {
                from: self.phase,
                to: next,
            });
        }
        log::debug!("phase {:?} -> {:?}", self.phase, next);
        self.phase = next;
        Ok(())
    }

    /// Hand over a freshly opened channel. At most one channel is live at
    /// a time; a leftover here means a driver bug, and it gets closed
    /// before the new one is attached.
    pub fn attach(&mut self, channel: C) {
        self.close_channel();
        self.channel = Some(channel);
    }

    /// Close and drop the current channel, if any. Safe to call on every
    /// teardown path; only the first call reaches the device.
    pub fn close_channel(&mut self) {
        if let Some(mut channel) = self.channel.take() {
            log::debug!("closing {}", channel.port_name());
            channel.close();
        }
    }

    /// Note a successful frame write and the panel state it carried.
    pub fn record_send(&mut self, mode: Mode, color: Rgb) {
        self.last_mode = mode;
        self.last_color = color;
        self.frames_sent += 1;
    }

    pub fn last_mode(&self) -> Mode {
        self.last_mode
    }

    pub fn last_color(&self) -> Rgb {
        self.last_color
    }

    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }
}

impl<C: Channel> Default for SessionState<C> {
    fn default() -> Self {
        Self::new()
    }
}
