//! Shell-facing handle around the core
//!
//! The shell may start issuing commands before the core has finished
//! construction. Those commands are queued and replayed in order once a
//! core is attached. After `destroy` the bridge is inert.

use crate::events::GamePhase;
use crate::game::NeonDrift;

/// A command issued before the core was ready
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Start,
    Restart,
    ToggleMute,
    PointerTarget(f32),
    Autopilot(bool),
}

#[derive(Default)]
pub struct GameBridge {
    core: Option<NeonDrift>,
    pending: Vec<Command>,
    destroyed: bool,
}

impl GameBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand over a constructed core and replay queued commands
    pub fn attach(&mut self, core: NeonDrift) {
        if self.destroyed {
            log::warn!("Core attached after destroy, discarding");
            core.destroy();
            return;
        }
        if let Some(old) = self.core.replace(core) {
            log::warn!("Replacing an attached core");
            old.destroy();
        }
        let pending = std::mem::take(&mut self.pending);
        if !pending.is_empty() {
            log::debug!("Replaying {} queued commands", pending.len());
        }
        for command in pending {
            self.dispatch(command);
        }
    }

    pub fn is_ready(&self) -> bool {
        self.core.is_some()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn core(&self) -> Option<&NeonDrift> {
        self.core.as_ref()
    }

    pub fn phase(&self) -> Option<GamePhase> {
        self.core.as_ref().map(NeonDrift::phase)
    }

    /// Mute flag of the attached core (`false` before attach)
    pub fn is_muted(&self) -> bool {
        self.core.as_ref().is_some_and(NeonDrift::is_muted)
    }

    pub fn pending(&self) -> &[Command] {
        &self.pending
    }

    pub fn start(&mut self) {
        self.dispatch(Command::Start);
    }

    pub fn restart(&mut self) {
        self.dispatch(Command::Restart);
    }

    /// New mute state; `false` while the toggle is still queued
    pub fn toggle_mute(&mut self) -> bool {
        self.dispatch(Command::ToggleMute)
    }

    pub fn set_pointer_target(&mut self, x: f32) {
        self.dispatch(Command::PointerTarget(x));
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.dispatch(Command::Autopilot(enabled));
    }

    /// Advance one rendered frame; frames before the core is ready are dropped
    pub fn frame(&mut self, dt: f32) {
        if let Some(core) = self.core.as_mut() {
            core.update(dt);
        }
    }

    /// Tear down the core. Safe to call more than once.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.pending.clear();
        if let Some(core) = self.core.take() {
            core.destroy();
        }
    }

    fn dispatch(&mut self, command: Command) -> bool {
        if self.destroyed {
            log::debug!("Ignoring {:?} after destroy", command);
            return false;
        }
        let Some(core) = self.core.as_mut() else {
            // Pointer moves supersede each other
            if let Command::PointerTarget(_) = command {
                self.pending
                    .retain(|c| !matches!(c, Command::PointerTarget(_)));
            }
            self.pending.push(command);
            return false;
        };
        match command {
            Command::Start => core.start(),
            Command::Restart => core.restart(),
            Command::ToggleMute => return core.toggle_mute(),
            Command::PointerTarget(x) => core.set_pointer_target(x),
            Command::Autopilot(enabled) => core.set_autopilot(enabled),
        }
        core.is_muted()
    }
}
