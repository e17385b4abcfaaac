//! Machine lifecycle.
//!
//! ```text
//!            fault                halt
//!   Errored <------- Running -------> Halted
//!      |               ^                |
//!      +---- reset ----+---- reset -----+
//! ```
//!
//! The reasoning string exists exactly while the machine is `Errored`.

use crate::machine::errors::MachineError;
use std::fmt;

/// Run lifecycle of a machine.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum MachineState {
    /// Accepting instructions.
    #[default]
    Running,
    /// Stopped by an explicit halt instruction.
    Halted,
    /// Stopped by a fault; see the reasoning.
    Errored,
}

impl MachineState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            MachineState::Running => "running",
            MachineState::Halted => "halted",
            MachineState::Errored => "errored",
        }
    }
}

impl fmt::Display for MachineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured record of the fault that stopped a machine.
#[derive(Clone, Debug, PartialEq)]
pub struct Fault {
    /// Opcode of the failing instruction.
    pub opcode: String,
    /// 1-based source line, when the instruction came from program text.
    pub line: Option<usize>,
    pub error: MachineError,
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {line}: {}: {}", self.opcode, self.error),
            None => write!(f, "{}: {}", self.opcode, self.error),
        }
    }
}

/// Owns the lifecycle state and the diagnostic for the latest fault.
#[derive(Clone, Debug, Default)]
pub struct StateController {
    state: MachineState,
    fault: Option<Fault>,
    reasoning: Option<String>,
}

impl StateController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MachineState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == MachineState::Running
    }

    /// Human-readable reason for the current `Errored` state.
    pub fn reasoning(&self) -> Option<&str> {
        self.reasoning.as_deref()
    }

    pub fn fault(&self) -> Option<&Fault> {
        self.fault.as_ref()
    }

    /// Running -> Errored, recording the fault and its rendering together.
    ///
    /// Ignored unless the machine is running, so the first fault of a run is
    /// the one that is reported.
    pub fn fail(&mut self, fault: Fault) -> bool {
        if !self.is_running() {
            return false;
        }
        self.reasoning = Some(fault.to_string());
        self.fault = Some(fault);
        self.state = MachineState::Errored;
        true
    }

    /// Running -> Halted.
    pub fn halt(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.state = MachineState::Halted;
        true
    }

    /// Any state -> Running, clearing the previous fault.
    pub fn reset(&mut self) {
        self.state = MachineState::Running;
        self.fault = None;
        self.reasoning = None;
    }
}
