//! Machine: dispatcher, run loop, and inspection.
//!
//! A [`Machine`] owns one register bank and one lifecycle, and shares an
//! immutable [`OperatorSet`] with any other machine built from the same `Arc`.
//!
//! # Dispatch
//!
//! ```text
//! Skipped   <- machine not running
//! Faulted   <- unknown opcode | arity mismatch | run() error
//! Halted    <- run() requested a halt
//! Executed  <- otherwise
//! ```
//!
//! The run loop checks [`RunLimits`] before each instruction. Running out of
//! budget pauses the loop and leaves the machine `Running`.

use crate::config::{MachineConfig, RunLimits};
use crate::machine::cost::{CostMeter, CostProfile};
use crate::machine::errors::MachineError;
use crate::machine::operator::{ExecContext, OperatorSet};
use crate::machine::program::{Instruction, Program};
use crate::machine::registers::{RegisterBank, Value};
use crate::machine::state::{Fault, MachineState, StateController};
use crate::{debug, info, warn};
use std::sync::Arc;

/// Result of dispatching a single instruction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Step {
    /// The instruction ran and the machine is still running.
    Executed,
    /// The instruction was a halt; the machine is now `Halted`.
    Halted,
    /// The instruction failed; the machine is now `Errored`.
    Faulted,
    /// The machine was not running, so nothing happened.
    Skipped,
}

/// Why a call of the run loop returned.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RunOutcome {
    /// Ran past the last instruction; the machine is still running.
    Completed,
    Halted,
    Errored,
    /// A [`RunLimits`] bound was reached. The machine is still running and
    /// the run can be resumed at [`RunReport::next`].
    BudgetExhausted,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunReport {
    pub outcome: RunOutcome,
    /// Instructions dispatched in this call.
    pub executed: usize,
    /// Cost charged against the limit in this call.
    pub cost: f64,
    /// Index of the next instruction that would be dispatched.
    pub next: usize,
}

/// A register machine: one bank, one lifecycle, one shared operator registry.
///
/// Every instruction is dispatched through [`Machine::dispatch`], which never
/// fails: operator errors become a `Running -> Errored` transition whose
/// reasoning is available through [`Machine::reasoning`].
#[derive(Debug)]
pub struct Machine {
    registers: RegisterBank,
    state: StateController,
    operators: Arc<OperatorSet>,
    profile: CostProfile,
    limits: RunLimits,
}

impl Machine {
    /// Provisions the configured registers.
    pub fn new(config: &MachineConfig, operators: Arc<OperatorSet>) -> Result<Self, MachineError> {
        let registers = config.provision()?;
        let mut machine = Self::with_registers(registers, operators);
        machine.limits = config.limits;
        Ok(machine)
    }

    pub fn with_registers(registers: RegisterBank, operators: Arc<OperatorSet>) -> Self {
        Self {
            registers,
            state: StateController::new(),
            operators,
            profile: CostProfile::new(),
            limits: RunLimits::UNLIMITED,
        }
    }

    /// Executes one instruction.
    ///
    /// Order: running check, opcode lookup, arity check, then `run`. Only a
    /// successful `run` may change registers.
    pub fn dispatch(&mut self, instr: &Instruction) -> Step {
        if !self.state.is_running() {
            return Step::Skipped;
        }

        match self.execute(instr) {
            Ok(false) => Step::Executed,
            Ok(true) => {
                self.state.halt();
                info!("machine halted by {}", describe(instr));
                Step::Halted
            }
            Err(error) => {
                let fault = Fault {
                    opcode: instr.opcode.clone(),
                    line: instr.line,
                    error,
                };
                warn!("machine fault: {fault}");
                self.state.fail(fault);
                Step::Faulted
            }
        }
    }

    /// Returns whether the operator asked to halt.
    fn execute(&mut self, instr: &Instruction) -> Result<bool, MachineError> {
        let operator = self
            .operators
            .get(&instr.opcode)
            .ok_or_else(|| MachineError::UnknownOpcode {
                opcode: instr.opcode.clone(),
            })?;
        operator.arity().check(&instr.opcode, instr.operands.len())?;
        self.profile.add(operator.category(), operator.cost());

        let mut ctx = ExecContext::new(&mut self.registers);
        operator.run(&instr.operands, &mut ctx)?;
        Ok(ctx.halt_requested())
    }

    /// Runs `program` from the start under the machine's default limits.
    pub fn run(&mut self, program: &Program) -> RunReport {
        self.run_from(program, 0, self.limits)
    }

    pub fn run_with(&mut self, program: &Program, limits: RunLimits) -> RunReport {
        self.run_from(program, 0, limits)
    }

    /// Dispatches instructions starting at `start` until the program ends,
    /// the machine stops, or a limit is reached.
    ///
    /// Limits are checked before each instruction, so an instruction is either
    /// fully charged and dispatched or not started at all.
    pub fn run_from(&mut self, program: &Program, start: usize, limits: RunLimits) -> RunReport {
        let mut meter = CostMeter::new(limits.cost);
        let mut executed = 0;
        let mut pc = start;

        let outcome = loop {
            match self.state.state() {
                MachineState::Running => {}
                MachineState::Halted => break RunOutcome::Halted,
                MachineState::Errored => break RunOutcome::Errored,
            }
            let Some(instr) = program.get(pc) else {
                break RunOutcome::Completed;
            };

            let out_of_steps = limits.steps.is_some_and(|max| executed >= max);
            if out_of_steps || !meter.try_charge(self.cost_of(instr).unwrap_or(0.0)) {
                debug!(
                    "run paused at instruction {pc} after {executed} steps, cost {} (remaining {:?})",
                    meter.used(),
                    meter.remaining()
                );
                break RunOutcome::BudgetExhausted;
            }

            pc += 1;
            executed += 1;
            match self.dispatch(instr) {
                Step::Halted => break RunOutcome::Halted,
                Step::Faulted => break RunOutcome::Errored,
                Step::Executed | Step::Skipped => {}
            }
        };

        RunReport {
            outcome,
            executed,
            cost: meter.used(),
            next: pc,
        }
    }

    /// Cost of the operator `instr` would dispatch to, if the opcode is known.
    pub fn cost_of(&self, instr: &Instruction) -> Option<f64> {
        self.operators.get(&instr.opcode).map(|op| op.cost())
    }

    pub fn state(&self) -> MachineState {
        self.state.state()
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Why the machine stopped, while it is `Errored`.
    pub fn reasoning(&self) -> Option<&str> {
        self.state.reasoning()
    }

    pub fn fault(&self) -> Option<&Fault> {
        self.state.fault()
    }

    pub fn registers(&self) -> &RegisterBank {
        &self.registers
    }

    pub fn operators(&self) -> &Arc<OperatorSet> {
        &self.operators
    }

    /// Cost accumulated by every dispatched instruction since creation.
    pub fn cost_profile(&self) -> &CostProfile {
        &self.profile
    }

    pub fn limits(&self) -> RunLimits {
        self.limits
    }

    /// Reads a register by name, whatever its kind.
    pub fn peek(&self, name: &str) -> Option<Value> {
        self.registers.lookup(name)
    }

    /// Writes a register from outside the program (e.g. a device solver).
    ///
    /// The value must match the register's kind; this never creates a register
    /// and never changes the machine state.
    pub fn poke(&mut self, name: &str, value: Value) -> Result<(), MachineError> {
        self.registers.set(name, value)
    }

    /// Every register with its contents, ordered by name.
    pub fn points(&self) -> Vec<(&str, Value)> {
        self.registers.points()
    }

    /// Returns to `Running` and clears the fault. Registers keep their contents.
    pub fn reset(&mut self) {
        if self.state.state() != MachineState::Running {
            debug!("machine reset from {}", self.state.state());
        }
        self.state.reset();
    }
}

fn describe(instr: &Instruction) -> String {
    match instr.line {
        Some(line) => format!("`{instr}` (line {line})"),
        None => format!("`{instr}`"),
    }
}
