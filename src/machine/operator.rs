//! Operator contract and the opcode registry.
//!
//! An [`Operator`] is one unit of instruction behavior. Built-ins come from
//! [`isa`](super::isa); hosts may add their own implementations through
//! [`OperatorSetBuilder::register`]. The finished [`OperatorSet`] is immutable
//! and is shared between machines behind an `Arc`.

use crate::machine::cost::CostCategory;
use crate::machine::errors::MachineError;
use crate::machine::isa::Builtin;
use crate::machine::registers::RegisterBank;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Inclusive bounds on the number of operand tokens an operator accepts.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Arity {
    pub min: usize,
    pub max: usize,
}

impl Arity {
    pub const fn exactly(n: usize) -> Self {
        Self { min: n, max: n }
    }

    pub const fn between(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub const fn accepts(&self, count: usize) -> bool {
        count >= self.min && count <= self.max
    }

    /// Returns [`MachineError::ArityMismatch`] if `actual` is out of bounds.
    pub fn check(&self, opcode: &str, actual: usize) -> Result<(), MachineError> {
        if self.accepts(actual) {
            return Ok(());
        }
        Err(MachineError::ArityMismatch {
            opcode: opcode.to_string(),
            min: self.min,
            max: self.max,
            actual,
        })
    }
}

/// What an operator may touch while it runs.
pub struct ExecContext<'a> {
    /// Register bank of the machine executing the instruction.
    pub registers: &'a mut RegisterBank,
    halt_requested: bool,
}

impl<'a> ExecContext<'a> {
    pub fn new(registers: &'a mut RegisterBank) -> Self {
        Self {
            registers,
            halt_requested: false,
        }
    }

    /// Asks the dispatcher to move the machine to `Halted` once this
    /// instruction completes successfully.
    pub fn request_halt(&mut self) {
        self.halt_requested = true;
    }

    pub fn halt_requested(&self) -> bool {
        self.halt_requested
    }
}

/// A named unit of instruction behavior.
///
/// `run` reports failure through its `Err` value; the dispatcher turns that
/// into a `Running -> Errored` transition, so a bad instruction never unwinds
/// past the host's tick loop. Arity is checked before `run` is called.
pub trait Operator: Send + Sync {
    /// Exact opcode this operator is registered under.
    fn opcode(&self) -> &str;

    fn arity(&self) -> Arity;

    /// Advisory scheduling weight; never interpreted by the machine itself
    /// other than for budget accounting.
    fn cost(&self) -> f64;

    fn category(&self) -> CostCategory {
        CostCategory::Extension
    }

    fn run(&self, args: &[String], ctx: &mut ExecContext<'_>) -> Result<(), MachineError>;
}

/// Immutable mapping from opcode to operator.
#[derive(Clone, Default)]
pub struct OperatorSet {
    operators: HashMap<String, Arc<dyn Operator>>,
}

impl OperatorSet {
    pub fn builder() -> OperatorSetBuilder {
        OperatorSetBuilder::default()
    }

    /// The built-in instruction set, ready to share between machines.
    pub fn builtins() -> Arc<OperatorSet> {
        Arc::new(Self::builder().with_builtins().finish())
    }

    /// Exact-match lookup.
    pub fn get(&self, opcode: &str) -> Option<&Arc<dyn Operator>> {
        self.operators.get(opcode)
    }

    pub fn contains(&self, opcode: &str) -> bool {
        self.operators.contains_key(opcode)
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// Registered opcodes in sorted order.
    pub fn opcodes(&self) -> Vec<&str> {
        let mut opcodes: Vec<&str> = self.operators.keys().map(String::as_str).collect();
        opcodes.sort_unstable();
        opcodes
    }
}

impl fmt::Debug for OperatorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorSet")
            .field("opcodes", &self.opcodes())
            .finish()
    }
}

/// Collects operators before freezing them into an [`OperatorSet`].
#[derive(Default)]
pub struct OperatorSetBuilder {
    operators: HashMap<String, Arc<dyn Operator>>,
    error: Option<MachineError>,
}

impl OperatorSetBuilder {
    /// Adds every built-in operator.
    pub fn with_builtins(mut self) -> Self {
        for &builtin in Builtin::ALL {
            self.insert(Arc::new(builtin));
        }
        self
    }

    /// Adds a host-defined operator.
    pub fn register(mut self, operator: impl Operator + 'static) -> Self {
        self.insert(Arc::new(operator));
        self
    }

    fn insert(&mut self, operator: Arc<dyn Operator>) {
        if self.error.is_some() {
            return;
        }
        let opcode = operator.opcode().to_string();
        let cost = operator.cost();
        if !cost.is_finite() || cost < 0.0 {
            self.error = Some(MachineError::InvalidCost { opcode });
            return;
        }
        if self.operators.contains_key(&opcode) {
            self.error = Some(MachineError::DuplicateOpcode { opcode });
            return;
        }
        self.operators.insert(opcode, operator);
    }

    fn finish(self) -> OperatorSet {
        OperatorSet {
            operators: self.operators,
        }
    }

    /// Freezes the registry, reporting the first registration error.
    pub fn build(self) -> Result<Arc<OperatorSet>, MachineError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        Ok(Arc::new(self.finish()))
    }
}
