use crate::machine::registers::NumericKind;
use regvm_derive::Error;

/// Errors raised while provisioning, parsing, or executing on a machine.
///
/// Execution errors never escape [`Machine::dispatch`](crate::machine::vm::Machine::dispatch);
/// they are recorded on the machine as its fault and the machine moves to
/// [`MachineState::Errored`](crate::machine::state::MachineState::Errored).
#[derive(Clone, Debug, PartialEq, Error)]
pub enum MachineError {
    /// A register name is absent from the bank for the requested kind.
    #[error("no {kind} register named `{name}`")]
    NoSuchRegister { kind: NumericKind, name: String },
    /// An operand token is neither a register nor a literal of the required kind.
    #[error("cannot resolve operand `{token}` as {kind} register or literal")]
    UnresolvedOperand { kind: NumericKind, token: String },
    /// An instruction supplied an operand count outside the operator's bounds.
    #[error("{opcode} takes {min}..={max} operands, got {actual}")]
    ArityMismatch {
        opcode: String,
        min: usize,
        max: usize,
        actual: usize,
    },
    /// No registered operator matches the opcode.
    #[error("unknown opcode `{opcode}`")]
    UnknownOpcode { opcode: String },
    /// Integer division or remainder by zero.
    #[error("division by zero while updating `{register}`")]
    DivisionByZero { register: String },
    /// A register name was provisioned twice (in either namespace).
    #[error("register `{name}` is already declared")]
    DuplicateRegister { name: String },
    /// A register name cannot be written as a single operand token.
    #[error("invalid register name `{name}`")]
    InvalidRegisterName { name: String },
    /// Two operators were registered under the same opcode.
    #[error("opcode `{opcode}` is already registered")]
    DuplicateOpcode { opcode: String },
    /// An operator declared a negative or non-finite cost.
    #[error("operator `{opcode}` has an invalid cost")]
    InvalidCost { opcode: String },
    /// A configuration value is not a literal of the expected kind.
    #[error("`{token}` is not a valid {kind} literal")]
    InvalidLiteral { kind: NumericKind, token: String },
    /// Malformed program text.
    #[error("line {line}: {message}")]
    ParseError { line: usize, message: String },
}

impl MachineError {
    /// Short, stable name of the error kind for reports.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            MachineError::NoSuchRegister { .. } => "NoSuchRegister",
            MachineError::UnresolvedOperand { .. } => "UnresolvedOperand",
            MachineError::ArityMismatch { .. } => "ArityMismatch",
            MachineError::UnknownOpcode { .. } => "UnknownOpcode",
            MachineError::DivisionByZero { .. } => "DivisionByZero",
            MachineError::DuplicateRegister { .. } => "DuplicateRegister",
            MachineError::InvalidRegisterName { .. } => "InvalidRegisterName",
            MachineError::DuplicateOpcode { .. } => "DuplicateOpcode",
            MachineError::InvalidCost { .. } => "InvalidCost",
            MachineError::InvalidLiteral { .. } => "InvalidLiteral",
            MachineError::ParseError { .. } => "ParseError",
        }
    }
}
