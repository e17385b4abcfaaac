//! Machine provisioning and run limits.

use crate::machine::errors::MachineError;
use crate::machine::program::Program;
use crate::machine::registers::{NumericKind, RegisterBank, Value};

/// Bounds on a single call of the run loop.
///
/// `None` means unlimited. Exhausting a limit pauses the run; it never faults
/// the machine.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RunLimits {
    /// Maximum summed operator cost.
    pub cost: Option<f64>,
    /// Maximum number of dispatched instructions.
    pub steps: Option<usize>,
}

impl RunLimits {
    pub const UNLIMITED: RunLimits = RunLimits {
        cost: None,
        steps: None,
    };

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = Some(steps);
        self
    }
}

/// Everything needed to provision a machine: its registers and default limits.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MachineConfig {
    /// Registers in declaration order; the kind is implied by the value.
    pub registers: Vec<(String, Value)>,
    pub limits: RunLimits,
}

impl MachineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(mut self, name: &str, initial: Value) -> Self {
        self.registers.push((name.to_string(), initial));
        self
    }

    pub fn with_limits(mut self, limits: RunLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Appends the registers declared by `.int` / `.float` directives.
    pub fn with_program_declarations(mut self, program: &Program) -> Self {
        self.registers.extend(
            program
                .declarations
                .iter()
                .map(|decl| (decl.name.clone(), decl.initial)),
        );
        self
    }

    /// Builds the register bank, rejecting duplicate or malformed names.
    pub fn provision(&self) -> Result<RegisterBank, MachineError> {
        let mut bank = RegisterBank::new();
        for (name, initial) in &self.registers {
            bank.declare(name, *initial)?;
        }
        Ok(bank)
    }
}

/// Parses a `NAME[=VALUE]` register declaration as given on the command line.
pub fn parse_register_decl(kind: NumericKind, spec: &str) -> Result<(String, Value), MachineError> {
    let (name, initial) = match spec.split_once('=') {
        Some((name, value)) => (name, Value::parse(kind, value)?),
        None => (spec, Value::zero(kind)),
    };
    if name.is_empty() {
        return Err(MachineError::InvalidRegisterName {
            name: name.to_string(),
        });
    }
    Ok((name.to_string(), initial))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_default_to_unlimited() {
        assert_eq!(RunLimits::default(), RunLimits::UNLIMITED);
        let limits = RunLimits::default().with_cost(10.0).with_steps(3);
        assert_eq!(limits.cost, Some(10.0));
        assert_eq!(limits.steps, Some(3));
    }

    #[test]
    fn provision_keeps_declaration_values() {
        let bank = MachineConfig::new()
            .declare("acc", Value::Int(10))
            .declare("volts", Value::Float(1.5))
            .provision()
            .unwrap();
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.get(NumericKind::Int, "acc"), Some(Value::Int(10)));
        assert_eq!(bank.get(NumericKind::Float, "volts"), Some(Value::Float(1.5)));
    }

    #[test]
    fn provision_rejects_duplicates_across_kinds() {
        let err = MachineConfig::new()
            .declare("x", Value::Int(1))
            .declare("x", Value::Float(1.0))
            .provision()
            .unwrap_err();
        assert_eq!(err, MachineError::DuplicateRegister { name: "x".into() });
    }

    #[test]
    fn program_declarations_follow_explicit_ones() {
        let program = Program::parse(".int b 2\nNOP").unwrap();
        let config = MachineConfig::new()
            .declare("a", Value::Int(1))
            .with_program_declarations(&program);
        assert_eq!(
            config.registers,
            vec![("a".to_string(), Value::Int(1)), ("b".to_string(), Value::Int(2))]
        );
    }

    #[test]
    fn register_decl_parsing() {
        assert_eq!(
            parse_register_decl(NumericKind::Int, "acc=-4"),
            Ok(("acc".to_string(), Value::Int(-4)))
        );
        assert_eq!(
            parse_register_decl(NumericKind::Float, "volts"),
            Ok(("volts".to_string(), Value::Float(0.0)))
        );
        assert!(matches!(
            parse_register_decl(NumericKind::Int, "acc=1.5"),
            Err(MachineError::InvalidLiteral { .. })
        ));
        assert!(matches!(
            parse_register_decl(NumericKind::Int, "=3"),
            Err(MachineError::InvalidRegisterName { .. })
        ));
    }
}
