//! Register bank: named, typed, mutable storage cells.
//!
//! Registers live in one of two disjoint namespaces, integer or float. A name
//! is declared once, in exactly one namespace, when the machine is provisioned;
//! afterwards only existing registers can be read or written.

use crate::machine::errors::MachineError;
use std::collections::BTreeMap;
use std::fmt;

/// The two numeric register kinds.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum NumericKind {
    /// 64-bit signed integer registers.
    Int,
    /// 64-bit IEEE-754 floating-point registers.
    Float,
}

impl NumericKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            NumericKind::Int => "int",
            NumericKind::Float => "float",
        }
    }

    /// The other namespace.
    pub const fn other(&self) -> NumericKind {
        match self {
            NumericKind::Int => NumericKind::Float,
            NumericKind::Float => NumericKind::Int,
        }
    }
}

impl fmt::Display for NumericKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contents of a single register.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
}

impl Value {
    pub const fn kind(&self) -> NumericKind {
        match self {
            Value::Int(_) => NumericKind::Int,
            Value::Float(_) => NumericKind::Float,
        }
    }

    /// Zero of the given kind.
    pub const fn zero(kind: NumericKind) -> Value {
        match kind {
            NumericKind::Int => Value::Int(0),
            NumericKind::Float => Value::Float(0.0),
        }
    }

    /// Parses a literal of the given kind.
    pub fn parse(kind: NumericKind, token: &str) -> Result<Value, MachineError> {
        let parsed = match kind {
            NumericKind::Int => i64::parse_literal(token).map(Value::Int),
            NumericKind::Float => f64::parse_literal(token).map(Value::Float),
        };
        parsed.ok_or_else(|| MachineError::InvalidLiteral {
            kind,
            token: token.to_string(),
        })
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v:?}"),
        }
    }
}

/// A numeric kind usable as the element type of an instruction family.
///
/// Integer and float instructions run the same generic code; this trait is
/// the seam that keeps their register namespaces apart.
pub trait Numeric: Copy + PartialEq + PartialOrd + fmt::Debug + 'static {
    /// Namespace this type reads from and writes to.
    const KIND: NumericKind;

    /// Parses an operand token as a literal of this kind.
    fn parse_literal(token: &str) -> Option<Self>;
    /// Current contents of register `name` in this namespace.
    fn load(bank: &RegisterBank, name: &str) -> Option<Self>;
    /// Overwrites register `name` in this namespace.
    fn store(bank: &mut RegisterBank, name: &str, value: Self) -> Result<(), MachineError>;
}

impl Numeric for i64 {
    const KIND: NumericKind = NumericKind::Int;

    fn parse_literal(token: &str) -> Option<Self> {
        token.parse::<i64>().ok()
    }

    fn load(bank: &RegisterBank, name: &str) -> Option<Self> {
        bank.ints.get(name).copied()
    }

    fn store(bank: &mut RegisterBank, name: &str, value: Self) -> Result<(), MachineError> {
        let slot = bank
            .ints
            .get_mut(name)
            .ok_or_else(|| MachineError::NoSuchRegister {
                kind: NumericKind::Int,
                name: name.to_string(),
            })?;
        *slot = value;
        Ok(())
    }
}

impl Numeric for f64 {
    const KIND: NumericKind = NumericKind::Float;

    fn parse_literal(token: &str) -> Option<Self> {
        token.parse::<f64>().ok()
    }

    fn load(bank: &RegisterBank, name: &str) -> Option<Self> {
        bank.floats.get(name).copied()
    }

    fn store(bank: &mut RegisterBank, name: &str, value: Self) -> Result<(), MachineError> {
        let slot = bank
            .floats
            .get_mut(name)
            .ok_or_else(|| MachineError::NoSuchRegister {
                kind: NumericKind::Float,
                name: name.to_string(),
            })?;
        *slot = value;
        Ok(())
    }
}

/// Returns true if `name` can appear as a single operand token.
///
/// Tokens are split on whitespace and commas, `#` starts a comment and a
/// leading `.` marks a directive, so none of those may appear in a name.
pub fn is_valid_register_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name
            .chars()
            .any(|c| c.is_whitespace() || c == ',' || c == '#' || c == '"')
}

/// Fixed set of named registers, split by kind.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RegisterBank {
    ints: BTreeMap<String, i64>,
    floats: BTreeMap<String, f64>,
}

impl RegisterBank {
    /// Creates an empty bank.
    pub fn new() -> Self {
        Self::default()
    }

    /// Provisions a register holding `initial`; its kind is the value's kind.
    ///
    /// Returns [`MachineError::DuplicateRegister`] if the name already exists in
    /// either namespace.
    pub fn declare(&mut self, name: &str, initial: Value) -> Result<(), MachineError> {
        if !is_valid_register_name(name) {
            return Err(MachineError::InvalidRegisterName {
                name: name.to_string(),
            });
        }
        if self.kind_of(name).is_some() {
            return Err(MachineError::DuplicateRegister {
                name: name.to_string(),
            });
        }
        match initial {
            Value::Int(v) => {
                self.ints.insert(name.to_string(), v);
            }
            Value::Float(v) => {
                self.floats.insert(name.to_string(), v);
            }
        }
        Ok(())
    }

    /// Returns the contents of `name` in the `kind` namespace.
    pub fn get(&self, kind: NumericKind, name: &str) -> Option<Value> {
        match kind {
            NumericKind::Int => i64::load(self, name).map(Value::Int),
            NumericKind::Float => f64::load(self, name).map(Value::Float),
        }
    }

    /// Overwrites `name` in the namespace of `value`'s kind.
    ///
    /// Never creates a register: an absent name (or a name living in the
    /// other namespace) is [`MachineError::NoSuchRegister`].
    pub fn set(&mut self, name: &str, value: Value) -> Result<(), MachineError> {
        match value {
            Value::Int(v) => i64::store(self, name, v),
            Value::Float(v) => f64::store(self, name, v),
        }
    }

    /// Namespace `name` lives in, if declared.
    pub fn kind_of(&self, name: &str) -> Option<NumericKind> {
        if self.ints.contains_key(name) {
            Some(NumericKind::Int)
        } else if self.floats.contains_key(name) {
            Some(NumericKind::Float)
        } else {
            None
        }
    }

    /// Looks a register up by name alone.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.get(self.kind_of(name)?, name)
    }

    pub fn contains(&self, kind: NumericKind, name: &str) -> bool {
        match kind {
            NumericKind::Int => self.ints.contains_key(name),
            NumericKind::Float => self.floats.contains_key(name),
        }
    }

    /// Number of registers across both namespaces.
    pub fn len(&self) -> usize {
        self.ints.len() + self.floats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every register with its contents, ordered by name.
    pub fn points(&self) -> Vec<(&str, Value)> {
        let mut points: Vec<(&str, Value)> = self
            .ints
            .iter()
            .map(|(k, v)| (k.as_str(), Value::Int(*v)))
            .chain(self.floats.iter().map(|(k, v)| (k.as_str(), Value::Float(*v))))
            .collect();
        points.sort_by(|a, b| a.0.cmp(b.0));
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank() -> RegisterBank {
        let mut bank = RegisterBank::new();
        bank.declare("acc", Value::Int(10)).unwrap();
        bank.declare("temp", Value::Float(1.5)).unwrap();
        bank
    }

    #[test]
    fn get_is_scoped_to_kind() {
        let bank = bank();
        assert_eq!(bank.get(NumericKind::Int, "acc"), Some(Value::Int(10)));
        assert_eq!(bank.get(NumericKind::Float, "acc"), None);
        assert_eq!(bank.get(NumericKind::Float, "temp"), Some(Value::Float(1.5)));
        assert_eq!(bank.get(NumericKind::Int, "temp"), None);
    }

    #[test]
    fn set_overwrites_existing_register() {
        let mut bank = bank();
        bank.set("acc", Value::Int(-3)).unwrap();
        assert_eq!(bank.lookup("acc"), Some(Value::Int(-3)));
    }

    #[test]
    fn set_never_creates_registers() {
        let mut bank = bank();
        let err = bank.set("missing", Value::Int(1)).unwrap_err();
        assert_eq!(
            err,
            MachineError::NoSuchRegister {
                kind: NumericKind::Int,
                name: "missing".into()
            }
        );
        assert_eq!(bank.len(), 2);
    }

    #[test]
    fn set_with_wrong_kind_is_no_such_register() {
        let mut bank = bank();
        let err = bank.set("acc", Value::Float(2.0)).unwrap_err();
        assert!(matches!(
            err,
            MachineError::NoSuchRegister {
                kind: NumericKind::Float,
                ..
            }
        ));
        assert_eq!(bank.lookup("acc"), Some(Value::Int(10)));
    }

    #[test]
    fn names_are_unique_across_kinds() {
        let mut bank = bank();
        assert!(matches!(
            bank.declare("acc", Value::Float(0.0)),
            Err(MachineError::DuplicateRegister { .. })
        ));
        assert!(matches!(
            bank.declare("temp", Value::Int(0)),
            Err(MachineError::DuplicateRegister { .. })
        ));
    }

    #[test]
    fn rejects_names_that_cannot_be_tokens() {
        let mut bank = RegisterBank::new();
        for name in ["", "a b", "a,b", "#x", ".int", "\"q\""] {
            assert!(
                matches!(
                    bank.declare(name, Value::Int(0)),
                    Err(MachineError::InvalidRegisterName { .. })
                ),
                "{name:?} should be rejected"
            );
        }
        assert!(bank.declare("r0", Value::Int(0)).is_ok());
    }

    #[test]
    fn points_are_sorted_by_name() {
        let mut bank = bank();
        bank.declare("b", Value::Float(0.25)).unwrap();
        let names: Vec<&str> = bank.points().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["acc", "b", "temp"]);
    }

    #[test]
    fn parse_literals() {
        assert_eq!(Value::parse(NumericKind::Int, "-7"), Ok(Value::Int(-7)));
        assert_eq!(Value::parse(NumericKind::Float, "2.5"), Ok(Value::Float(2.5)));
        assert_eq!(Value::parse(NumericKind::Float, "3"), Ok(Value::Float(3.0)));
        assert!(matches!(
            Value::parse(NumericKind::Int, "2.5"),
            Err(MachineError::InvalidLiteral { .. })
        ));
    }

    #[test]
    fn value_display() {
        assert_eq!(Value::Int(5).to_string(), "5");
        assert_eq!(Value::Float(2.0).to_string(), "2.0");
    }
}
