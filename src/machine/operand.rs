//! Operand resolution.
//!
//! A token names a register of the instruction's numeric kind, or it is a
//! literal of that kind. Register names shadow literals in both namespaces: a
//! register called `10` is never the number ten, whichever family reads it.
//! Resolution never writes to the bank.

use crate::machine::errors::MachineError;
use crate::machine::registers::{Numeric, RegisterBank};

/// What a token denotes for a given numeric kind.
#[derive(Clone, Debug, PartialEq)]
pub enum Operand<'a, T> {
    /// Contents of the named register.
    Reg(&'a str),
    /// Parsed literal value.
    Literal(T),
}

impl<'a, T: Numeric> Operand<'a, T> {
    /// Classifies `token` against the `T` namespace of `bank`.
    ///
    /// Order: register of kind `T`, then register of the other kind (which is
    /// [`MachineError::NoSuchRegister`]), then literal of kind `T`. Anything
    /// else is [`MachineError::UnresolvedOperand`].
    pub fn classify(bank: &RegisterBank, token: &'a str) -> Result<Self, MachineError> {
        if bank.contains(T::KIND, token) {
            return Ok(Operand::Reg(token));
        }
        if bank.contains(T::KIND.other(), token) {
            return Err(MachineError::NoSuchRegister {
                kind: T::KIND,
                name: token.to_string(),
            });
        }
        T::parse_literal(token)
            .map(Operand::Literal)
            .ok_or_else(|| MachineError::UnresolvedOperand {
                kind: T::KIND,
                token: token.to_string(),
            })
    }

    /// Current value denoted by this operand.
    pub fn value(&self, bank: &RegisterBank) -> Result<T, MachineError> {
        match self {
            Operand::Literal(v) => Ok(*v),
            Operand::Reg(name) => T::load(bank, name).ok_or_else(|| MachineError::NoSuchRegister {
                kind: T::KIND,
                name: name.to_string(),
            }),
        }
    }
}

/// Resolves a single token to a value of kind `T`.
pub fn resolve<T: Numeric>(bank: &RegisterBank, token: &str) -> Result<T, MachineError> {
    Operand::<T>::classify(bank, token)?.value(bank)
}

/// Resolves every token, failing on the first one that does not resolve.
///
/// Nothing is committed anywhere: callers write results only after this
/// returns `Ok`.
pub fn resolve_all<T: Numeric, S: AsRef<str>>(
    bank: &RegisterBank,
    tokens: &[S],
) -> Result<Vec<T>, MachineError> {
    tokens
        .iter()
        .map(|token| resolve::<T>(bank, token.as_ref()))
        .collect()
}

/// Requires `name` to be an existing register of kind `T` and returns its contents.
pub fn destination<T: Numeric>(bank: &RegisterBank, name: &str) -> Result<T, MachineError> {
    T::load(bank, name).ok_or_else(|| MachineError::NoSuchRegister {
        kind: T::KIND,
        name: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::registers::{NumericKind, Value};

    fn bank() -> RegisterBank {
        let mut bank = RegisterBank::new();
        bank.declare("acc", Value::Int(10)).unwrap();
        bank.declare("step", Value::Int(3)).unwrap();
        bank.declare("7", Value::Int(70)).unwrap();
        bank.declare("volts", Value::Float(12.5)).unwrap();
        bank
    }

    #[test]
    fn register_reads_current_contents() {
        let mut bank = bank();
        assert_eq!(resolve::<i64>(&bank, "step"), Ok(3));
        bank.set("step", Value::Int(4)).unwrap();
        assert_eq!(resolve::<i64>(&bank, "step"), Ok(4));
    }

    #[test]
    fn literals_parse_per_kind() {
        let bank = bank();
        assert_eq!(resolve::<i64>(&bank, "-12"), Ok(-12));
        assert_eq!(resolve::<f64>(&bank, "0.5"), Ok(0.5));
        assert_eq!(resolve::<f64>(&bank, "2"), Ok(2.0));
    }

    #[test]
    fn register_names_shadow_literals() {
        let bank = bank();
        assert_eq!(resolve::<i64>(&bank, "7"), Ok(70));
        // `7` is an int register, so the float family never reads it as a literal
        assert_eq!(
            resolve::<f64>(&bank, "7"),
            Err(MachineError::NoSuchRegister {
                kind: NumericKind::Float,
                name: "7".into()
            })
        );
        assert_eq!(resolve::<f64>(&bank, "8"), Ok(8.0));
    }

    #[test]
    fn unparseable_token_is_unresolved() {
        let bank = bank();
        assert_eq!(
            resolve::<i64>(&bank, "abc"),
            Err(MachineError::UnresolvedOperand {
                kind: NumericKind::Int,
                token: "abc".into()
            })
        );
        assert!(matches!(
            resolve::<i64>(&bank, "1.5"),
            Err(MachineError::UnresolvedOperand { .. })
        ));
    }

    #[test]
    fn kinds_never_cross_resolve() {
        let bank = bank();
        assert_eq!(
            resolve::<i64>(&bank, "volts"),
            Err(MachineError::NoSuchRegister {
                kind: NumericKind::Int,
                name: "volts".into()
            })
        );
        assert!(matches!(
            resolve::<f64>(&bank, "acc"),
            Err(MachineError::NoSuchRegister {
                kind: NumericKind::Float,
                ..
            })
        ));
    }

    #[test]
    fn resolve_all_stops_at_first_failure() {
        let bank = bank();
        assert_eq!(resolve_all::<i64, _>(&bank, &["acc", "2", "step"]), Ok(vec![10, 2, 3]));
        let err = resolve_all::<i64, _>(&bank, &["acc", "bogus", "nope"]).unwrap_err();
        assert!(matches!(err, MachineError::UnresolvedOperand { token, .. } if token == "bogus"));
    }

    #[test]
    fn resolution_does_not_mutate_bank() {
        let bank = bank();
        let before = bank.clone();
        let _ = resolve_all::<i64, _>(&bank, &["acc", "x", "volts"]);
        let _ = resolve_all::<f64, _>(&bank, &["volts", "acc"]);
        assert_eq!(bank, before);
    }

    #[test]
    fn destination_must_exist_in_kind() {
        let bank = bank();
        assert_eq!(destination::<i64>(&bank, "acc"), Ok(10));
        assert!(destination::<i64>(&bank, "volts").is_err());
        assert!(destination::<f64>(&bank, "missing").is_err());
    }

    #[test]
    fn classify_reports_operand_shape() {
        let bank = bank();
        assert_eq!(Operand::<i64>::classify(&bank, "acc"), Ok(Operand::Reg("acc")));
        assert_eq!(Operand::<i64>::classify(&bank, "5"), Ok(Operand::Literal(5)));
    }
}
