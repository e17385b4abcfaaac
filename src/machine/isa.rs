//! Built-in instruction set.
//!
//! The [`for_each_builtin!`] macro holds the canonical table of built-in
//! operators and hands it to a callback macro, so the [`Builtin`] enum and its
//! metadata are generated from one list.
//!
//! # Operand conventions
//!
//! The first operand of every non-control instruction is the destination
//! register. Folds seed their accumulator with the destination's current
//! contents and apply the remaining operands left to right:
//!
//! ```text
//! SUB acc, 3, step     # acc = (acc - 3) - step
//! FMUL gain, 0.5       # gain = gain * 0.5
//! LT hot, temp, 80     # hot = (temp < 80) as 0/1
//! ```

use crate::machine::cost::CostCategory;
use crate::machine::errors::MachineError;
use crate::machine::operator::{Arity, ExecContext, Operator};
use crate::machine::ops;

/// Largest operand count (destination included) accepted by a fold.
pub const MAX_OPERANDS: usize = 16;

/// Invokes a callback macro with the complete built-in operator list.
///
/// Each entry is `Name = "MNEMONIC", Category, [min, max], cost`.
macro_rules! for_each_builtin {
    ($callback:ident) => {
        $callback! {
            // =========================
            // Integer arithmetic
            // =========================
            /// ADD rd, a, ... ; rd = rd + a + ... (wrapping)
            Add = "ADD", Arithmetic, [2, MAX_OPERANDS], 3.0,
            /// SUB rd, a, ... ; rd = rd - a - ... (wrapping)
            Sub = "SUB", Arithmetic, [2, MAX_OPERANDS], 3.0,
            /// MUL rd, a, ... ; rd = rd * a * ... (wrapping)
            Mul = "MUL", Arithmetic, [2, MAX_OPERANDS], 5.0,
            /// DIV rd, a, ... ; rd = rd / a / ... (faults on division by zero)
            Div = "DIV", Arithmetic, [2, MAX_OPERANDS], 10.0,
            /// MOD rd, a, ... ; rd = rd % a % ... (faults on division by zero)
            Mod = "MOD", Arithmetic, [2, MAX_OPERANDS], 10.0,
            /// MIN rd, a, ... ; rd = min(rd, a, ...)
            Min = "MIN", Arithmetic, [2, MAX_OPERANDS], 3.0,
            /// MAX rd, a, ... ; rd = max(rd, a, ...)
            Max = "MAX", Arithmetic, [2, MAX_OPERANDS], 3.0,
            // =========================
            // Bitwise
            // =========================
            /// AND rd, a, ... ; rd = rd & a & ...
            And = "AND", Bitwise, [2, MAX_OPERANDS], 2.0,
            /// OR rd, a, ... ; rd = rd | a | ...
            Or = "OR", Bitwise, [2, MAX_OPERANDS], 2.0,
            /// XOR rd, a, ... ; rd = rd ^ a ^ ...
            Xor = "XOR", Bitwise, [2, MAX_OPERANDS], 2.0,
            /// SHL rd, n, ... ; rd = rd << n (shift amount masked to 0..=63)
            Shl = "SHL", Bitwise, [2, MAX_OPERANDS], 3.0,
            /// SHR rd, n, ... ; rd = rd >> n (arithmetic, masked to 0..=63)
            Shr = "SHR", Bitwise, [2, MAX_OPERANDS], 3.0,
            // =========================
            // Float arithmetic
            // =========================
            /// FADD fd, a, ... ; fd = fd + a + ...
            FAdd = "FADD", Arithmetic, [2, MAX_OPERANDS], 4.0,
            /// FSUB fd, a, ... ; fd = fd - a - ...
            FSub = "FSUB", Arithmetic, [2, MAX_OPERANDS], 4.0,
            /// FMUL fd, a, ... ; fd = fd * a * ...
            FMul = "FMUL", Arithmetic, [2, MAX_OPERANDS], 6.0,
            /// FDIV fd, a, ... ; fd = fd / a / ... (IEEE-754, no fault)
            FDiv = "FDIV", Arithmetic, [2, MAX_OPERANDS], 12.0,
            /// FMIN fd, a, ... ; fd = min(fd, a, ...)
            FMin = "FMIN", Arithmetic, [2, MAX_OPERANDS], 4.0,
            /// FMAX fd, a, ... ; fd = max(fd, a, ...)
            FMax = "FMAX", Arithmetic, [2, MAX_OPERANDS], 4.0,
            // =========================
            // Comparison (int destination receives 1 or 0)
            // =========================
            /// EQ rd, a, b ; rd = (a == b)
            Eq = "EQ", Comparison, [3, 3], 3.0,
            /// NE rd, a, b ; rd = (a != b)
            Ne = "NE", Comparison, [3, 3], 3.0,
            /// LT rd, a, b ; rd = (a < b)
            Lt = "LT", Comparison, [3, 3], 3.0,
            /// LE rd, a, b ; rd = (a <= b)
            Le = "LE", Comparison, [3, 3], 3.0,
            /// GT rd, a, b ; rd = (a > b)
            Gt = "GT", Comparison, [3, 3], 3.0,
            /// GE rd, a, b ; rd = (a >= b)
            Ge = "GE", Comparison, [3, 3], 3.0,
            /// FEQ rd, fa, fb ; rd = (fa == fb)
            FEq = "FEQ", Comparison, [3, 3], 4.0,
            /// FNE rd, fa, fb ; rd = (fa != fb)
            FNe = "FNE", Comparison, [3, 3], 4.0,
            /// FLT rd, fa, fb ; rd = (fa < fb)
            FLt = "FLT", Comparison, [3, 3], 4.0,
            /// FLE rd, fa, fb ; rd = (fa <= fb)
            FLe = "FLE", Comparison, [3, 3], 4.0,
            /// FGT rd, fa, fb ; rd = (fa > fb)
            FGt = "FGT", Comparison, [3, 3], 4.0,
            /// FGE rd, fa, fb ; rd = (fa >= fb)
            FGe = "FGE", Comparison, [3, 3], 4.0,
            // =========================
            // Moves / casts
            // =========================
            /// MOV rd, a ; rd = a
            Mov = "MOV", Transfer, [2, 2], 1.0,
            /// FMOV fd, a ; fd = a
            FMov = "FMOV", Transfer, [2, 2], 1.0,
            /// ITOF fd, a ; fd = a as float
            IToF = "ITOF", Transfer, [2, 2], 2.0,
            /// FTOI rd, fa ; rd = fa truncated toward zero (saturating, NaN -> 0)
            FToI = "FTOI", Transfer, [2, 2], 2.0,
            // =========================
            // Unary, in place
            // =========================
            /// NEG rd ; rd = -rd (wrapping)
            Neg = "NEG", Arithmetic, [1, 1], 2.0,
            /// ABS rd ; rd = |rd| (wrapping)
            Abs = "ABS", Arithmetic, [1, 1], 2.0,
            /// FNEG fd ; fd = -fd
            FNeg = "FNEG", Arithmetic, [1, 1], 2.0,
            /// FABS fd ; fd = |fd|
            FAbs = "FABS", Arithmetic, [1, 1], 2.0,
            // =========================
            // Control
            // =========================
            /// NOP ; does nothing
            Nop = "NOP", Control, [0, 0], 1.0,
            /// HALT ; stops the machine gracefully
            Halt = "HALT", Control, [0, 0], 0.0,
        }
    };
}

macro_rules! define_builtins {
    (
        $(
            $(#[$doc:meta])*
            $name:ident = $mnemonic:literal, $category:ident, [ $min:expr, $max:expr ], $cost:expr
        ),* $(,)?
    ) => {
        /// Built-in operators.
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
        pub enum Builtin {
            $(
                $(#[$doc])*
                $name,
            )*
        }

        impl Builtin {
            /// Every built-in, in table order.
            pub const ALL: &'static [Builtin] = &[ $( Builtin::$name, )* ];

            /// Returns the opcode for this operator.
            pub const fn mnemonic(&self) -> &'static str {
                match self {
                    $( Builtin::$name => $mnemonic, )*
                }
            }

            /// Returns the base cost for this operator.
            pub const fn base_cost(&self) -> f64 {
                match self {
                    $( Builtin::$name => $cost, )*
                }
            }

            pub const fn cost_category(&self) -> CostCategory {
                match self {
                    $( Builtin::$name => CostCategory::$category, )*
                }
            }

            /// Operand-count bounds, destination included.
            pub const fn operand_bounds(&self) -> Arity {
                match self {
                    $( Builtin::$name => Arity::between($min, $max), )*
                }
            }
        }
    };
}

for_each_builtin!(define_builtins);

impl Operator for Builtin {
    fn opcode(&self) -> &str {
        self.mnemonic()
    }

    fn arity(&self) -> Arity {
        self.operand_bounds()
    }

    fn cost(&self) -> f64 {
        self.base_cost()
    }

    fn category(&self) -> CostCategory {
        self.cost_category()
    }

    fn run(&self, args: &[String], ctx: &mut ExecContext<'_>) -> Result<(), MachineError> {
        self.operand_bounds().check(self.mnemonic(), args.len())?;

        match (self, args) {
            // Integer arithmetic
            (Builtin::Add, [dst, rest @ ..]) => {
                ops::fold::<i64>(ctx.registers, dst, rest, |a, b| Some(a.wrapping_add(b)))
            }
            (Builtin::Sub, [dst, rest @ ..]) => {
                ops::fold::<i64>(ctx.registers, dst, rest, |a, b| Some(a.wrapping_sub(b)))
            }
            (Builtin::Mul, [dst, rest @ ..]) => {
                ops::fold::<i64>(ctx.registers, dst, rest, |a, b| Some(a.wrapping_mul(b)))
            }
            (Builtin::Div, [dst, rest @ ..]) => {
                ops::fold::<i64>(ctx.registers, dst, rest, |a, b| {
                    (b != 0).then(|| a.wrapping_div(b))
                })
            }
            (Builtin::Mod, [dst, rest @ ..]) => {
                ops::fold::<i64>(ctx.registers, dst, rest, |a, b| {
                    (b != 0).then(|| a.wrapping_rem(b))
                })
            }
            (Builtin::Min, [dst, rest @ ..]) => {
                ops::fold::<i64>(ctx.registers, dst, rest, |a, b| Some(a.min(b)))
            }
            (Builtin::Max, [dst, rest @ ..]) => {
                ops::fold::<i64>(ctx.registers, dst, rest, |a, b| Some(a.max(b)))
            }
            // Bitwise
            (Builtin::And, [dst, rest @ ..]) => {
                ops::fold::<i64>(ctx.registers, dst, rest, |a, b| Some(a & b))
            }
            (Builtin::Or, [dst, rest @ ..]) => {
                ops::fold::<i64>(ctx.registers, dst, rest, |a, b| Some(a | b))
            }
            (Builtin::Xor, [dst, rest @ ..]) => {
                ops::fold::<i64>(ctx.registers, dst, rest, |a, b| Some(a ^ b))
            }
            (Builtin::Shl, [dst, rest @ ..]) => {
                ops::fold::<i64>(ctx.registers, dst, rest, |a, b| {
                    Some(a.wrapping_shl(b as u32))
                })
            }
            (Builtin::Shr, [dst, rest @ ..]) => {
                ops::fold::<i64>(ctx.registers, dst, rest, |a, b| {
                    Some(a.wrapping_shr(b as u32))
                })
            }
            // Float arithmetic
            (Builtin::FAdd, [dst, rest @ ..]) => {
                ops::fold::<f64>(ctx.registers, dst, rest, |a, b| Some(a + b))
            }
            (Builtin::FSub, [dst, rest @ ..]) => {
                ops::fold::<f64>(ctx.registers, dst, rest, |a, b| Some(a - b))
            }
            (Builtin::FMul, [dst, rest @ ..]) => {
                ops::fold::<f64>(ctx.registers, dst, rest, |a, b| Some(a * b))
            }
            (Builtin::FDiv, [dst, rest @ ..]) => {
                ops::fold::<f64>(ctx.registers, dst, rest, |a, b| Some(a / b))
            }
            (Builtin::FMin, [dst, rest @ ..]) => {
                ops::fold::<f64>(ctx.registers, dst, rest, |a, b| Some(a.min(b)))
            }
            (Builtin::FMax, [dst, rest @ ..]) => {
                ops::fold::<f64>(ctx.registers, dst, rest, |a, b| Some(a.max(b)))
            }
            // Comparison
            (Builtin::Eq, [dst, a, b]) => ops::compare::<i64>(ctx.registers, dst, a, b, |x, y| x == y),
            (Builtin::Ne, [dst, a, b]) => ops::compare::<i64>(ctx.registers, dst, a, b, |x, y| x != y),
            (Builtin::Lt, [dst, a, b]) => ops::compare::<i64>(ctx.registers, dst, a, b, |x, y| x < y),
            (Builtin::Le, [dst, a, b]) => ops::compare::<i64>(ctx.registers, dst, a, b, |x, y| x <= y),
            (Builtin::Gt, [dst, a, b]) => ops::compare::<i64>(ctx.registers, dst, a, b, |x, y| x > y),
            (Builtin::Ge, [dst, a, b]) => ops::compare::<i64>(ctx.registers, dst, a, b, |x, y| x >= y),
            (Builtin::FEq, [dst, a, b]) => ops::compare::<f64>(ctx.registers, dst, a, b, |x, y| x == y),
            (Builtin::FNe, [dst, a, b]) => ops::compare::<f64>(ctx.registers, dst, a, b, |x, y| x != y),
            (Builtin::FLt, [dst, a, b]) => ops::compare::<f64>(ctx.registers, dst, a, b, |x, y| x < y),
            (Builtin::FLe, [dst, a, b]) => ops::compare::<f64>(ctx.registers, dst, a, b, |x, y| x <= y),
            (Builtin::FGt, [dst, a, b]) => ops::compare::<f64>(ctx.registers, dst, a, b, |x, y| x > y),
            (Builtin::FGe, [dst, a, b]) => ops::compare::<f64>(ctx.registers, dst, a, b, |x, y| x >= y),
            // Moves / casts
            (Builtin::Mov, [dst, src]) => ops::transfer::<i64, i64>(ctx.registers, dst, src, |v| v),
            (Builtin::FMov, [dst, src]) => ops::transfer::<f64, f64>(ctx.registers, dst, src, |v| v),
            (Builtin::IToF, [dst, src]) => {
                ops::transfer::<i64, f64>(ctx.registers, dst, src, |v| v as f64)
            }
            (Builtin::FToI, [dst, src]) => {
                ops::transfer::<f64, i64>(ctx.registers, dst, src, |v| v as i64)
            }
            // Unary
            (Builtin::Neg, [dst]) => ops::unary::<i64>(ctx.registers, dst, i64::wrapping_neg),
            (Builtin::Abs, [dst]) => ops::unary::<i64>(ctx.registers, dst, i64::wrapping_abs),
            (Builtin::FNeg, [dst]) => ops::unary::<f64>(ctx.registers, dst, |v| -v),
            (Builtin::FAbs, [dst]) => ops::unary::<f64>(ctx.registers, dst, f64::abs),
            // Control
            (Builtin::Nop, []) => Ok(()),
            (Builtin::Halt, []) => {
                ctx.request_halt();
                Ok(())
            }
            _ => Err(MachineError::ArityMismatch {
                opcode: self.mnemonic().to_string(),
                min: self.operand_bounds().min,
                max: self.operand_bounds().max,
                actual: args.len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::registers::{RegisterBank, Value};
    use std::collections::HashSet;

    fn bank() -> RegisterBank {
        let mut bank = RegisterBank::new();
        bank.declare("acc", Value::Int(10)).unwrap();
        bank.declare("n", Value::Int(-7)).unwrap();
        bank.declare("flag", Value::Int(9)).unwrap();
        bank.declare("f", Value::Float(1.5)).unwrap();
        bank
    }

    fn run(bank: &mut RegisterBank, op: Builtin, args: &[&str]) -> Result<bool, MachineError> {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        let mut ctx = ExecContext::new(bank);
        op.run(&args, &mut ctx)?;
        Ok(ctx.halt_requested())
    }

    fn int(bank: &RegisterBank, name: &str) -> i64 {
        match bank.lookup(name) {
            Some(Value::Int(v)) => v,
            other => panic!("{name} is not an int register: {other:?}"),
        }
    }

    fn float(bank: &RegisterBank, name: &str) -> f64 {
        match bank.lookup(name) {
            Some(Value::Float(v)) => v,
            other => panic!("{name} is not a float register: {other:?}"),
        }
    }

    #[test]
    fn mnemonics_are_unique_and_upper_case() {
        let mut seen = HashSet::new();
        for &op in Builtin::ALL {
            assert!(seen.insert(op.mnemonic()), "duplicate {}", op.mnemonic());
            assert_eq!(op.mnemonic(), op.mnemonic().to_ascii_uppercase());
        }
    }

    #[test]
    fn costs_are_non_negative() {
        for &op in Builtin::ALL {
            assert!(op.base_cost() >= 0.0, "{}", op.mnemonic());
        }
    }

    #[test]
    fn subtract_folds_left_to_right() {
        let mut bank = bank();
        run(&mut bank, Builtin::Sub, &["acc", "3", "2"]).unwrap();
        assert_eq!(int(&bank, "acc"), 5);
    }

    #[test]
    fn integer_family() {
        let mut bank = bank();
        run(&mut bank, Builtin::Add, &["acc", "n", "1"]).unwrap();
        assert_eq!(int(&bank, "acc"), 4);
        run(&mut bank, Builtin::Mul, &["acc", "3", "2"]).unwrap();
        assert_eq!(int(&bank, "acc"), 24);
        run(&mut bank, Builtin::Div, &["acc", "5"]).unwrap();
        assert_eq!(int(&bank, "acc"), 4);
        run(&mut bank, Builtin::Mod, &["n", "4"]).unwrap();
        assert_eq!(int(&bank, "n"), -3);
        run(&mut bank, Builtin::Min, &["acc", "9", "-2", "3"]).unwrap();
        assert_eq!(int(&bank, "acc"), -2);
        run(&mut bank, Builtin::Max, &["acc", "9", "-2", "3"]).unwrap();
        assert_eq!(int(&bank, "acc"), 9);
    }

    #[test]
    fn integer_arithmetic_wraps() {
        let mut bank = bank();
        run(&mut bank, Builtin::Mov, &["acc", i64::MAX.to_string().as_str()]).unwrap();
        run(&mut bank, Builtin::Add, &["acc", "1"]).unwrap();
        assert_eq!(int(&bank, "acc"), i64::MIN);
        run(&mut bank, Builtin::Div, &["acc", "-1"]).unwrap();
        assert_eq!(int(&bank, "acc"), i64::MIN);
    }

    #[test]
    fn division_by_zero_faults_without_write() {
        let mut bank = bank();
        let err = run(&mut bank, Builtin::Div, &["acc", "2", "0"]).unwrap_err();
        assert_eq!(
            err,
            MachineError::DivisionByZero {
                register: "acc".into()
            }
        );
        assert_eq!(int(&bank, "acc"), 10);
        assert!(run(&mut bank, Builtin::Mod, &["acc", "0"]).is_err());
        assert_eq!(int(&bank, "acc"), 10);
    }

    #[test]
    fn bitwise_family() {
        let mut bank = bank();
        run(&mut bank, Builtin::And, &["flag", "12"]).unwrap();
        assert_eq!(int(&bank, "flag"), 8);
        run(&mut bank, Builtin::Or, &["flag", "1", "2"]).unwrap();
        assert_eq!(int(&bank, "flag"), 11);
        run(&mut bank, Builtin::Xor, &["flag", "11"]).unwrap();
        assert_eq!(int(&bank, "flag"), 0);
        run(&mut bank, Builtin::Mov, &["flag", "1"]).unwrap();
        run(&mut bank, Builtin::Shl, &["flag", "4"]).unwrap();
        assert_eq!(int(&bank, "flag"), 16);
        run(&mut bank, Builtin::Shl, &["flag", "64"]).unwrap();
        assert_eq!(int(&bank, "flag"), 16);
        run(&mut bank, Builtin::Shr, &["n", "1"]).unwrap();
        assert_eq!(int(&bank, "n"), -4);
    }

    #[test]
    fn float_family() {
        let mut bank = bank();
        run(&mut bank, Builtin::FAdd, &["f", "0.5", "1"]).unwrap();
        assert_eq!(float(&bank, "f"), 3.0);
        run(&mut bank, Builtin::FSub, &["f", "0.5"]).unwrap();
        assert_eq!(float(&bank, "f"), 2.5);
        run(&mut bank, Builtin::FMul, &["f", "4"]).unwrap();
        assert_eq!(float(&bank, "f"), 10.0);
        run(&mut bank, Builtin::FDiv, &["f", "4"]).unwrap();
        assert_eq!(float(&bank, "f"), 2.5);
        run(&mut bank, Builtin::FMin, &["f", "3", "-1.5"]).unwrap();
        assert_eq!(float(&bank, "f"), -1.5);
        run(&mut bank, Builtin::FMax, &["f", "0.25"]).unwrap();
        assert_eq!(float(&bank, "f"), 0.25);
        run(&mut bank, Builtin::FDiv, &["f", "0"]).unwrap();
        assert_eq!(float(&bank, "f"), f64::INFINITY);
    }

    #[test]
    fn comparisons_write_flags() {
        let mut bank = bank();
        run(&mut bank, Builtin::Lt, &["flag", "n", "acc"]).unwrap();
        assert_eq!(int(&bank, "flag"), 1);
        run(&mut bank, Builtin::Ge, &["flag", "n", "acc"]).unwrap();
        assert_eq!(int(&bank, "flag"), 0);
        run(&mut bank, Builtin::Eq, &["flag", "acc", "10"]).unwrap();
        assert_eq!(int(&bank, "flag"), 1);
        run(&mut bank, Builtin::FGt, &["flag", "f", "1"]).unwrap();
        assert_eq!(int(&bank, "flag"), 1);
        run(&mut bank, Builtin::FEq, &["flag", "NaN", "NaN"]).unwrap();
        assert_eq!(int(&bank, "flag"), 0);
        run(&mut bank, Builtin::FNe, &["flag", "NaN", "NaN"]).unwrap();
        assert_eq!(int(&bank, "flag"), 1);
    }

    #[test]
    fn float_compare_needs_int_destination() {
        let mut bank = bank();
        let err = run(&mut bank, Builtin::FLt, &["f", "1", "2"]).unwrap_err();
        assert!(matches!(err, MachineError::NoSuchRegister { name, .. } if name == "f"));
        assert_eq!(float(&bank, "f"), 1.5);
    }

    #[test]
    fn moves_and_casts() {
        let mut bank = bank();
        run(&mut bank, Builtin::Mov, &["acc", "n"]).unwrap();
        assert_eq!(int(&bank, "acc"), -7);
        run(&mut bank, Builtin::IToF, &["f", "acc"]).unwrap();
        assert_eq!(float(&bank, "f"), -7.0);
        run(&mut bank, Builtin::FToI, &["acc", "2.9"]).unwrap();
        assert_eq!(int(&bank, "acc"), 2);
        run(&mut bank, Builtin::FToI, &["acc", "NaN"]).unwrap();
        assert_eq!(int(&bank, "acc"), 0);
        run(&mut bank, Builtin::FToI, &["acc", "1e300"]).unwrap();
        assert_eq!(int(&bank, "acc"), i64::MAX);
        // MOV is int-only
        assert!(run(&mut bank, Builtin::Mov, &["f", "1"]).is_err());
    }

    #[test]
    fn unary_in_place() {
        let mut bank = bank();
        run(&mut bank, Builtin::Neg, &["n"]).unwrap();
        assert_eq!(int(&bank, "n"), 7);
        run(&mut bank, Builtin::FNeg, &["f"]).unwrap();
        run(&mut bank, Builtin::FAbs, &["f"]).unwrap();
        assert_eq!(float(&bank, "f"), 1.5);
        run(&mut bank, Builtin::Mov, &["n", i64::MIN.to_string().as_str()]).unwrap();
        run(&mut bank, Builtin::Abs, &["n"]).unwrap();
        assert_eq!(int(&bank, "n"), i64::MIN);
    }

    #[test]
    fn halt_requests_stop() {
        let mut bank = bank();
        assert_eq!(run(&mut bank, Builtin::Halt, &[]), Ok(true));
        assert_eq!(run(&mut bank, Builtin::Nop, &[]), Ok(false));
    }

    #[test]
    fn direct_run_still_checks_arity() {
        let mut bank = bank();
        assert!(matches!(
            run(&mut bank, Builtin::Mov, &["acc"]),
            Err(MachineError::ArityMismatch { min: 2, max: 2, actual: 1, .. })
        ));
        let too_many = vec!["1"; MAX_OPERANDS + 1];
        assert!(matches!(
            run(&mut bank, Builtin::Add, &too_many),
            Err(MachineError::ArityMismatch { .. })
        ));
    }
}
