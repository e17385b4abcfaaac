//! Typed register machine.
//!
//! The machine executes textual instructions (an opcode plus operand tokens)
//! against a fixed bank of named integer and float registers.
//!
//! # Architecture
//!
//! - **Registers**: two disjoint namespaces, `i64` and `f64`, provisioned up front
//! - **Operands**: a token is a register of the instruction's kind or a literal
//!   of that kind; register names shadow literals
//! - **Operators**: trait objects in a host-owned, immutable [`operator::OperatorSet`]
//! - **Faults**: every failure moves the machine to `Errored` with a reasoning
//!   string; nothing unwinds past [`vm::Machine::dispatch`]
//! - **Commit**: an instruction resolves all operands before its single write
//!
//! # Modules
//!
//! - [`cost`]: Cost categories, per-machine profile, run budget meter
//! - [`errors`]: Error taxonomy
//! - [`isa`]: Built-in operator table
//! - [`operand`]: Operand resolution
//! - [`operator`]: Operator trait, arity, registry
//! - [`ops`]: Generic fold/compare/transfer/unary templates
//! - [`program`]: Program text and instructions
//! - [`registers`]: Register bank and numeric kinds
//! - [`state`]: Lifecycle controller
//! - [`vm`]: Dispatcher, run loop, inspection

pub mod cost;
pub mod errors;
pub mod isa;
pub mod operand;
pub mod operator;
pub mod ops;
pub mod program;
pub mod registers;
pub mod state;
pub mod vm;
