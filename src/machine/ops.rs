//! Generic instruction templates shared by the built-in families.
//!
//! Every template validates the destination and resolves all operands before
//! it writes anything, so a failing instruction leaves the bank untouched.

use crate::machine::errors::MachineError;
use crate::machine::operand::{destination, resolve, resolve_all};
use crate::machine::registers::{Numeric, RegisterBank};

/// `dst = combine(...combine(combine(dst, a), b)..., z)`.
///
/// `combine` returns `None` when the step is undefined (integer division by
/// zero); the fold then fails with [`MachineError::DivisionByZero`].
pub fn fold<T: Numeric>(
    bank: &mut RegisterBank,
    dst: &str,
    operands: &[String],
    combine: impl Fn(T, T) -> Option<T>,
) -> Result<(), MachineError> {
    let seed = destination::<T>(bank, dst)?;
    let values = resolve_all::<T, _>(bank, operands)?;
    let result = values
        .into_iter()
        .try_fold(seed, &combine)
        .ok_or_else(|| MachineError::DivisionByZero {
            register: dst.to_string(),
        })?;
    T::store(bank, dst, result)
}

/// `dst = pred(a, b)` as 1 or 0; `dst` is always an integer register.
pub fn compare<T: Numeric>(
    bank: &mut RegisterBank,
    dst: &str,
    a: &str,
    b: &str,
    pred: impl Fn(T, T) -> bool,
) -> Result<(), MachineError> {
    destination::<i64>(bank, dst)?;
    let lhs = resolve::<T>(bank, a)?;
    let rhs = resolve::<T>(bank, b)?;
    i64::store(bank, dst, i64::from(pred(lhs, rhs)))
}

/// `dst = convert(src)`, reading kind `S` and writing kind `D`.
pub fn transfer<S: Numeric, D: Numeric>(
    bank: &mut RegisterBank,
    dst: &str,
    src: &str,
    convert: impl Fn(S) -> D,
) -> Result<(), MachineError> {
    destination::<D>(bank, dst)?;
    let value = resolve::<S>(bank, src)?;
    D::store(bank, dst, convert(value))
}

/// `dst = f(dst)`.
pub fn unary<T: Numeric>(
    bank: &mut RegisterBank,
    dst: &str,
    f: impl Fn(T) -> T,
) -> Result<(), MachineError> {
    let value = destination::<T>(bank, dst)?;
    T::store(bank, dst, f(value))
}
