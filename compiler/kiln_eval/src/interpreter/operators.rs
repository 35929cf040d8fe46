//! Numeric operators.
//!
//! All numbers are `f64`. Bitwise operators, shifts, and `%` work on the
//! `i64` truncation of their operands and convert back.

use kiln_ir::BinaryOp;

#[allow(
    clippy::cast_possible_truncation,
    reason = "integer operators truncate toward zero"
)]
#[inline]
fn to_int(n: f64) -> i64 {
    n as i64
}

#[allow(clippy::cast_precision_loss, reason = "results above 2^53 round")]
#[inline]
fn from_int(n: i64) -> f64 {
    n as f64
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "shift amounts wrap modulo the bit width"
)]
#[inline]
fn shift_amount(n: f64) -> u32 {
    to_int(n) as u32
}

/// Apply an arithmetic or bitwise operator.
///
/// # Panics
/// Panics for operators that are not numeric.
pub(crate) fn arithmetic(op: BinaryOp, l: f64, r: f64) -> f64 {
    match op {
        BinaryOp::Add => l + r,
        BinaryOp::Sub => l - r,
        BinaryOp::Mul => l * r,
        BinaryOp::Div => l / r,
        BinaryOp::Rem => match to_int(l).checked_rem(to_int(r)) {
            Some(rem) => from_int(rem),
            // Zero divisor; `i64::MIN % -1` overflows but is 0.
            None if to_int(r) == 0 => f64::NAN,
            None => 0.0,
        },
        BinaryOp::Pow => l.powf(r),
        BinaryOp::Shl => from_int(to_int(l).wrapping_shl(shift_amount(r))),
        BinaryOp::Shr => from_int(to_int(l).wrapping_shr(shift_amount(r))),
        BinaryOp::BitAnd => from_int(to_int(l) & to_int(r)),
        BinaryOp::BitOr => from_int(to_int(l) | to_int(r)),
        BinaryOp::BitXor => from_int(to_int(l) ^ to_int(r)),
        _ => panic!("{op:?} is not an arithmetic operator"),
    }
}

/// Apply a relational operator.
///
/// # Panics
/// Panics for operators that are not relational.
pub(crate) fn compare(op: BinaryOp, l: f64, r: f64) -> bool {
    match op {
        BinaryOp::Lt => l < r,
        BinaryOp::LtEq => l <= r,
        BinaryOp::Gt => l > r,
        BinaryOp::GtEq => l >= r,
        _ => panic!("{op:?} is not a relational operator"),
    }
}

/// `~n`.
pub(crate) fn bit_not(n: f64) -> f64 {
    from_int(!to_int(n))
}
