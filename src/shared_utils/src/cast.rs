//! Null-safe numeric casts.
//!
//! Typed sinks (SQL columns, Arrow arrays) have no NaN for "missing", so every value
//! headed for one goes through these two functions. NaN and the infinities become
//! `None`; they never turn into zero.

/// Pass finite floats through; map NaN/±inf to `None`.
#[inline]
pub fn to_nullable_float(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Cast a float to an integer column value.
///
/// Non-finite input maps to `None`. Finite input truncates toward zero and saturates at
/// the `i64` bounds (the semantics of an `as` cast).
#[inline]
pub fn to_nullable_int(value: Option<f64>) -> Option<i64> {
    to_nullable_float(value).map(|v| v as i64)
}
