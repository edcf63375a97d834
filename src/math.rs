//! Wide integer helpers for reserve and share arithmetic.
//!
//! Products of two 18-decimal quantities routinely exceed 128 bits, so the
//! multiply-divide and square-root primitives here widen to 256 bits
//! internally and only narrow back once the result is known to fit.
//! Division takes an explicit [`Rounding`] direction; there is no silent
//! truncation anywhere in the engine.

use ethereum_types::U256;

use crate::domain::{Amount, Rounding};
use crate::error::{EngineError, Result};

/// Computes `a * b / divisor` with a 256-bit intermediate product.
///
/// # Errors
///
/// - [`EngineError::DivisionByZero`] if `divisor` is zero.
/// - [`EngineError::Overflow`] if the quotient does not fit in 128 bits.
pub fn mul_div(a: Amount, b: Amount, divisor: Amount, rounding: Rounding) -> Result<Amount> {
    if divisor.is_zero() {
        return Err(EngineError::DivisionByZero);
    }
    // 128 x 128 -> at most 256 bits; the widened product cannot overflow.
    let product = U256::from(a.get()) * U256::from(b.get());
    let d = U256::from(divisor.get());
    let mut quotient = product / d;
    if matches!(rounding, Rounding::Up) && !(product % d).is_zero() {
        quotient += U256::one();
    }
    if quotient > U256::from(u128::MAX) {
        return Err(EngineError::Overflow("mul_div result exceeds 128 bits"));
    }
    Ok(Amount::new(quotient.as_u128()))
}

/// Computes `⌊√(a * b)⌋` over the full 256-bit product.
///
/// Newton's method; converges in at most 255 iterations. The result of a
/// 256-bit square root always fits in 128 bits, so the return value is
/// exact and total.
#[must_use]
pub fn sqrt_product(a: Amount, b: Amount) -> Amount {
    let n = U256::from(a.get()) * U256::from(b.get());
    if n.is_zero() {
        return Amount::ZERO;
    }
    let two = U256::from(2u64);
    let mut x = n;
    let mut y = (x + U256::one()) / two;
    while y < x {
        x = y;
        y = (x + n / x) / two;
    }
    Amount::new(x.as_u128())
}
