//! Basis-point fee fractions.

use core::fmt;

use super::{Amount, Rounding};
use crate::error::{EngineError, Result};

/// The value representing 100%.
const BPS_DENOMINATOR: u128 = 10_000;

/// A fraction expressed in basis points (1 bp = 0.01%, 10 000 bp = 100%).
///
/// The standard swap fee of 0.3% is `BasisPoints::new(30)`. Construction
/// is unchecked; contexts that require a sub-100% fraction (pool fees)
/// validate at configuration time.
///
/// # Examples
///
/// ```
/// use basin_amm::domain::{Amount, BasisPoints, Rounding};
///
/// let fee = BasisPoints::new(30);
/// let charge = fee.apply(Amount::new(1_000_000), Rounding::Up).expect("no overflow");
/// assert_eq!(charge, Amount::new(3_000));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct BasisPoints(u32);

impl BasisPoints {
    /// Zero basis points (0%).
    pub const ZERO: Self = Self(0);

    /// 100% expressed in basis points.
    pub const ONE_HUNDRED_PERCENT: Self = Self(BPS_DENOMINATOR as u32);

    /// Creates a `BasisPoints` value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw basis-point count.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns `true` if the value is a proper fraction (`< 10_000`).
    #[must_use]
    pub const fn is_fraction(&self) -> bool {
        (self.0 as u128) < BPS_DENOMINATOR
    }

    /// Computes `amount * self / 10_000` with explicit rounding.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Overflow`] if the intermediate product does
    /// not fit in 128 bits.
    pub const fn apply(&self, amount: Amount, rounding: Rounding) -> Result<Amount> {
        let product = match amount.get().checked_mul(self.0 as u128) {
            Some(v) => v,
            None => return Err(EngineError::Overflow("basis-point product overflow")),
        };
        let quotient = product / BPS_DENOMINATOR;
        match rounding {
            Rounding::Down => Ok(Amount::new(quotient)),
            Rounding::Up => {
                if product % BPS_DENOMINATOR != 0 {
                    Ok(Amount::new(quotient + 1))
                } else {
                    Ok(Amount::new(quotient))
                }
            }
        }
    }

    /// Splits `amount` into `(net, fee)` where the fee is this fraction of
    /// the amount, rounded up.
    ///
    /// Rounding the fee up floors the net input, which always favors the
    /// pool.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Overflow`] if the fee computation overflows
    /// or the fee exceeds the amount (fraction above 100%).
    pub fn deduct_from(&self, amount: Amount) -> Result<(Amount, Amount)> {
        let fee = self.apply(amount, Rounding::Up)?;
        let net = amount
            .checked_sub(&fee)
            .ok_or(EngineError::Overflow("fee exceeds amount"))?;
        Ok((net, fee))
    }
}

impl fmt::Display for BasisPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bp", self.0)
    }
}
