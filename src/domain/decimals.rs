//! Asset decimal scale and normalization.

use super::Amount;
use crate::error::{EngineError, Result};

/// Maximum decimal places an asset may use.
const MAX_DECIMALS: u8 = 18;

/// The common scale share accounting normalizes to.
const COMMON_SCALE: u8 = 18;

/// The number of decimal places of an asset's smallest unit.
///
/// Valid range is `0..=18`. Because the two assets of a pool may use
/// different scales, deposits are normalized to the common 18-decimal
/// scale before proportional share math; [`Decimals::normalize`] performs
/// that scaling.
///
/// # Examples
///
/// ```
/// use basin_amm::domain::{Amount, Decimals};
///
/// let usdc = Decimals::new(6).expect("valid");
/// // 1 USDC in its smallest unit, brought to the common 18-decimal scale.
/// assert_eq!(
///     usdc.normalize(Amount::new(1_000_000)).expect("fits"),
///     Amount::new(1_000_000_000_000_000_000),
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Decimals(u8);

impl Decimals {
    /// The common 18-decimal scale used for share accounting.
    pub const COMMON: Self = Self(COMMON_SCALE);

    /// Creates a `Decimals` value after validating the range.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfiguration`] if `value` exceeds 18.
    pub const fn new(value: u8) -> Result<Self> {
        if value > MAX_DECIMALS {
            return Err(EngineError::InvalidConfiguration("decimals must be 0..=18"));
        }
        Ok(Self(value))
    }

    /// Returns the raw decimal count.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Scales `amount` from this asset's native unit to the common
    /// 18-decimal scale.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Overflow`] if the scaled value does not fit
    /// in 128 bits.
    pub fn normalize(&self, amount: Amount) -> Result<Amount> {
        let factor = 10u128.pow(u32::from(COMMON_SCALE - self.0));
        amount
            .checked_mul(&Amount::new(factor))
            .ok_or(EngineError::Overflow("normalization exceeds 128 bits"))
    }
}
