//! Pool configuration.

use crate::domain::{Address, BasisPoints};
use crate::error::{EngineError, Result};

/// The immutable blueprint of a pool: its asset pair and swap fee.
///
/// Both are fixed at construction and never change for the lifetime of
/// the pool.
///
/// # Validation
///
/// - The two assets must be distinct.
/// - The fee must be a proper fraction (below 100%).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    asset_a: Address,
    asset_b: Address,
    fee: BasisPoints,
}

impl PoolConfig {
    /// The standard 0.3% swap fee.
    pub const STANDARD_FEE: BasisPoints = BasisPoints::new(30);

    /// Creates a validated `PoolConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfiguration`] if the assets are
    /// equal or the fee is 100% or more.
    pub fn new(asset_a: Address, asset_b: Address, fee: BasisPoints) -> Result<Self> {
        let config = Self {
            asset_a,
            asset_b,
            fee,
        };
        config.validate()?;
        Ok(config)
    }

    /// Creates a config with the [standard fee](Self::STANDARD_FEE).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfiguration`] if the assets are
    /// equal.
    pub fn standard(asset_a: Address, asset_b: Address) -> Result<Self> {
        Self::new(asset_a, asset_b, Self::STANDARD_FEE)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfiguration`] on any violation.
    pub fn validate(&self) -> Result<()> {
        if self.asset_a == self.asset_b {
            return Err(EngineError::InvalidConfiguration(
                "pool requires two distinct assets",
            ));
        }
        if !self.fee.is_fraction() {
            return Err(EngineError::InvalidConfiguration(
                "fee must be below 100%",
            ));
        }
        Ok(())
    }

    /// Returns the first pooled asset.
    #[must_use]
    pub const fn asset_a(&self) -> Address {
        self.asset_a
    }

    /// Returns the second pooled asset.
    #[must_use]
    pub const fn asset_b(&self) -> Address {
        self.asset_b
    }

    /// Returns the swap fee.
    #[must_use]
    pub const fn fee(&self) -> BasisPoints {
        self.fee
    }
}
