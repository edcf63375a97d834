//! Pricing strategies.
//!
//! A pool delegates swap pricing to an injected [`PricingStrategy`], so a
//! future curve shape (stable-swap, weighted) is a new strategy type, not
//! a change to [`Pool`](crate::pool::Pool). The strategy sees only
//! reserves and the fee-reduced input; fee deduction and reserve mutation
//! stay in the pool.
//!
//! # Pricing contract
//!
//! `compute_output` must be pure: same inputs, same output, no side
//! effects. Rounding must favor the pool — a strategy that rounds output
//! up can drain reserves one unit at a time.

use crate::domain::{Amount, Rounding};
use crate::error::{EngineError, Result};
use crate::math;

/// Computes the output amount of a swap from the pool reserves and the
/// fee-reduced input amount.
pub trait PricingStrategy {
    /// Returns the amount of the output asset a swap of
    /// `amount_in_after_fee` receives against the given reserves.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidReserves`] if either reserve is zero — the
    ///   price is undefined for an empty pool.
    /// - [`EngineError::InvalidAmount`] if `amount_in_after_fee` is zero.
    fn compute_output(
        &self,
        reserve_in: Amount,
        reserve_out: Amount,
        amount_in_after_fee: Amount,
    ) -> Result<Amount>;
}

/// The constant-product curve, `reserve_in × reserve_out = k`.
///
/// Output follows `out = reserve_out − ⌊reserve_in·reserve_out /
/// (reserve_in + net)⌋` with floor division throughout; the floor bias
/// keeps the invariant product from decreasing once the fee is retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConstantProductCurve;

impl PricingStrategy for ConstantProductCurve {
    fn compute_output(
        &self,
        reserve_in: Amount,
        reserve_out: Amount,
        amount_in_after_fee: Amount,
    ) -> Result<Amount> {
        if reserve_in.is_zero() || reserve_out.is_zero() {
            return Err(EngineError::InvalidReserves);
        }
        if amount_in_after_fee.is_zero() {
            return Err(EngineError::InvalidAmount("swap input after fee is zero"));
        }

        let denominator = reserve_in
            .checked_add(&amount_in_after_fee)
            .ok_or(EngineError::Overflow("swap denominator overflow"))?;
        // What the input reserve's counterpart must still hold to keep k.
        let kept = math::mul_div(reserve_in, reserve_out, denominator, Rounding::Down)?;
        // kept < reserve_out because denominator > reserve_in.
        reserve_out
            .checked_sub(&kept)
            .ok_or(EngineError::Overflow("swap output underflow"))
    }
}
