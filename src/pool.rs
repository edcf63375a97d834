//! The two-asset liquidity pool.
//!
//! A pool owns two reserve counters, its claim-token ledger, and an
//! injected [`PricingStrategy`]. Reserves change only through
//! [`deposit`](Pool::deposit), [`withdraw`](Pool::withdraw), and
//! [`swap`](Pool::swap); assets themselves live in the asset ledgers,
//! where the pool's address holds exactly the reserves it mirrors.
//!
//! # State machine
//!
//! A pool is either *empty* (`total supply == 0`, both reserves zero) or
//! *funded* (`total supply > 0`, both reserves positive). The first
//! deposit is the only empty→funded transition and a full-supply
//! withdrawal the only way back.
//!
//! # Ordering contract
//!
//! Every operation orders its external ledger calls against its local
//! mutations so that a collaborator called mid-operation can only observe
//! consistent state:
//!
//! - deposit pulls both assets before crediting a single share;
//! - withdraw burns shares and decrements reserves before paying out;
//! - swap prices against pre-pull reserves, pulls, updates reserves, and
//!   only then pays out.

use core::cmp;

use crate::config::PoolConfig;
use crate::curve::PricingStrategy;
use crate::domain::{Address, Amount, BasisPoints, Decimals, Rounding, Shares};
use crate::error::{EngineError, Result};
use crate::ledger::{FungibleLedger, TokenLedger};
use crate::math;

/// A two-asset pool pricing swaps through an injected strategy `C`.
#[derive(Debug, Clone, PartialEq)]
pub struct Pool<C> {
    address: Address,
    asset_a: Address,
    asset_b: Address,
    decimals_a: Decimals,
    decimals_b: Decimals,
    fee: BasisPoints,
    reserve_a: Amount,
    reserve_b: Amount,
    curve: C,
    share_ledger: TokenLedger,
}

impl<C: PricingStrategy> Pool<C> {
    /// Creates an empty pool from a validated configuration.
    ///
    /// `share_ledger` becomes the pool's exclusively-owned claim token and
    /// must start with zero supply.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfiguration`] if the config is
    /// invalid or the share ledger is not empty.
    pub fn new(
        address: Address,
        config: &PoolConfig,
        decimals_a: Decimals,
        decimals_b: Decimals,
        share_ledger: TokenLedger,
        curve: C,
    ) -> Result<Self> {
        config.validate()?;
        if !share_ledger.total_supply().is_zero() {
            return Err(EngineError::InvalidConfiguration(
                "share ledger must start empty",
            ));
        }
        Ok(Self {
            address,
            asset_a: config.asset_a(),
            asset_b: config.asset_b(),
            decimals_a,
            decimals_b,
            fee: config.fee(),
            reserve_a: Amount::ZERO,
            reserve_b: Amount::ZERO,
            curve,
            share_ledger,
        })
    }

    /// Returns the pool's address.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
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

    /// Returns the current reserve of asset A.
    #[must_use]
    pub const fn reserve_a(&self) -> Amount {
        self.reserve_a
    }

    /// Returns the current reserve of asset B.
    #[must_use]
    pub const fn reserve_b(&self) -> Amount {
        self.reserve_b
    }

    /// Returns a read-only view of the claim-token ledger.
    #[must_use]
    pub const fn share_ledger(&self) -> &TokenLedger {
        &self.share_ledger
    }

    /// Returns the outstanding share supply.
    #[must_use]
    pub fn total_shares(&self) -> Shares {
        Shares::new(self.share_ledger.total_supply().get())
    }

    /// Returns `true` if the pool holds nothing and no shares exist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.share_ledger.total_supply().is_zero()
    }

    /// Deposits `amount_a` of asset A and `amount_b` of asset B, minting
    /// claim shares to `caller`.
    ///
    /// The first deposit mints the geometric mean of the normalized
    /// amounts, fixing the opening share price. Later deposits mint by the
    /// smaller of the two reserve ratios; the amount on the other side is
    /// still pulled in full, so over-ratio excess accrues to existing
    /// holders.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidAmount`] if either amount is zero, or the
    ///   deposit is too small to mint a single share.
    /// - [`EngineError::InsufficientAllowance`] /
    ///   [`EngineError::InsufficientBalance`] if either side cannot be
    ///   pulled.
    pub fn deposit<L: FungibleLedger>(
        &mut self,
        ledger_a: &mut L,
        ledger_b: &mut L,
        caller: Address,
        amount_a: Amount,
        amount_b: Amount,
    ) -> Result<Shares> {
        if amount_a.is_zero() || amount_b.is_zero() {
            return Err(EngineError::InvalidAmount("deposit requires both assets"));
        }
        // Validate both pulls up front: the second must not be able to
        // fail once the first has landed.
        Self::ensure_pullable(ledger_a, caller, self.address, amount_a)?;
        Self::ensure_pullable(ledger_b, caller, self.address, amount_b)?;

        let minted = self.shares_for_deposit(amount_a, amount_b)?;
        let reserve_a = self
            .reserve_a
            .checked_add(&amount_a)
            .ok_or(EngineError::Overflow("reserve overflow"))?;
        let reserve_b = self
            .reserve_b
            .checked_add(&amount_b)
            .ok_or(EngineError::Overflow("reserve overflow"))?;
        if self
            .share_ledger
            .total_supply()
            .checked_add(&minted.as_amount())
            .is_none()
        {
            return Err(EngineError::Overflow("share supply overflow"));
        }

        // Pull before credit: shares are minted only for assets received.
        ledger_a.transfer_from(self.address, caller, self.address, amount_a)?;
        ledger_b.transfer_from(self.address, caller, self.address, amount_b)?;
        self.reserve_a = reserve_a;
        self.reserve_b = reserve_b;
        self.share_ledger.mint(caller, minted.as_amount())?;
        Ok(minted)
    }

    /// Burns `shares` of the caller's claim tokens and pays out the
    /// proportional part of both reserves, rounded down.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidAmount`] if `shares` is zero.
    /// - [`EngineError::InsufficientBalance`] if the caller holds fewer
    ///   shares.
    pub fn withdraw<L: FungibleLedger>(
        &mut self,
        ledger_a: &mut L,
        ledger_b: &mut L,
        caller: Address,
        shares: Shares,
    ) -> Result<(Amount, Amount)> {
        if shares.is_zero() {
            return Err(EngineError::InvalidAmount(
                "withdrawal requires a positive share count",
            ));
        }
        if self.share_ledger.balance_of(caller) < shares.as_amount() {
            return Err(EngineError::InsufficientBalance);
        }
        let supply = self.share_ledger.total_supply();
        let out_a = math::mul_div(self.reserve_a, shares.as_amount(), supply, Rounding::Down)?;
        let out_b = math::mul_div(self.reserve_b, shares.as_amount(), supply, Rounding::Down)?;

        // Burn and decrement before paying out; a collaborator called
        // during the payout sees shares and reserves already reduced.
        self.share_ledger.burn(caller, shares.as_amount())?;
        self.reserve_a = self
            .reserve_a
            .checked_sub(&out_a)
            .ok_or(EngineError::Overflow("reserve underflow"))?;
        self.reserve_b = self
            .reserve_b
            .checked_sub(&out_b)
            .ok_or(EngineError::Overflow("reserve underflow"))?;
        ledger_a.transfer(self.address, caller, out_a)?;
        ledger_b.transfer(self.address, caller, out_b)?;
        Ok((out_a, out_b))
    }

    /// Swaps `amount_in` of `asset_in` for the pool's other asset at the
    /// strategy's price, net of the fee, and returns the amount paid out.
    ///
    /// The full input (fee included) is pulled from the caller and added
    /// to the input reserve; the output is priced against the pre-pull
    /// reserves from the fee-reduced input.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidAsset`] if `asset_in` is not pooled here.
    /// - [`EngineError::InvalidAmount`] if `amount_in` (or its fee-reduced
    ///   remainder) is zero.
    /// - [`EngineError::InvalidReserves`] if the pool is empty.
    /// - [`EngineError::SlippageOrLiquidity`] if the priced output would
    ///   consume the entire output reserve.
    /// - [`EngineError::InsufficientAllowance`] /
    ///   [`EngineError::InsufficientBalance`] if the pull fails.
    pub fn swap<L: FungibleLedger>(
        &mut self,
        ledger_a: &mut L,
        ledger_b: &mut L,
        caller: Address,
        asset_in: Address,
        amount_in: Amount,
    ) -> Result<Amount> {
        if amount_in.is_zero() {
            return Err(EngineError::InvalidAmount("swap amount must be positive"));
        }
        let a_to_b = if asset_in == self.asset_a {
            true
        } else if asset_in == self.asset_b {
            false
        } else {
            return Err(EngineError::InvalidAsset("asset is not part of this pool"));
        };
        let (reserve_in, reserve_out) = if a_to_b {
            (self.reserve_a, self.reserve_b)
        } else {
            (self.reserve_b, self.reserve_a)
        };

        let (net_in, _fee) = self.fee.deduct_from(amount_in)?;
        let amount_out = self.curve.compute_output(reserve_in, reserve_out, net_in)?;
        if amount_out >= reserve_out {
            // A swap may never empty one side while shares are outstanding.
            return Err(EngineError::SlippageOrLiquidity);
        }
        let new_reserve_in = reserve_in
            .checked_add(&amount_in)
            .ok_or(EngineError::Overflow("reserve overflow"))?;
        let new_reserve_out = reserve_out
            .checked_sub(&amount_out)
            .ok_or(EngineError::Overflow("reserve underflow"))?;

        let (ledger_in, ledger_out) = if a_to_b {
            (ledger_a, ledger_b)
        } else {
            (ledger_b, ledger_a)
        };
        // The pull is the only fallible call left; reserves are mutated
        // before the payout so the pool is never observably over-credited.
        ledger_in.transfer_from(self.address, caller, self.address, amount_in)?;
        if a_to_b {
            self.reserve_a = new_reserve_in;
            self.reserve_b = new_reserve_out;
        } else {
            self.reserve_b = new_reserve_in;
            self.reserve_a = new_reserve_out;
        }
        ledger_out.transfer(self.address, caller, amount_out)?;
        Ok(amount_out)
    }

    fn shares_for_deposit(&self, amount_a: Amount, amount_b: Amount) -> Result<Shares> {
        let supply = self.share_ledger.total_supply();
        let norm_a = self.decimals_a.normalize(amount_a)?;
        let norm_b = self.decimals_b.normalize(amount_b)?;
        let minted = if supply.is_zero() {
            // Geometric mean of the normalized amounts fixes the opening
            // share price.
            math::sqrt_product(norm_a, norm_b)
        } else {
            let norm_reserve_a = self.decimals_a.normalize(self.reserve_a)?;
            let norm_reserve_b = self.decimals_b.normalize(self.reserve_b)?;
            let by_a = math::mul_div(norm_a, supply, norm_reserve_a, Rounding::Down)?;
            let by_b = math::mul_div(norm_b, supply, norm_reserve_b, Rounding::Down)?;
            // The limiting ratio prices the deposit; the other side's
            // excess is a donation to existing holders.
            cmp::min(by_a, by_b)
        };
        if minted.is_zero() {
            return Err(EngineError::InvalidAmount(
                "deposit too small to mint shares",
            ));
        }
        Ok(Shares::new(minted.get()))
    }

    fn ensure_pullable<L: FungibleLedger>(
        ledger: &L,
        owner: Address,
        spender: Address,
        amount: Amount,
    ) -> Result<()> {
        if ledger.allowance(owner, spender) < amount {
            return Err(EngineError::InsufficientAllowance);
        }
        if ledger.balance_of(owner) < amount {
            return Err(EngineError::InsufficientBalance);
        }
        Ok(())
    }
}
