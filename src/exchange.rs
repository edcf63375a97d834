//! The transactional execution context.
//!
//! [`Exchange`] owns every asset ledger and every pool, the chain id
//! permits are bound to, and the environment clock. It is the explicit
//! replacement for ambient chain state: operations name the context they
//! mutate, and cloning it snapshots the whole world — which is exactly how
//! [batch execution](crate::batch) stages and commits.
//!
//! Execution is single-writer and deterministic. The embedder advances
//! the clock; nothing here reads wall time or blocks.

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::PoolConfig;
use crate::curve::{ConstantProductCurve, PricingStrategy};
use crate::domain::{Address, Amount, Decimals, Shares, Timestamp};
use crate::error::{EngineError, Result};
use crate::ledger::{FungibleLedger, TokenLedger};
use crate::pool::Pool;

/// The context owning all ledgers and pools, generic over the pricing
/// strategy its pools use.
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange<C = ConstantProductCurve> {
    pub(crate) chain_id: u64,
    pub(crate) now: Timestamp,
    pub(crate) assets: BTreeMap<Address, TokenLedger>,
    pub(crate) pools: BTreeMap<Address, Pool<C>>,
}

impl Exchange<ConstantProductCurve> {
    /// Creates an empty context with constant-product pools.
    #[must_use]
    pub fn new(chain_id: u64) -> Self {
        Self::with_strategy(chain_id)
    }
}

impl<C: PricingStrategy> Exchange<C> {
    /// Creates an empty context whose pools price with strategy `C`.
    #[must_use]
    pub fn with_strategy(chain_id: u64) -> Self {
        Self {
            chain_id,
            now: Timestamp::ZERO,
            assets: BTreeMap::new(),
            pools: BTreeMap::new(),
        }
    }

    /// Returns the chain id signatures are bound to.
    #[must_use]
    pub const fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Returns the current environment time.
    #[must_use]
    pub const fn now(&self) -> Timestamp {
        self.now
    }

    /// Sets the environment time.
    pub fn set_time(&mut self, now: Timestamp) {
        self.now = now;
    }

    /// Moves the environment time forward by `seconds`.
    pub fn advance_time(&mut self, seconds: u64) {
        self.now = self.now.plus(seconds);
    }

    /// Registers a new asset ledger under `address`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfiguration`] if the address is
    /// already taken.
    pub fn register_asset(
        &mut self,
        address: Address,
        name: &str,
        symbol: &str,
        decimals: Decimals,
    ) -> Result<()> {
        if self.assets.contains_key(&address) || self.pools.contains_key(&address) {
            return Err(EngineError::InvalidConfiguration(
                "address is already registered",
            ));
        }
        let ledger = TokenLedger::new(address, name, symbol, decimals, self.chain_id);
        debug!(asset = %address, name, symbol, "asset registered");
        self.assets.insert(address, ledger);
        Ok(())
    }

    /// Creates a pool at `address` for a validated configuration.
    ///
    /// Both assets must already be registered. The pool's claim token is
    /// named after their symbols.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidConfiguration`] if the address is taken or
    ///   the config is invalid.
    /// - [`EngineError::UnknownAsset`] if either asset is unregistered.
    pub fn create_pool(&mut self, address: Address, config: PoolConfig, curve: C) -> Result<()> {
        if self.assets.contains_key(&address) || self.pools.contains_key(&address) {
            return Err(EngineError::InvalidConfiguration(
                "address is already registered",
            ));
        }
        config.validate()?;
        let asset_a = self
            .assets
            .get(&config.asset_a())
            .ok_or(EngineError::UnknownAsset)?;
        let asset_b = self
            .assets
            .get(&config.asset_b())
            .ok_or(EngineError::UnknownAsset)?;

        let share_name = format!(
            "{}/{} Liquidity Pool Token",
            asset_a.symbol(),
            asset_b.symbol()
        );
        let share_symbol = format!("{}/{}-LP", asset_a.symbol(), asset_b.symbol());
        let share_ledger = TokenLedger::new(
            address,
            &share_name,
            &share_symbol,
            Decimals::COMMON,
            self.chain_id,
        );
        let pool = Pool::new(
            address,
            &config,
            asset_a.decimals(),
            asset_b.decimals(),
            share_ledger,
            curve,
        )?;
        debug!(pool = %address, asset_a = %config.asset_a(), asset_b = %config.asset_b(), "pool created");
        self.pools.insert(address, pool);
        Ok(())
    }

    /// Returns the asset ledger at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownAsset`] if none is registered.
    pub fn asset(&self, address: Address) -> Result<&TokenLedger> {
        self.assets.get(&address).ok_or(EngineError::UnknownAsset)
    }

    /// Returns the pool at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownPool`] if none is registered.
    pub fn pool(&self, address: Address) -> Result<&Pool<C>> {
        self.pools.get(&address).ok_or(EngineError::UnknownPool)
    }

    /// Returns `account`'s balance of `asset`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownAsset`] if the asset is unregistered.
    pub fn balance_of(&self, asset: Address, account: Address) -> Result<Amount> {
        Ok(self.asset(asset)?.balance_of(account))
    }

    /// Mints `amount` of `asset` to `to`. Genesis funding.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownAsset`] or a ledger error.
    pub fn mint(&mut self, asset: Address, to: Address, amount: Amount) -> Result<()> {
        self.assets
            .get_mut(&asset)
            .ok_or(EngineError::UnknownAsset)?
            .mint(to, amount)
    }

    /// Sets `spender`'s allowance over `owner`'s holdings of `asset`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownAsset`] if the asset is unregistered.
    pub fn approve(
        &mut self,
        asset: Address,
        owner: Address,
        spender: Address,
        amount: Amount,
    ) -> Result<()> {
        self.assets
            .get_mut(&asset)
            .ok_or(EngineError::UnknownAsset)?
            .approve(owner, spender, amount);
        Ok(())
    }

    /// Deposits into the pool at `pool`, minting shares to `caller`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownPool`], [`EngineError::UnknownAsset`],
    /// or any [`Pool::deposit`] error.
    pub fn deposit(
        &mut self,
        caller: Address,
        pool: Address,
        amount_a: Amount,
        amount_b: Amount,
    ) -> Result<Shares> {
        let Self { assets, pools, .. } = self;
        let target = pools.get_mut(&pool).ok_or(EngineError::UnknownPool)?;
        let (ledger_a, ledger_b) = ledger_pair_mut(assets, target.asset_a(), target.asset_b())?;
        let minted = target.deposit(ledger_a, ledger_b, caller, amount_a, amount_b)?;
        debug!(%pool, %caller, %amount_a, %amount_b, %minted, "deposit");
        Ok(minted)
    }

    /// Withdraws `shares` from the pool at `pool` for `caller`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownPool`], [`EngineError::UnknownAsset`],
    /// or any [`Pool::withdraw`] error.
    pub fn withdraw(
        &mut self,
        caller: Address,
        pool: Address,
        shares: Shares,
    ) -> Result<(Amount, Amount)> {
        let Self { assets, pools, .. } = self;
        let target = pools.get_mut(&pool).ok_or(EngineError::UnknownPool)?;
        let (ledger_a, ledger_b) = ledger_pair_mut(assets, target.asset_a(), target.asset_b())?;
        let (out_a, out_b) = target.withdraw(ledger_a, ledger_b, caller, shares)?;
        debug!(%pool, %caller, %shares, %out_a, %out_b, "withdrawal");
        Ok((out_a, out_b))
    }

    /// Swaps `amount_in` of `asset_in` in the pool at `pool` for `caller`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownPool`], [`EngineError::UnknownAsset`],
    /// or any [`Pool::swap`] error.
    pub fn swap(
        &mut self,
        caller: Address,
        pool: Address,
        asset_in: Address,
        amount_in: Amount,
    ) -> Result<Amount> {
        let Self { assets, pools, .. } = self;
        let target = pools.get_mut(&pool).ok_or(EngineError::UnknownPool)?;
        let (ledger_a, ledger_b) = ledger_pair_mut(assets, target.asset_a(), target.asset_b())?;
        let amount_out = target.swap(ledger_a, ledger_b, caller, asset_in, amount_in)?;
        debug!(%pool, %caller, %asset_in, %amount_in, %amount_out, "swap");
        Ok(amount_out)
    }
}

/// Splits two distinct ledgers out of the asset map by address.
fn ledger_pair_mut(
    assets: &mut BTreeMap<Address, TokenLedger>,
    first: Address,
    second: Address,
) -> Result<(&mut TokenLedger, &mut TokenLedger)> {
    let mut found_first = None;
    let mut found_second = None;
    for (address, ledger) in assets.iter_mut() {
        if *address == first {
            found_first = Some(ledger);
        } else if *address == second {
            found_second = Some(ledger);
        }
    }
    match (found_first, found_second) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(EngineError::UnknownAsset),
    }
}
