//! Fungible-asset ledgers.
//!
//! [`FungibleLedger`] is the engine's view of an asset: balances,
//! transfers, allowances, mint/burn, and the permit primitive. Pools and
//! the batch orchestrator only ever talk to this trait, which is also the
//! seam tests use to inject misbehaving collaborators.
//!
//! [`TokenLedger`] is the deterministic in-memory implementation. A pool's
//! claim token is a `TokenLedger` too, owned exclusively by its pool.
//!
//! # Transfer atomicity
//!
//! Every mutating method validates all of its preconditions before
//! touching any state, so a failed call leaves the ledger exactly as it
//! was. `permit` goes further: signature verification, the nonce bump, and
//! the allowance write happen inside one call — a verified permit is never
//! observable with its nonce still unconsumed.

use std::collections::BTreeMap;

use crate::domain::{Address, Amount, Decimals, Timestamp};
use crate::error::{EngineError, Result};
use crate::permit::{recover_signer, Permit, PermitSignature, SigningDomain};

/// The asset-ledger interface the engine consumes.
pub trait FungibleLedger {
    /// Returns the balance of `account`.
    fn balance_of(&self, account: Address) -> Amount;

    /// Returns the total minted supply.
    fn total_supply(&self) -> Amount;

    /// Moves `amount` from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InsufficientBalance`] if `from` cannot cover
    /// the amount.
    fn transfer(&mut self, from: Address, to: Address, amount: Amount) -> Result<()>;

    /// Moves `amount` from `owner` to `to`, spending `spender`'s
    /// allowance.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InsufficientAllowance`] if the `(owner, spender)`
    ///   allowance cannot cover the amount.
    /// - [`EngineError::InsufficientBalance`] if `owner` cannot cover it.
    fn transfer_from(
        &mut self,
        spender: Address,
        owner: Address,
        to: Address,
        amount: Amount,
    ) -> Result<()>;

    /// Sets the `(owner, spender)` allowance to exactly `amount`.
    fn approve(&mut self, owner: Address, spender: Address, amount: Amount);

    /// Returns the `(owner, spender)` allowance.
    fn allowance(&self, owner: Address, spender: Address) -> Amount;

    /// Creates `amount` new units and credits them to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Overflow`] if the supply would exceed 128
    /// bits.
    fn mint(&mut self, to: Address, amount: Amount) -> Result<()>;

    /// Destroys `amount` units held by `from`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InsufficientBalance`] if `from` cannot cover
    /// the amount.
    fn burn(&mut self, from: Address, amount: Amount) -> Result<()>;

    /// Verifies a signed permit and, in the same step, bumps the owner's
    /// nonce and records the allowance.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Expired`] if `now` is past the permit deadline.
    /// - [`EngineError::NonceReuse`] if the permit's nonce is behind the
    ///   owner's counter.
    /// - [`EngineError::InvalidSignature`] if the nonce is ahead of the
    ///   counter, recovery fails, or the signer is not the owner.
    fn permit(&mut self, permit: &Permit, signature: &PermitSignature, now: Timestamp)
        -> Result<()>;

    /// Returns the owner's current permit nonce.
    fn nonce_of(&self, owner: Address) -> u64;

    /// Returns the ledger's typed-data signing domain.
    fn signing_domain(&self) -> &SigningDomain;
}

/// Deterministic in-memory fungible-asset ledger.
///
/// Balances, allowances, and nonces live in ordered maps so iteration is
/// reproducible under the single-writer execution model.
///
/// # Examples
///
/// ```
/// use basin_amm::domain::{Address, Amount, Decimals};
/// use basin_amm::ledger::{FungibleLedger, TokenLedger};
///
/// let alice = Address::from_bytes([0xA1; 20]);
/// let bob = Address::from_bytes([0xB0; 20]);
/// let mut weth = TokenLedger::new(
///     Address::from_bytes([0x11; 20]),
///     "Wrapped Ether",
///     "WETH",
///     Decimals::new(18).expect("valid"),
///     31_337,
/// );
///
/// weth.mint(alice, Amount::new(1_000)).expect("supply fits");
/// weth.transfer(alice, bob, Amount::new(250)).expect("funded");
/// assert_eq!(weth.balance_of(bob), Amount::new(250));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenLedger {
    address: Address,
    name: String,
    symbol: String,
    decimals: Decimals,
    domain: SigningDomain,
    total_supply: Amount,
    balances: BTreeMap<Address, Amount>,
    allowances: BTreeMap<(Address, Address), Amount>,
    nonces: BTreeMap<Address, u64>,
}

impl TokenLedger {
    /// Creates an empty ledger with the given identity.
    ///
    /// The signing domain is derived from `name`, the crate-wide
    /// [`DOMAIN_VERSION`](crate::permit::DOMAIN_VERSION), `chain_id`, and
    /// `address`.
    #[must_use]
    pub fn new(
        address: Address,
        name: &str,
        symbol: &str,
        decimals: Decimals,
        chain_id: u64,
    ) -> Self {
        Self {
            address,
            name: name.to_owned(),
            symbol: symbol.to_owned(),
            decimals,
            domain: SigningDomain::new(name, chain_id, address),
            total_supply: Amount::ZERO,
            balances: BTreeMap::new(),
            allowances: BTreeMap::new(),
            nonces: BTreeMap::new(),
        }
    }

    /// Returns the ledger's address.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Returns the asset name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the asset symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Returns the asset's decimal scale.
    #[must_use]
    pub const fn decimals(&self) -> Decimals {
        self.decimals
    }

    fn write_balance(&mut self, account: Address, balance: Amount) {
        if balance.is_zero() {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, balance);
        }
    }
}

impl FungibleLedger for TokenLedger {
    fn balance_of(&self, account: Address) -> Amount {
        self.balances.get(&account).copied().unwrap_or(Amount::ZERO)
    }

    fn total_supply(&self) -> Amount {
        self.total_supply
    }

    fn transfer(&mut self, from: Address, to: Address, amount: Amount) -> Result<()> {
        let debited = self
            .balance_of(from)
            .checked_sub(&amount)
            .ok_or(EngineError::InsufficientBalance)?;
        if from == to {
            return Ok(());
        }
        // Cannot overflow: the receiving balance is bounded by supply.
        let credited = self
            .balance_of(to)
            .checked_add(&amount)
            .ok_or(EngineError::Overflow("balance overflow"))?;
        self.write_balance(from, debited);
        self.write_balance(to, credited);
        Ok(())
    }

    fn transfer_from(
        &mut self,
        spender: Address,
        owner: Address,
        to: Address,
        amount: Amount,
    ) -> Result<()> {
        let remaining = self
            .allowance(owner, spender)
            .checked_sub(&amount)
            .ok_or(EngineError::InsufficientAllowance)?;
        self.transfer(owner, to, amount)?;
        self.approve(owner, spender, remaining);
        Ok(())
    }

    fn approve(&mut self, owner: Address, spender: Address, amount: Amount) {
        if amount.is_zero() {
            self.allowances.remove(&(owner, spender));
        } else {
            self.allowances.insert((owner, spender), amount);
        }
    }

    fn allowance(&self, owner: Address, spender: Address) -> Amount {
        self.allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    fn mint(&mut self, to: Address, amount: Amount) -> Result<()> {
        let supply = self
            .total_supply
            .checked_add(&amount)
            .ok_or(EngineError::Overflow("total supply overflow"))?;
        let credited = self
            .balance_of(to)
            .checked_add(&amount)
            .ok_or(EngineError::Overflow("balance overflow"))?;
        self.total_supply = supply;
        self.write_balance(to, credited);
        Ok(())
    }

    fn burn(&mut self, from: Address, amount: Amount) -> Result<()> {
        let debited = self
            .balance_of(from)
            .checked_sub(&amount)
            .ok_or(EngineError::InsufficientBalance)?;
        // Supply is always >= any single balance.
        let supply = self
            .total_supply
            .checked_sub(&amount)
            .ok_or(EngineError::Overflow("supply underflow"))?;
        self.total_supply = supply;
        self.write_balance(from, debited);
        Ok(())
    }

    fn permit(
        &mut self,
        permit: &Permit,
        signature: &PermitSignature,
        now: Timestamp,
    ) -> Result<()> {
        if now > permit.deadline {
            return Err(EngineError::Expired);
        }
        let current = self.nonce_of(permit.owner);
        if permit.nonce < current {
            return Err(EngineError::NonceReuse);
        }
        if permit.nonce > current {
            return Err(EngineError::InvalidSignature);
        }
        let digest = self.domain.digest(permit);
        let signer = recover_signer(&digest, signature)?;
        if signer != permit.owner {
            return Err(EngineError::InvalidSignature);
        }
        // Consume the nonce and grant the allowance in the same step.
        self.nonces.insert(permit.owner, current + 1);
        self.approve(permit.owner, permit.spender, permit.value);
        Ok(())
    }

    fn nonce_of(&self, owner: Address) -> u64 {
        self.nonces.get(&owner).copied().unwrap_or(0)
    }

    fn signing_domain(&self) -> &SigningDomain {
        &self.domain
    }
}
