//! # Basin AMM
//!
//! Accounting and execution engine for a two-asset automated market maker
//! with permit-authorized atomic batch swaps.
//!
//! The engine lets any account deposit a pair of fungible assets into a
//! shared pool, receive proportional claim tokens, withdraw them for a
//! proportional cut of the reserves, and swap one pooled asset for the
//! other at a price set by a pluggable curve, net of a fixed fee. A batch
//! orchestrator runs an ordered sequence of swaps across independent
//! pools as one all-or-nothing unit, each leg authorized by a pre-signed,
//! time-bounded, single-use permit instead of a separate approval call.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  execute_batch / deposit / withdraw / swap
//! │   Exchange   │  owns every TokenLedger and Pool, the clock,
//! └──────┬───────┘  and the chain id permits are bound to
//!        │
//! ┌──────┴───────┐  reserves + claim-token ledger;
//! │     Pool     │  prices through an injected PricingStrategy
//! └──────┬───────┘
//! ┌──────┴───────┐  balances, allowances, nonces,
//! │ TokenLedger  │  and the atomic permit primitive
//! └──────────────┘
//! ```
//!
//! Execution is single-writer and deterministic: the embedder owns the
//! [`Exchange`](exchange::Exchange), advances its clock explicitly, and
//! every operation either completes fully or leaves no trace. Batches
//! stage their mutations on a clone of the context and commit by
//! replacement.
//!
//! # Quick start
//!
//! ```rust
//! use basin_amm::config::PoolConfig;
//! use basin_amm::curve::ConstantProductCurve;
//! use basin_amm::domain::{Address, Amount, Decimals};
//! use basin_amm::exchange::Exchange;
//!
//! let weth = Address::from_bytes([0x11; 20]);
//! let usdc = Address::from_bytes([0x12; 20]);
//! let pool = Address::from_bytes([0xF0; 20]);
//! let alice = Address::from_bytes([0xA1; 20]);
//!
//! let mut exchange = Exchange::new(31_337);
//! exchange.register_asset(weth, "Wrapped Ether", "WETH", Decimals::new(18)?)?;
//! exchange.register_asset(usdc, "USD Coin", "USDC", Decimals::new(18)?)?;
//! exchange.create_pool(pool, PoolConfig::standard(weth, usdc)?, ConstantProductCurve)?;
//!
//! exchange.mint(weth, alice, Amount::new(10_000_000))?;
//! exchange.mint(usdc, alice, Amount::new(30_000_000))?;
//! exchange.approve(weth, alice, pool, Amount::new(10_000_000))?;
//! exchange.approve(usdc, alice, pool, Amount::new(30_000_000))?;
//!
//! let minted = exchange.deposit(alice, pool, Amount::new(10_000_000), Amount::new(30_000_000))?;
//! assert!(!minted.is_zero());
//! # Ok::<(), basin_amm::error::EngineError>(())
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`]   | Newtype value types: [`Amount`](domain::Amount), [`Address`](domain::Address), [`Shares`](domain::Shares), … |
//! | [`curve`]    | [`PricingStrategy`](curve::PricingStrategy) and the constant-product curve |
//! | [`ledger`]   | [`FungibleLedger`](ledger::FungibleLedger) and the in-memory [`TokenLedger`](ledger::TokenLedger) |
//! | [`permit`]   | Typed-data digests, signature recovery, [`PermitAuthorizer`](permit::PermitAuthorizer) |
//! | [`config`]   | [`PoolConfig`](config::PoolConfig) validated pool blueprint |
//! | [`pool`]     | [`Pool`](pool::Pool): deposit, withdraw, swap |
//! | [`exchange`] | [`Exchange`](exchange::Exchange) transactional context |
//! | [`batch`]    | [`SwapStep`](batch::SwapStep) and atomic batch execution |
//! | [`math`]     | 256-bit mul-div and wide integer square root |
//! | [`error`]    | [`EngineError`](error::EngineError) unified error enum |
//! | [`prelude`]  | Convenience re-exports |

pub mod batch;
pub mod config;
pub mod curve;
pub mod domain;
pub mod error;
pub mod exchange;
pub mod ledger;
pub mod math;
pub mod permit;
pub mod pool;
pub mod prelude;

#[cfg(test)]
mod proptest_properties;
