//! Convenience re-exports for common types and traits.
//!
//! A single import brings the whole working set into scope:
//!
//! ```rust
//! use basin_amm::prelude::*;
//! ```

pub use crate::batch::SwapStep;
pub use crate::config::PoolConfig;
pub use crate::curve::{ConstantProductCurve, PricingStrategy};
pub use crate::domain::{
    Address, Amount, BasisPoints, Decimals, Rounding, Shares, Timestamp,
};
pub use crate::error::{EngineError, Result};
pub use crate::exchange::Exchange;
pub use crate::ledger::{FungibleLedger, TokenLedger};
pub use crate::permit::{
    Permit, PermitAuthorizer, PermitSignature, SigningDomain,
};
pub use crate::pool::Pool;
