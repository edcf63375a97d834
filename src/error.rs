//! Unified error type for the engine.
//!
//! Every fallible operation in the crate returns [`EngineError`]. No error
//! is silently recovered: a failure aborts the enclosing operation and is
//! surfaced to the caller. Batch execution wraps the failing step's cause
//! in [`EngineError::BatchStepFailed`] together with the step index.

use thiserror::Error;

/// Errors produced by pools, ledgers, permit verification, and batch
/// execution.
///
/// Variants that can arise in several places carry a `&'static str` with
/// call-site context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Zero or otherwise malformed input amount.
    #[error("invalid amount: {0}")]
    InvalidAmount(&'static str),

    /// The referenced asset is not usable in this context.
    #[error("invalid asset: {0}")]
    InvalidAsset(&'static str),

    /// A construction-time parameter is out of range or inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    /// Pricing was attempted against a pool with an empty reserve.
    #[error("pricing attempted against empty reserves")]
    InvalidReserves,

    /// The ledger reported a funding shortfall for the paying account.
    #[error("insufficient balance")]
    InsufficientBalance,

    /// The ledger reported a missing or too-small spending allowance.
    #[error("insufficient allowance")]
    InsufficientAllowance,

    /// The computed swap output would exceed the available reserve.
    ///
    /// Unreachable under the constant-product formula for correct inputs,
    /// but checked before any payout regardless.
    #[error("computed output exceeds available reserve")]
    SlippageOrLiquidity,

    /// The permit deadline has passed.
    #[error("permit deadline has passed")]
    Expired,

    /// Signature recovery failed or the recovered signer does not match
    /// the claimed owner.
    #[error("signature recovery failed or signer mismatch")]
    InvalidSignature,

    /// The permit's nonce has already been consumed.
    #[error("permit nonce already consumed")]
    NonceReuse,

    /// No asset ledger is registered at the given address.
    #[error("unknown asset ledger")]
    UnknownAsset,

    /// No pool is registered at the given address.
    #[error("unknown pool")]
    UnknownPool,

    /// Checked arithmetic overflowed or underflowed.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),

    /// A divisor was zero.
    #[error("division by zero")]
    DivisionByZero,

    /// A batch step failed; the whole batch was rolled back.
    #[error("batch step {index} failed: {cause}")]
    BatchStepFailed {
        /// Zero-based index of the failing step.
        index: usize,
        /// The underlying failure.
        cause: Box<EngineError>,
    },
}

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, EngineError>;
