//! Atomic multi-pool batch swaps.
//!
//! A batch is an ordered list of [`SwapStep`]s, each naming a pool, an
//! input asset and amount, and carrying a permit signature that lets the
//! pool pull the input from the caller. Steps run in the given order —
//! later steps may rely on balances produced by earlier ones — and the
//! batch commits only if every step succeeds.
//!
//! All-or-nothing is implemented by staging: every step mutates a clone
//! of the [`Exchange`], and the clone replaces the live context only
//! after the last step. A failing step discards the staged state, so no
//! reserve, balance, allowance, or nonce change from any earlier step
//! survives.

use tracing::debug;

use crate::curve::PricingStrategy;
use crate::domain::{Address, Amount, Timestamp};
use crate::error::{EngineError, Result};
use crate::exchange::Exchange;
use crate::permit::{PermitAuthorizer, PermitSignature};

/// One swap leg of a batch.
///
/// The signature authorizes `pool` to pull `amount` of `asset` from the
/// batch caller, against the caller's current permit nonce on that asset.
/// There is no per-step minimum-output bound: a step executes at whatever
/// price the pool offers when it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapStep {
    /// The asset sold in this step.
    pub asset: Address,
    /// The pool the swap runs against.
    pub pool: Address,
    /// The input amount, fee included.
    pub amount: Amount,
    /// Permit deadline.
    pub deadline: Timestamp,
    /// Permit signature over `(caller, pool, amount, nonce, deadline)`.
    pub signature: PermitSignature,
}

impl<C: PricingStrategy + Clone> Exchange<C> {
    /// Executes `steps` in order as a single all-or-nothing unit on
    /// behalf of `caller`.
    ///
    /// Each step converts its permit into an allowance and swaps. An
    /// empty batch succeeds trivially.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::BatchStepFailed`] naming the first failing
    /// step and its cause; the context is left untouched.
    pub fn execute_batch(&mut self, caller: Address, steps: &[SwapStep]) -> Result<()> {
        let mut staged = self.clone();
        for (index, step) in steps.iter().enumerate() {
            if let Err(cause) = staged.apply_step(caller, step) {
                debug!(index, %cause, "batch aborted, staged state discarded");
                return Err(EngineError::BatchStepFailed {
                    index,
                    cause: Box::new(cause),
                });
            }
        }
        debug!(steps = steps.len(), %caller, "batch committed");
        *self = staged;
        Ok(())
    }

    fn apply_step(&mut self, caller: Address, step: &SwapStep) -> Result<Amount> {
        let now = self.now;
        let asset = self
            .assets
            .get_mut(&step.asset)
            .ok_or(EngineError::UnknownAsset)?;
        PermitAuthorizer::authorize(
            asset,
            caller,
            step.pool,
            step.amount,
            step.deadline,
            &step.signature,
            now,
        )?;
        self.swap(caller, step.pool, step.asset, step.amount)
    }
}
