//! Fundamental domain value types used throughout the engine.
//!
//! Accounts, assets and pools are identified by [`Address`]; quantities are
//! [`Amount`] (asset units) and [`Shares`] (claim-token units); [`Decimals`]
//! carries an asset's scale and normalizes it to the common one; fees are
//! [`BasisPoints`]; time is the environment-supplied [`Timestamp`]. All
//! types are newtypes with validated constructors and checked arithmetic.

mod address;
mod amount;
mod basis_points;
mod decimals;
mod rounding;
mod shares;
mod timestamp;

pub use address::Address;
pub use amount::Amount;
pub use basis_points::BasisPoints;
pub use decimals::Decimals;
pub use rounding::Rounding;
pub use shares::Shares;
pub use timestamp::Timestamp;
