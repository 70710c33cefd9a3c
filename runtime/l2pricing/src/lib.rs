//! Adaptive L2 gas pricing.
//!
//! [`PricingState`] tracks how far demand for each resource runs ahead of
//! its target (the backlog) and turns that backlog into an exponentially
//! growing base fee. Three models coexist and are selected by the ArbOS
//! version and the configured constraints, see [`GasModel`].
//!
//! Per block the caller reports usage with [`PricingState::grow_backlog`],
//! then calls [`PricingState::update_pricing_model`] with the seconds elapsed
//! and [`PricingState::commit_multi_gas_fees`] before pricing the next
//! block's transactions.
pub use crate::config::{PricingConfig, EXP_APPROXIMATION_ACCURACY, MAX_PRICING_EXPONENT_BIPS};
pub use crate::constraint::{GasConstraint, GasConstraintParams};
pub use crate::errors::PricingError;
pub use crate::fees::MultiGasFees;
pub use crate::model::{BacklogOperation, GasModel};
pub use crate::multi_constraint::{MultiGasConstraint, MultiGasConstraintParams};
pub use crate::state::PricingState;
pub use crate::vector::{ConstraintVector, StorageBackedRecord};

mod config;
mod constraint;
mod errors;
mod fees;
mod legacy;
mod migration;
mod model;
mod multi_constraint;
mod state;
pub mod test_utils;
mod vector;

#[cfg(test)]
mod tests;
