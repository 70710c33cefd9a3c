use arbos_primitives_core::arith::Bips;
use arbos_primitives_core::types::{Gas, GWEI};

/// Upper bound applied to every pricing exponent before it is exponentiated,
/// i.e. the base fee never exceeds `e^8.5` times the minimum base fee.
pub const MAX_PRICING_EXPONENT_BIPS: Bips = Bips(85_000);

/// Number of terms of the `e^x` approximation used for base fees.
pub const EXP_APPROXIMATION_ACCURACY: u64 = 4;

/// Pricing parameters written at genesis. Everything here can later be
/// changed through the setters of [`crate::PricingState`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Gas per second the legacy model targets.
    pub speed_limit_per_second: Gas,
    pub per_block_gas_limit: Gas,
    pub per_tx_gas_limit: Gas,
    /// Floor of the base fee, in wei.
    pub min_base_fee_wei: u64,
    /// Base fee at genesis, in wei.
    pub initial_base_fee_wei: u64,
    /// Seconds of backlog above tolerance that raise the legacy base fee by a
    /// factor of e.
    pub pricing_inertia: u64,
    /// Seconds of backlog tolerated before the legacy base fee starts rising.
    pub backlog_tolerance: u64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        let min_base_fee_wei = GWEI / 10;
        Self {
            speed_limit_per_second: 7_000_000,
            per_block_gas_limit: 32_000_000,
            per_tx_gas_limit: 32_000_000,
            min_base_fee_wei,
            initial_base_fee_wei: min_base_fee_wei,
            pricing_inertia: 102,
            backlog_tolerance: 10,
        }
    }
}
