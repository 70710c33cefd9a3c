use crate::types::ArbosVersion;

/// First ArbOS version in which base fees may be driven by a vector of
/// single-gas constraints instead of the legacy speed-limit model.
pub const SINGLE_GAS_CONSTRAINTS_VERSION: ArbosVersion = 50;

/// First ArbOS version in which multi-dimensional gas constraints are legal.
pub const MULTI_GAS_CONSTRAINTS_VERSION: ArbosVersion = 60;

/// Advisory upper bound on the number of single-gas constraints. Exceeding it
/// is allowed but makes every block pay for iterating the extra constraints.
pub const GAS_CONSTRAINTS_MAX_NUM: u64 = 20;

/// Advisory upper bound on the number of multi-gas constraints.
pub const MULTI_GAS_CONSTRAINTS_MAX_NUM: u64 = 15;

/// Version gated pricing features.
#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::EnumIter, strum::Display)]
pub enum PricingFeature {
    SingleGasConstraints,
    MultiGasConstraints,
}

impl PricingFeature {
    pub const fn arbos_version(self) -> ArbosVersion {
        match self {
            PricingFeature::SingleGasConstraints => SINGLE_GAS_CONSTRAINTS_VERSION,
            PricingFeature::MultiGasConstraints => MULTI_GAS_CONSTRAINTS_VERSION,
        }
    }

    pub fn enabled(self, arbos_version: ArbosVersion) -> bool {
        arbos_version >= self.arbos_version()
    }

    /// Whether moving from `from` to `to` switches this feature on.
    pub fn activated_between(self, from: ArbosVersion, to: ArbosVersion) -> bool {
        !self.enabled(from) && self.enabled(to)
    }
}
