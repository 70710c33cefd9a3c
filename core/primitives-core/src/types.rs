pub use primitive_types::U256;

/// Gas is a type for storing amount of gas.
pub type Gas = u64;
/// Amount of gas weighted by a per-resource multiplier.
pub type WeightedGas = u64;
/// Per-resource multiplier of a multi-gas constraint.
pub type Weight = u64;
/// Wei is the unit base fees are denominated in.
pub type Wei = U256;
/// Number of seconds elapsed between two blocks.
pub type TimeDelta = u64;
/// Version of the ArbOS storage format and semantics.
pub type ArbosVersion = u64;

/// One gwei, in wei.
pub const GWEI: u64 = 1_000_000_000;
