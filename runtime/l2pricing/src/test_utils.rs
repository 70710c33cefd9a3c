use crate::{PricingConfig, PricingState};
use arbos_primitives_core::types::ArbosVersion;
use arbos_primitives_core::version::MULTI_GAS_CONSTRAINTS_VERSION;
use arbos_store::test_utils::create_test_storage;

/// Version at which every pricing model is available.
pub const TEST_ARBOS_VERSION: ArbosVersion = MULTI_GAS_CONSTRAINTS_VERSION;

/// Pricing state with default genesis parameters on a fresh memory-backed
/// storage with an unlimited burner.
pub fn create_pricing_state(arbos_version: ArbosVersion) -> PricingState {
    let storage = create_test_storage();
    PricingState::initialize(&storage, &PricingConfig::default())
        .expect("unlimited burner cannot run out of gas");
    PricingState::open(storage, arbos_version)
}
