use super::open_with_burner;
use crate::test_utils::TEST_ARBOS_VERSION;
use crate::PricingError;
use arbos_primitives_core::multigas::{MultiGas, ResourceKind};
use arbos_primitives_core::types::Wei;
use arbos_store::{GasBurner, StorageError};
use assert_matches::assert_matches;
use std::collections::BTreeMap;

#[test]
fn test_out_of_gas_propagates() {
    let state = open_with_burner(GasBurner::with_limit(10_000), TEST_ARBOS_VERSION);
    state.set_gas_backlog(1).unwrap_err();
    assert_matches!(state.update_pricing_model(1), Err(StorageError::OutOfGas));
    assert_matches!(
        state.add_gas_constraint(1_000, 10, 0),
        Err(PricingError::Storage(StorageError::OutOfGas))
    );
}

#[test]
fn test_read_only_state() {
    let state = open_with_burner(GasBurner::read_only(), TEST_ARBOS_VERSION);
    assert_eq!(state.base_fee_wei().unwrap(), Wei::from(100_000_000u64));
    assert_eq!(
        state
            .multi_dimensional_price_for_refund(&MultiGas::of(ResourceKind::Computation, 2))
            .unwrap(),
        Wei::from(200_000_000u64)
    );
    assert_matches!(state.update_pricing_model(1), Err(StorageError::WriteProtection));
    assert_matches!(
        state.add_multi_gas_constraint(
            1_000,
            10,
            0,
            &BTreeMap::from([(ResourceKind::Computation, 1)])
        ),
        Err(PricingError::Storage(StorageError::WriteProtection))
    );
}

#[test]
fn test_update_cost_grows_with_constraints() {
    let state = open_with_burner(GasBurner::system(), TEST_ARBOS_VERSION);
    state.add_gas_constraint(1_000_000, 10, 5_000_000).unwrap();
    let before = state.storage().burner().burned();
    state.update_pricing_model(1).unwrap();
    let one_constraint = state.storage().burner().burned() - before;

    state.add_gas_constraint(2_000_000, 10, 5_000_000).unwrap();
    let before = state.storage().burner().burned();
    state.update_pricing_model(1).unwrap();
    let two_constraints = state.storage().burner().burned() - before;
    assert!(two_constraints > one_constraint);
}
