use crate::test_utils::{create_pricing_state, TEST_ARBOS_VERSION};
use crate::PricingState;
use arbos_primitives_core::arith::Bips;
use arbos_primitives_core::multigas::{MultiGas, ResourceKind};
use arbos_primitives_core::types::Wei;
use std::collections::BTreeMap;

fn add_constraint(
    state: &PricingState,
    target: u64,
    window: u32,
    backlog: u64,
    weights: &[(ResourceKind, u64)],
) {
    let weights: BTreeMap<_, _> = weights.iter().copied().collect();
    state.add_multi_gas_constraint(target, window, backlog, &weights).unwrap();
}

#[test]
fn test_exponent_literals() {
    let state = create_pricing_state(TEST_ARBOS_VERSION);
    add_constraint(&state, 100, 10, 100, &[(ResourceKind::Computation, 1)]);
    let exponents = state.calc_multi_gas_constraints_exponents().unwrap();
    assert_eq!(exponents[ResourceKind::Computation], Bips(1000));

    let state = create_pricing_state(TEST_ARBOS_VERSION);
    add_constraint(&state, 40, 20, 200, &[(ResourceKind::StorageAccess, 2)]);
    let exponents = state.calc_multi_gas_constraints_exponents().unwrap();
    assert_eq!(exponents[ResourceKind::StorageAccess], Bips(2500));
    assert_eq!(exponents[ResourceKind::Computation], Bips(0));
}

#[test]
fn test_exponents_accumulate_per_resource() {
    let state = create_pricing_state(TEST_ARBOS_VERSION);
    add_constraint(&state, 100, 10, 100, &[(ResourceKind::Computation, 1)]);
    add_constraint(
        &state,
        40,
        20,
        200,
        &[(ResourceKind::Computation, 1), (ResourceKind::StorageAccess, 2)],
    );
    let exponents = state.calc_multi_gas_constraints_exponents().unwrap();
    // 1000 + 200 * 1 * 10000 / (20 * 40 * 2)
    assert_eq!(exponents[ResourceKind::Computation], Bips(1000 + 1250));
    assert_eq!(exponents[ResourceKind::StorageAccess], Bips(2500));
}

#[test]
fn test_backlog_literals() {
    let state = create_pricing_state(TEST_ARBOS_VERSION);
    add_constraint(
        &state,
        1_000_000,
        10,
        0,
        &[(ResourceKind::Computation, 1), (ResourceKind::StorageAccess, 2)],
    );
    let constraint = state.open_multi_gas_constraint_at(0);

    let usage = MultiGas::from_pairs([
        (ResourceKind::Computation, 10),
        (ResourceKind::StorageAccess, 10),
    ]);
    state.grow_backlog(usage.single_gas(), &usage).unwrap();
    assert_eq!(constraint.backlog().unwrap(), 30);

    let usage = MultiGas::from_pairs([
        (ResourceKind::Computation, 5),
        (ResourceKind::StorageAccess, 15),
    ]);
    state.grow_backlog(usage.single_gas(), &usage).unwrap();
    assert_eq!(constraint.backlog().unwrap(), 65);

    let usage = MultiGas::from_pairs([
        (ResourceKind::Computation, 50),
        (ResourceKind::StorageAccess, 50),
    ]);
    state.shrink_backlog(usage.single_gas(), &usage).unwrap();
    assert_eq!(constraint.backlog().unwrap(), 0);
    // The legacy backlog is not touched by the multi-gas model.
    assert_eq!(state.gas_backlog().unwrap(), 0);
}

#[test]
fn test_next_fees_and_commit() {
    let state = create_pricing_state(TEST_ARBOS_VERSION);
    add_constraint(&state, 100, 10, 100, &[(ResourceKind::Computation, 1)]);
    state.update_pricing_model(0).unwrap();

    let next = state.next_multi_gas_base_fees().unwrap();
    assert_eq!(next[ResourceKind::Computation], Wei::from(110_510_000u64));
    assert_eq!(next[ResourceKind::StorageAccess], Wei::zero());
    assert_eq!(state.base_fee_wei().unwrap(), Wei::from(110_510_000u64));
    // Nothing is charged per resource until the fees are committed.
    assert_eq!(state.current_multi_gas_base_fees().unwrap()[ResourceKind::Computation], Wei::zero());

    state.commit_multi_gas_fees().unwrap();
    let committed = state.current_multi_gas_base_fees().unwrap();
    assert_eq!(committed, next);
    state.commit_multi_gas_fees().unwrap();
    assert_eq!(state.current_multi_gas_base_fees().unwrap(), committed);
}

#[test]
fn test_multi_gas_floor() {
    let state = create_pricing_state(TEST_ARBOS_VERSION);
    add_constraint(&state, 100, 10, 0, &[(ResourceKind::Computation, 1)]);
    state.set_base_fee_wei(Wei::from(999_999_999u64)).unwrap();
    state.update_pricing_model(5).unwrap();
    assert_eq!(state.base_fee_wei().unwrap(), state.min_base_fee_wei().unwrap());
    assert!(state.next_multi_gas_base_fees().unwrap().values().all(|fee| fee.is_zero()));
}

#[test]
fn test_refund_uses_scalar_fee_for_unpriced_resources() {
    let state = create_pricing_state(TEST_ARBOS_VERSION);
    // Computation: 1000 bips. StorageAccess: idle. StorageGrowth: 2500 bips.
    add_constraint(&state, 100, 10, 100, &[(ResourceKind::Computation, 1)]);
    add_constraint(&state, 100, 10, 0, &[(ResourceKind::StorageAccess, 1)]);
    add_constraint(&state, 40, 20, 200, &[(ResourceKind::StorageGrowth, 2)]);
    state.update_pricing_model(0).unwrap();

    let base_fee = state.base_fee_wei().unwrap();
    assert_eq!(base_fee, Wei::from(128_400_000u64));

    let usage = MultiGas::from_pairs([
        (ResourceKind::Computation, 10),
        (ResourceKind::StorageAccess, 20),
    ]);
    // Before the commit no per-resource fee is set yet.
    assert_eq!(state.multi_dimensional_price_for_refund(&usage).unwrap(), base_fee * Wei::from(30u64));

    state.commit_multi_gas_fees().unwrap();
    let computation_fee = state.multi_gas_fees().current_base_fee(ResourceKind::Computation).unwrap();
    assert_eq!(computation_fee, Wei::from(110_510_000u64));
    assert_eq!(
        state.multi_dimensional_price_for_refund(&usage).unwrap(),
        computation_fee * Wei::from(10u64) + base_fee * Wei::from(20u64)
    );
}

#[test]
fn test_refund_prices_l1_calldata_at_scalar_fee() {
    let state = create_pricing_state(TEST_ARBOS_VERSION);
    add_constraint(&state, 100, 10, 100, &[(ResourceKind::L1Calldata, 1)]);
    add_constraint(&state, 40, 20, 200, &[(ResourceKind::Computation, 2)]);
    state.update_pricing_model(0).unwrap();
    state.commit_multi_gas_fees().unwrap();

    let l1_fee = state.multi_gas_fees().current_base_fee(ResourceKind::L1Calldata).unwrap();
    assert_eq!(l1_fee, Wei::from(110_510_000u64));
    let base_fee = state.base_fee_wei().unwrap();
    assert_eq!(base_fee, Wei::from(128_400_000u64));

    let usage = MultiGas::of(ResourceKind::L1Calldata, 3);
    assert_eq!(state.multi_dimensional_price_for_refund(&usage).unwrap(), base_fee * Wei::from(3u64));
}

#[test]
fn test_refund_outside_multi_gas_model() {
    let state = create_pricing_state(TEST_ARBOS_VERSION);
    state.multi_gas_fees().set_next_base_fee(ResourceKind::Computation, Wei::from(1u64)).unwrap();
    state.commit_multi_gas_fees().unwrap();
    let usage = MultiGas::from_pairs([
        (ResourceKind::Computation, 10),
        (ResourceKind::StorageAccess, 20),
    ]);
    // Legacy model: per-resource fees are ignored.
    assert_eq!(
        state.multi_dimensional_price_for_refund(&usage).unwrap(),
        Wei::from(30u64 * 100_000_000)
    );
    assert_eq!(state.multi_dimensional_price_for_refund(&MultiGas::zero()).unwrap(), Wei::zero());
}

#[test]
fn test_refund_prices_unknown_usage_at_scalar_fee() {
    let state = create_pricing_state(TEST_ARBOS_VERSION);
    add_constraint(&state, 40, 20, 200, &[(ResourceKind::Computation, 2)]);
    state.update_pricing_model(0).unwrap();
    state.commit_multi_gas_fees().unwrap();

    let base_fee = state.base_fee_wei().unwrap();
    let computation_fee =
        state.multi_gas_fees().current_base_fee(ResourceKind::Computation).unwrap();
    assert!(!computation_fee.is_zero());

    let mut usage = MultiGas::of(ResourceKind::Computation, 4);
    usage.set(ResourceKind::Unknown, 7);
    assert_eq!(
        state.multi_dimensional_price_for_refund(&usage).unwrap(),
        computation_fee * Wei::from(4u64) + base_fee * Wei::from(7u64)
    );
}
