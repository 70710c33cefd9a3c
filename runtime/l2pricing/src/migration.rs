//! One-shot conversions between pricing models, run on ArbOS upgrades.
use crate::{PricingError, PricingState};
use arbos_primitives_core::arith::saturating_u32;
use arbos_primitives_core::multigas::ResourceKind;
use arbos_primitives_core::types::ArbosVersion;
use arbos_primitives_core::version::PricingFeature;
use std::collections::BTreeMap;

impl PricingState {
    /// Replaces the single-gas constraints with one constraint that prices
    /// exactly like the legacy model.
    pub fn set_gas_constraints_from_legacy(&self) -> Result<(), PricingError> {
        self.clear_gas_constraints()?;
        let target = self.speed_limit_per_second()?;
        let adjustment_window = self.pricing_inertia()?;
        let tolerance = self.backlog_tolerance()?;
        let backlog = self.gas_backlog()?.saturating_sub(tolerance.saturating_mul(target));
        self.add_gas_constraint(target, adjustment_window, backlog)?;
        tracing::debug!(
            target: "l2pricing",
            target_gas = target,
            adjustment_window,
            backlog,
            "migrated legacy pricing to a gas constraint"
        );
        Ok(())
    }

    /// Replaces the multi-gas constraints with one constraint per single-gas
    /// constraint, weighing every resource equally.
    pub fn set_multi_gas_constraints_from_single_gas_constraints(&self) -> Result<(), PricingError> {
        self.clear_multi_gas_constraints()?;
        let weights: BTreeMap<ResourceKind, u64> =
            ResourceKind::known().map(|kind| (kind, 1)).collect();
        let count = self.gas_constraints_length()?;
        for index in 0..count {
            let params = self.open_gas_constraint_at(index).params()?;
            self.add_multi_gas_constraint(
                params.target,
                saturating_u32(params.adjustment_window),
                params.backlog,
                &weights,
            )?;
        }
        tracing::debug!(
            target: "l2pricing",
            count,
            "migrated gas constraints to multi-gas constraints"
        );
        Ok(())
    }

    /// Raises the ArbOS version, running the migrations of every pricing
    /// feature the upgrade activates. Downgrades are ignored.
    ///
    /// Migration failures are reported through the burner and do not abort
    /// the upgrade.
    pub fn upgrade_arbos_version(&mut self, new_version: ArbosVersion) {
        let old_version = self.arbos_version;
        if new_version <= old_version {
            return;
        }
        self.arbos_version = new_version;
        tracing::debug!(target: "l2pricing", old_version, new_version, "upgrading pricing state");

        if PricingFeature::SingleGasConstraints.activated_between(old_version, new_version) {
            if let Err(err) = self.set_gas_constraints_from_legacy() {
                self.storage.burner().restrict(&err);
            }
        }
        if PricingFeature::MultiGasConstraints.activated_between(old_version, new_version) {
            if let Err(err) = self.set_multi_gas_constraints_from_single_gas_constraints() {
                self.storage.burner().restrict(&err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::create_pricing_state;
    use crate::{GasConstraintParams, GasModel};
    use arbos_primitives_core::multigas::{ResourceKind, NUM_RESOURCE_KIND};
    use arbos_primitives_core::version::{
        MULTI_GAS_CONSTRAINTS_VERSION, SINGLE_GAS_CONSTRAINTS_VERSION,
    };

    #[test]
    fn test_from_legacy() {
        let state = create_pricing_state(SINGLE_GAS_CONSTRAINTS_VERSION);
        state.set_gas_backlog(100_000_000).unwrap();
        state.add_gas_constraint(5, 5, 5).unwrap();
        state.set_gas_constraints_from_legacy().unwrap();
        assert_eq!(
            state.gas_constraints().unwrap(),
            vec![GasConstraintParams {
                target: 7_000_000,
                adjustment_window: 102,
                backlog: 100_000_000 - 70_000_000,
            }]
        );
    }

    #[test]
    fn test_from_legacy_within_tolerance() {
        let state = create_pricing_state(SINGLE_GAS_CONSTRAINTS_VERSION);
        state.set_gas_backlog(1_000).unwrap();
        state.set_gas_constraints_from_legacy().unwrap();
        assert_eq!(state.open_gas_constraint_at(0).backlog().unwrap(), 0);
    }

    #[test]
    fn test_from_single() {
        let state = create_pricing_state(MULTI_GAS_CONSTRAINTS_VERSION);
        state.add_gas_constraint(1_000_000, 102, 11).unwrap();
        state.add_gas_constraint(2_000_000, u64::from(u32::MAX) + 7, 22).unwrap();
        state.set_multi_gas_constraints_from_single_gas_constraints().unwrap();

        let converted = state.multi_gas_constraints().unwrap();
        assert_eq!(converted.len(), 2);
        assert_eq!(converted[0].target, 1_000_000);
        assert_eq!(converted[0].adjustment_window, 102);
        assert_eq!(converted[0].backlog, 11);
        assert_eq!(converted[1].adjustment_window, u32::MAX);
        assert_eq!(converted[1].weights.len(), NUM_RESOURCE_KIND - 1);
        assert!(converted[1].weights.values().all(|weight| *weight == 1));
        assert!(!converted[1].weights.contains_key(&ResourceKind::Unknown));
        assert_eq!(state.open_multi_gas_constraint_at(1).max_weight().unwrap(), 1);
    }

    #[test]
    fn test_upgrade_runs_migrations() {
        let mut state = create_pricing_state(40);
        state.set_gas_backlog(80_000_000).unwrap();
        assert_eq!(state.gas_model_to_use().unwrap(), GasModel::Legacy);

        state.upgrade_arbos_version(SINGLE_GAS_CONSTRAINTS_VERSION);
        assert_eq!(state.gas_model_to_use().unwrap(), GasModel::SingleGasConstraints);
        assert_eq!(state.open_gas_constraint_at(0).backlog().unwrap(), 10_000_000);

        state.upgrade_arbos_version(MULTI_GAS_CONSTRAINTS_VERSION);
        assert_eq!(state.gas_model_to_use().unwrap(), GasModel::MultiGasConstraints);
        assert_eq!(state.open_multi_gas_constraint_at(0).backlog().unwrap(), 10_000_000);

        // Downgrades and repeated upgrades change nothing.
        state.upgrade_arbos_version(SINGLE_GAS_CONSTRAINTS_VERSION);
        state.upgrade_arbos_version(MULTI_GAS_CONSTRAINTS_VERSION);
        assert_eq!(state.arbos_version(), MULTI_GAS_CONSTRAINTS_VERSION);
        assert_eq!(state.multi_gas_constraints_length().unwrap(), 1);
    }

    #[test]
    fn test_upgrade_failure_is_restricted() {
        let mut state = create_pricing_state(40);
        // A zero speed limit cannot be turned into a constraint.
        state.set_speed_limit_per_second(0).unwrap();
        state.upgrade_arbos_version(MULTI_GAS_CONSTRAINTS_VERSION);
        assert_eq!(state.arbos_version(), MULTI_GAS_CONSTRAINTS_VERSION);
        assert_eq!(state.gas_model_to_use().unwrap(), GasModel::Legacy);
    }
}
