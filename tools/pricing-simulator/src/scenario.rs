use anyhow::Context;
use arbos_l2pricing::{GasConstraintParams, MultiGasConstraintParams, PricingConfig};
use arbos_o11y::LogConfig;
use arbos_primitives_core::multigas::{MultiGas, ResourceKind};
use arbos_primitives_core::types::{ArbosVersion, Gas};
use arbos_primitives_core::version::{
    MULTI_GAS_CONSTRAINTS_VERSION, SINGLE_GAS_CONSTRAINTS_VERSION,
};
use std::collections::BTreeMap;
use std::path::Path;

/// Pricing model a preset scenario is built for.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelPreset {
    Legacy,
    Single,
    Multi,
}

/// Resource usage per second. A burst adds `burst_usage` on top of
/// `base_usage` for `burst_length` seconds starting at `burst_start`.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Workload {
    pub base_usage: BTreeMap<ResourceKind, Gas>,
    pub burst_usage: BTreeMap<ResourceKind, Gas>,
    pub burst_start: u64,
    pub burst_length: u64,
}

impl Workload {
    pub fn usage_at(&self, second: u64) -> MultiGas {
        let base = MultiGas::from_pairs(self.base_usage.iter().map(|(kind, gas)| (*kind, *gas)));
        let burst_end = self.burst_start.saturating_add(self.burst_length);
        if (self.burst_start..burst_end).contains(&second) {
            let burst =
                MultiGas::from_pairs(self.burst_usage.iter().map(|(kind, gas)| (*kind, *gas)));
            base.saturating_add(burst)
        } else {
            base
        }
    }
}

/// Raises the ArbOS version once `at_second` is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Upgrade {
    pub at_second: u64,
    pub arbos_version: ArbosVersion,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub arbos_version: ArbosVersion,
    pub pricing: PricingConfig,
    pub gas_constraints: Vec<GasConstraintParams>,
    pub multi_gas_constraints: Vec<MultiGasConstraintParams>,
    pub workload: Workload,
    pub upgrade: Option<Upgrade>,
    pub log: LogConfig,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::preset(ModelPreset::Legacy)
    }
}

impl Scenario {
    /// Default pricing parameters with the constraints each model needs to
    /// become active.
    pub fn preset(model: ModelPreset) -> Self {
        let pricing = PricingConfig::default();
        let single = GasConstraintParams {
            target: pricing.speed_limit_per_second,
            adjustment_window: pricing.pricing_inertia,
            backlog: 0,
        };
        let (arbos_version, gas_constraints, multi_gas_constraints) = match model {
            ModelPreset::Legacy => (SINGLE_GAS_CONSTRAINTS_VERSION - 1, vec![], vec![]),
            ModelPreset::Single => (SINGLE_GAS_CONSTRAINTS_VERSION, vec![single], vec![]),
            ModelPreset::Multi => {
                let execution = MultiGasConstraintParams {
                    target: pricing.speed_limit_per_second,
                    adjustment_window: 102,
                    backlog: 0,
                    weights: ResourceKind::known()
                        .filter(|kind| *kind != ResourceKind::StorageGrowth)
                        .map(|kind| (kind, 1))
                        .collect(),
                };
                let storage_growth = MultiGasConstraintParams {
                    target: 2_000_000,
                    adjustment_window: 600,
                    backlog: 0,
                    weights: BTreeMap::from([(ResourceKind::StorageGrowth, 1)]),
                };
                (MULTI_GAS_CONSTRAINTS_VERSION, vec![], vec![execution, storage_growth])
            }
        };
        let workload = Workload {
            base_usage: BTreeMap::from([(ResourceKind::Computation, 5_000_000)]),
            burst_usage: BTreeMap::from([(ResourceKind::Computation, 20_000_000)]),
            burst_start: 60,
            burst_length: 30,
        };
        Self {
            arbos_version,
            pricing,
            gas_constraints,
            multi_gas_constraints,
            workload,
            upgrade: None,
            log: LogConfig::default(),
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("failed to open scenario file {}", path.display()))?;
        serde_json::from_reader(std::io::BufReader::new(file))
            .with_context(|| format!("failed to parse scenario file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_window() {
        let workload = Workload {
            base_usage: BTreeMap::from([(ResourceKind::Computation, 10)]),
            burst_usage: BTreeMap::from([
                (ResourceKind::Computation, 5),
                (ResourceKind::StorageGrowth, 7),
            ]),
            burst_start: 2,
            burst_length: 2,
        };
        assert_eq!(workload.usage_at(1).single_gas(), 10);
        assert_eq!(workload.usage_at(2).get(ResourceKind::Computation), 15);
        assert_eq!(workload.usage_at(3).get(ResourceKind::StorageGrowth), 7);
        assert_eq!(workload.usage_at(4).single_gas(), 10);
    }

    #[test]
    fn test_parse_partial_scenario() {
        let scenario: Scenario = serde_json::from_str(
            r#"{
                "arbos_version": 50,
                "gas_constraints": [{"target": 1000000, "adjustment_window": 10}],
                "workload": {"base_usage": {"Computation": 2000000}}
            }"#,
        )
        .unwrap();
        assert_eq!(scenario.gas_constraints[0].backlog, 0);
        assert_eq!(scenario.pricing, PricingConfig::default());
        assert_eq!(scenario.workload.usage_at(0).get(ResourceKind::Computation), 2_000_000);
        assert_eq!(scenario.upgrade, None);
    }
}
