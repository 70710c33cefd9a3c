use crate::scenario::Scenario;
use arbos_l2pricing::{GasModel, PricingState};
use arbos_primitives_core::multigas::ResourceKind;
use arbos_primitives_core::types::{Gas, Wei};
use arbos_store::{Burner, GasBurner, Storage, StorageCostConfig};
use std::rc::Rc;

/// State of the chain at the end of one simulated second.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SimulationRow {
    pub second: u64,
    pub model: String,
    pub gas_used: Gas,
    pub backlog: Gas,
    pub base_fee_wei: String,
    pub max_resource_fee_wei: String,
}

/// Aggregates over a whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub model: GasModel,
    pub seconds: u64,
    pub total_gas: Gas,
    pub peak_backlog: Gas,
    pub max_base_fee: Wei,
    pub final_base_fee: Wei,
    pub storage_gas_burned: Gas,
}

/// Memory-backed pricing state driven one second at a time.
pub struct Simulation {
    scenario: Scenario,
    burner: Rc<GasBurner>,
    state: PricingState,
}

impl Simulation {
    pub fn new(scenario: Scenario) -> anyhow::Result<Self> {
        let burner = Rc::new(GasBurner::system());
        let storage = Storage::new_memory_backed(burner.clone(), StorageCostConfig::default());
        PricingState::initialize(&storage, &scenario.pricing)?;
        let state = PricingState::open(storage, scenario.arbos_version);
        for constraint in &scenario.gas_constraints {
            state.add_gas_constraint(
                constraint.target,
                constraint.adjustment_window,
                constraint.backlog,
            )?;
        }
        for constraint in &scenario.multi_gas_constraints {
            state.add_multi_gas_constraint(
                constraint.target,
                constraint.adjustment_window,
                constraint.backlog,
                &constraint.weights,
            )?;
        }
        tracing::info!(
            target: "simulator",
            arbos_version = scenario.arbos_version,
            gas_constraints = scenario.gas_constraints.len(),
            multi_gas_constraints = scenario.multi_gas_constraints.len(),
            "simulation initialized"
        );
        Ok(Self { scenario, burner, state })
    }

    pub fn state(&self) -> &PricingState {
        &self.state
    }

    /// Applies one second of usage, reprices, and commits the per-resource
    /// fees for the next second.
    pub fn step(&mut self, second: u64) -> anyhow::Result<SimulationRow> {
        if let Some(upgrade) = self.scenario.upgrade {
            if upgrade.at_second == second {
                tracing::info!(
                    target: "simulator",
                    second,
                    arbos_version = upgrade.arbos_version,
                    "upgrading arbos version"
                );
                self.state.upgrade_arbos_version(upgrade.arbos_version);
            }
        }

        let usage = self.scenario.workload.usage_at(second);
        let gas_used = usage.single_gas();
        self.state.grow_backlog(gas_used, &usage)?;
        self.state.update_pricing_model(1)?;
        self.state.commit_multi_gas_fees()?;

        let model = self.state.gas_model_to_use()?;
        let backlog = self.total_backlog(model)?;
        let base_fee = self.state.base_fee_wei()?;
        let max_resource_fee = match model {
            GasModel::MultiGasConstraints => {
                let fees = self.state.current_multi_gas_base_fees()?;
                ResourceKind::known().map(|kind| fees[kind]).max().unwrap_or_default()
            }
            GasModel::Legacy | GasModel::SingleGasConstraints => base_fee,
        };
        tracing::debug!(target: "simulator", second, gas_used, backlog, %base_fee, "step");

        Ok(SimulationRow {
            second,
            model: model.to_string(),
            gas_used,
            backlog,
            base_fee_wei: base_fee.to_string(),
            max_resource_fee_wei: max_resource_fee.to_string(),
        })
    }

    /// Runs `seconds` steps, handing every row to `on_row`.
    pub fn run(
        &mut self,
        seconds: u64,
        mut on_row: impl FnMut(&SimulationRow) -> anyhow::Result<()>,
    ) -> anyhow::Result<Summary> {
        let mut total_gas: Gas = 0;
        let mut peak_backlog: Gas = 0;
        let mut max_base_fee = self.state.base_fee_wei()?;
        for second in 0..seconds {
            let row = self.step(second)?;
            total_gas = total_gas.saturating_add(row.gas_used);
            peak_backlog = peak_backlog.max(row.backlog);
            max_base_fee = max_base_fee.max(self.state.base_fee_wei()?);
            on_row(&row)?;
        }
        Ok(Summary {
            model: self.state.gas_model_to_use()?,
            seconds,
            total_gas,
            peak_backlog,
            max_base_fee,
            final_base_fee: self.state.base_fee_wei()?,
            storage_gas_burned: self.burner.burned(),
        })
    }

    /// Backlog the active model prices on, summed over its constraints.
    fn total_backlog(&self, model: GasModel) -> anyhow::Result<Gas> {
        let backlog = match model {
            GasModel::Legacy => self.state.gas_backlog()?,
            GasModel::SingleGasConstraints => self
                .state
                .gas_constraints()?
                .iter()
                .fold(0, |total: Gas, constraint| total.saturating_add(constraint.backlog)),
            GasModel::MultiGasConstraints => self
                .state
                .multi_gas_constraints()?
                .iter()
                .fold(0, |total: Gas, constraint| total.saturating_add(constraint.backlog)),
        };
        Ok(backlog)
    }
}
