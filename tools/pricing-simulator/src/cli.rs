use crate::output::{print_summary_header, print_summary_row, RowsCsv};
use crate::scenario::{ModelPreset, Scenario};
use crate::simulation::Simulation;
use anyhow::Context;
use arbos_o11y::{default_subscriber, ColorOutput};
use arbos_primitives_core::multigas::ResourceKind;
use arbos_primitives_core::types::Gas;
use std::path::PathBuf;

#[derive(clap::Parser)]
#[clap(about = "Simulate how the L2 base fee responds to a workload")]
pub struct SimulateCommand {
    /// Built-in scenario to run. Ignored when --scenario is given.
    #[clap(long, value_enum, default_value = "multi")]
    model: ModelPreset,
    /// JSON scenario file: pricing config, constraints, workload, log
    /// settings and an optional ArbOS upgrade.
    #[clap(long)]
    scenario: Option<PathBuf>,
    /// Number of seconds to simulate, one block per second.
    #[clap(long, default_value = "600")]
    seconds: u64,
    /// Overrides the computation gas used every second.
    #[clap(long)]
    base_usage: Option<Gas>,
    /// Overrides the extra computation gas used during the burst.
    #[clap(long)]
    burst_usage: Option<Gas>,
    #[clap(long)]
    burst_start: Option<u64>,
    #[clap(long)]
    burst_length: Option<u64>,
    /// File to write one CSV row per simulated second to.
    #[clap(long)]
    csv: Option<PathBuf>,
    /// Enables debug logging for the given target, or for every target when
    /// no value is given.
    #[clap(long, num_args = 0..=1, default_missing_value = "")]
    verbose: Option<String>,
    #[clap(long, value_enum, default_value_t)]
    color: ColorOutput,
}

impl SimulateCommand {
    pub fn run(&self) -> anyhow::Result<()> {
        let scenario = self.scenario()?;
        let filter = scenario.log.env_filter().context("invalid log filter")?;
        let _subscriber = default_subscriber(filter, self.color).global()?;

        let mut csv = match &self.csv {
            Some(path) => Some(
                RowsCsv::create(path)
                    .with_context(|| format!("couldn't create CSV file {}", path.display()))?,
            ),
            None => None,
        };

        let mut simulation = Simulation::new(scenario)?;
        let summary = simulation.run(self.seconds, |row| {
            if let Some(csv) = csv.as_mut() {
                csv.write(row).context("failed writing to CSV file")?;
            }
            Ok(())
        })?;
        if let Some(csv) = csv {
            csv.finish().context("failed flushing CSV file")?;
        }

        print_summary_header();
        print_summary_row(&summary);
        Ok(())
    }

    fn scenario(&self) -> anyhow::Result<Scenario> {
        let mut scenario = match &self.scenario {
            Some(path) => Scenario::from_file(path)?,
            None => Scenario::preset(self.model),
        };
        let workload = &mut scenario.workload;
        if let Some(usage) = self.base_usage {
            workload.base_usage.insert(ResourceKind::Computation, usage);
        }
        if let Some(usage) = self.burst_usage {
            workload.burst_usage.insert(ResourceKind::Computation, usage);
        }
        if let Some(start) = self.burst_start {
            workload.burst_start = start;
        }
        if let Some(length) = self.burst_length {
            workload.burst_length = length;
        }
        if self.verbose.is_some() {
            scenario.log.verbose_module = self.verbose.clone();
        }
        Ok(scenario)
    }
}
