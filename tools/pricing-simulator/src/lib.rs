//! Replays synthetic workloads through the L2 pricing models and reports how
//! the base fee reacts.
pub use crate::cli::SimulateCommand;
pub use crate::output::{print_summary_header, print_summary_row, RowsCsv};
pub use crate::scenario::{ModelPreset, Scenario, Upgrade, Workload};
pub use crate::simulation::{Simulation, SimulationRow, Summary};

mod cli;
mod output;
mod scenario;
mod simulation;
