use arbos_pricing_simulator::SimulateCommand;
use clap::Parser;

fn main() -> anyhow::Result<()> {
    SimulateCommand::parse().run()
}
