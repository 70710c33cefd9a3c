use crate::simulation::{SimulationRow, Summary};
use std::io::Write;

/// Writes one CSV record per simulated second.
pub struct RowsCsv<W: Write> {
    writer: csv::Writer<W>,
}

impl RowsCsv<std::fs::File> {
    pub fn create(path: &std::path::Path) -> csv::Result<Self> {
        Ok(Self { writer: csv::Writer::from_path(path)? })
    }
}

impl<W: Write> RowsCsv<W> {
    pub fn new(out: W) -> Self {
        Self { writer: csv::Writer::from_writer(out) }
    }

    pub fn write(&mut self, row: &SimulationRow) -> csv::Result<()> {
        self.writer.serialize(row)
    }

    pub fn finish(mut self) -> std::io::Result<W> {
        self.writer.flush()?;
        self.writer.into_inner().map_err(|err| err.into_error())
    }
}

pub fn print_summary_header() {
    println!(
        "{:<22}{:>10}{:>20}{:>20}{:>24}{:>24}{:>20}",
        "MODEL",
        "SECONDS",
        "TOTAL GAS",
        "PEAK BACKLOG",
        "MAX BASE FEE",
        "FINAL BASE FEE",
        "STORAGE GAS",
    );
}

pub fn print_summary_row(summary: &Summary) {
    println!(
        "{:<22}{:>10}{:>20}{:>20}{:>24}{:>24}{:>20}",
        summary.model.to_string(),
        summary.seconds,
        summary.total_gas,
        summary.peak_backlog,
        summary.max_base_fee.to_string(),
        summary.final_base_fee.to_string(),
        summary.storage_gas_burned,
    );
}
