//! CSV export for the ledger sequence.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::DispatchRun;

/// Schema v1 column header for CSV ledger export.
const HEADER: &str = "region,hour,load_mw,renewable_mw,renewable_used_mw,\
                      battery_charge_mw,battery_discharge_mw,soc_mwh,\
                      transfer_in_mw,transfer_out_mw,fuel_transfer_in_mw,\
                      fuel_transfer_out_mw,fuel_mw,curtailment_mw,unserved_mw";

/// Exports a run's ledger sequence to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(run: &DispatchRun, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(run, buf)
}

/// Writes a run's ledger sequence as CSV to any writer.
///
/// One row per region-hour, in ledger order (hour-major). Output is
/// deterministic for identical runs.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(run: &DispatchRun, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for l in &run.ledgers {
        wtr.write_record(&[
            l.region.clone(),
            l.hour.to_string(),
            format!("{:.4}", l.load_mw),
            format!("{:.4}", l.renewable_mw),
            format!("{:.4}", l.renewable_used_mw),
            format!("{:.4}", l.battery_charge_mw),
            format!("{:.4}", l.battery_discharge_mw),
            format!("{:.4}", l.soc_after_mwh),
            format!("{:.4}", l.transfer_in_mw),
            format!("{:.4}", l.transfer_out_mw),
            format!("{:.4}", l.fuel_transfer_in_mw),
            format!("{:.4}", l.fuel_transfer_out_mw),
            format!("{:.4}", l.fuel_mw),
            format!("{:.4}", l.curtailment_mw),
            format!("{:.4}", l.unserved_mw),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
