//! JSON run report: KPIs, stress events, and recommendations.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::sim::{KpiReport, StressEvent};
use crate::whatif::Recommendation;

/// Serializable bundle of everything a run produced beyond the raw ledgers.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport<'a> {
    pub kpis: &'a KpiReport,
    pub stress_events: &'a [StressEvent],
    pub recommendations: &'a [Recommendation],
}

/// Writes the report as pretty-printed JSON to the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation, serialization, or writing fails.
pub fn export_json(report: &RunReport<'_>, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_json(report, &mut writer)?;
    writer.flush()
}

/// Writes the report as pretty-printed JSON to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if serialization or writing fails.
pub fn write_json(report: &RunReport<'_>, writer: impl Write) -> io::Result<()> {
    serde_json::to_writer_pretty(writer, report).map_err(io::Error::from)
}
