//! Dispatch pipeline: target planning, hourly allocation, and run analysis.

/// Hour-by-hour greedy dispatch.
pub mod engine;
pub mod kpi;
/// Immutable per-region-hour records.
pub mod ledger;
pub mod planner;
/// Stress-hour detection.
pub mod stress;

pub use engine::{DispatchEngine, run_dispatch};
pub use kpi::KpiReport;
pub use ledger::{DispatchRun, HourlyLedger};
pub use stress::{Severity, StressEvent};
