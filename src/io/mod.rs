//! Result serialization: CSV ledgers and JSON reports.

/// CSV ledger export.
pub mod export;
/// JSON run report.
pub mod report;
