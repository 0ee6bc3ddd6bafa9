//! Configuration error taxonomy.

use thiserror::Error;

/// Fatal configuration error, raised before any simulation hour runs.
///
/// Every variant carries enough context to point at the offending region,
/// link, or scenario field. A `GridConfig` that constructs successfully is
/// guaranteed valid for the dispatch engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("no regions configured")]
    NoRegions,

    #[error("horizon must be > 0")]
    ZeroHorizon,

    #[error("region `{region}`: duplicate region name")]
    DuplicateRegion { region: String },

    #[error("region `{region}`: {series} series has length {got}, expected horizon {expected}")]
    SeriesLength {
        region: String,
        series: &'static str,
        got: usize,
        expected: usize,
    },

    #[error("region `{region}`: {series}[{hour}] is {value}, must be >= 0")]
    NegativeSeries {
        region: String,
        series: &'static str,
        hour: usize,
        value: f64,
    },

    #[error("region `{region}`: battery {field} {message}")]
    Battery {
        region: String,
        field: &'static str,
        message: String,
    },

    #[error("link `{a}`-`{b}`: {message}")]
    Link { a: String, b: String, message: String },

    #[error("unknown region `{region}` referenced by {context}")]
    UnknownRegion {
        region: String,
        context: &'static str,
    },

    #[error("scenario `{path}`: {message}")]
    Scenario { path: String, message: String },

    #[error("unknown preset `{name}`, available: {available}")]
    UnknownPreset { name: String, available: String },
}
