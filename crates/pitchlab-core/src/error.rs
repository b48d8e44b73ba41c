// Error taxonomy for the pipeline.
//
// Missing selections (no pitch types, no statistic) and empty filter results
// are not errors; the view layer answers them with placeholder results.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// The ingested header row does not match the fixed 19-column layout.
    #[error("schema mismatch: {detail}")]
    SchemaMismatch { found: Vec<String>, detail: String },

    /// A cell could not be interpreted for its column.
    #[error("row {row}: invalid value {value:?} in column `{column}`")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A pitch type outside the colour palette reached the view layer.
    #[error("unknown pitch type `{0}`")]
    UnknownCategory(String),

    #[error("unknown aggregation statistic `{0}`")]
    UnknownStatistic(String),

    #[error("no metrics requested for aggregation")]
    NoMetrics,
}
