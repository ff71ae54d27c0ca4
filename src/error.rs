//! Error taxonomy for the dataset pipeline.
//!
//! Validation and data-shape failures abort the current build step; no
//! retries, no partially applied transforms. Heuristic concerns (a column
//! that does not look categorical, severe imbalance) are `tracing::warn!`
//! events, not errors.

use thiserror::Error;

use crate::models::ModelKind;

#[derive(Debug, Error)]
pub enum Error {
    #[error("column `{0}` is not present in the dataset")]
    UnknownColumn(String),

    #[error("at least one independent variable is required")]
    NoIndependentVariables,

    #[error("column has {actual} rows but the dataset has {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("column `{0}` already exists in the dataset")]
    DuplicateColumn(String),

    #[error("no model named `{0}` has been fit")]
    UnknownModel(String),

    #[error("model `{name}` is a {actual} model, expected {expected}")]
    WrongModelKind {
        name: String,
        expected: ModelKind,
        actual: ModelKind,
    },

    #[error("paper corpus contains duplicate paper id `{0}`")]
    DuplicatePaper(String),

    #[error("report references unknown paper `{0}`")]
    OrphanReport(String),

    #[error("report ({paper}, {refnum}) appears more than once")]
    DuplicateReport { paper: String, refnum: String },

    #[error("requested {requested} top and bottom coefficients but only {available} are available")]
    InsufficientCoefficients { requested: usize, available: usize },

    #[error("document at row {0} has no in-vocabulary tokens; cannot normalize by length")]
    EmptyDocument(usize),

    #[error("no token satisfied the document-frequency thresholds")]
    EmptyVocabulary,

    #[error("balance target for class `{0}` is unreachable under the within-paper protection rule")]
    BalanceTargetUnreachable(String),

    #[error(transparent)]
    Polars(#[from] polars::error::PolarsError),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
