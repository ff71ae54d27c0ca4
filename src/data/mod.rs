//! Corpus records and CSV loading.

pub mod balance;
pub mod merge;
pub mod restrict;

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::Result;

/// Namespaced metadata column names.
///
/// Every non-generated column is wrapped in underscores so that it can never
/// collide with a generated token column, which carries a bare token string.
pub const COL_PAPER: &str = "_paper_";
pub const COL_REFNUM: &str = "_refnum_";
pub const COL_RECOMMENDATION: &str = "_recommendation_";
pub const COL_DECISION: &str = "_decision_";
pub const COL_FEMALE: &str = "_female_";
pub const COL_REPORT_TEXT: &str = "_cleaned_text_report_";
pub const COL_PAPER_TEXT: &str = "_cleaned_text_paper_";

/// One referee report. Identity: the (paper, refnum) pair.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportRecord {
    pub paper: String,
    pub refnum: String,
    pub recommendation: String,
    pub decision: String,
    pub female: i64,
    pub cleaned_text: String,
}

/// One paper, text restricted to the introduction upstream.
#[derive(Debug, Clone, Deserialize)]
pub struct PaperRecord {
    pub paper: String,
    pub cleaned_text: String,
}

/// Read the report corpus from a flat CSV file.
///
/// Bookkeeping columns (file type, export indices) present in the raw
/// corpus are ignored by deserialization and never enter the pipeline.
pub fn load_reports<P: AsRef<Path>>(path: P) -> Result<Vec<ReportRecord>> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: ReportRecord = result?;
        rows.push(row);
    }
    info!(rows = rows.len(), "loaded report corpus");
    Ok(rows)
}

/// Read the paper corpus from a flat CSV file.
pub fn load_papers<P: AsRef<Path>>(path: P) -> Result<Vec<PaperRecord>> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: PaperRecord = result?;
        rows.push(row);
    }
    info!(rows = rows.len(), "loaded paper corpus");
    Ok(rows)
}
