//! Numeric term-frequency modes.
//!
//! Four mutually exclusive modes are selected by two independent flags:
//! raw counts, length-normalized frequencies, paper-adjusted counts, and
//! the smoothed normalized ratio NR/NP.

use ndarray::Array2;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TfMode {
    /// Counts used as-is.
    Raw,
    /// Each report row divided by its own token count.
    LengthNormalized,
    /// Report counts minus paper counts, clamped at zero.
    PaperAdjusted,
    /// Laplace-smoothed, row-normalized report frequencies divided
    /// element-wise by the matching paper frequencies.
    PaperAdjustedNormalized,
}

impl TfMode {
    pub fn from_flags(adjust_with_papers: bool, normalize_by_length: bool) -> Self {
        match (adjust_with_papers, normalize_by_length) {
            (false, false) => Self::Raw,
            (false, true) => Self::LengthNormalized,
            (true, false) => Self::PaperAdjusted,
            (true, true) => Self::PaperAdjustedNormalized,
        }
    }
}

/// Apply a mode to the raw report and paper count matrices.
///
/// The inputs are row-aligned: row `i` of `papers` is the paper vector of
/// report `i`, broadcast per report. Inputs are left untouched; the caller
/// retains them for diagnostics.
pub fn apply(mode: TfMode, reports: &Array2<f64>, papers: &Array2<f64>) -> Result<Array2<f64>> {
    match mode {
        TfMode::Raw => Ok(reports.clone()),
        TfMode::LengthNormalized => normalize_rows(reports.clone()),
        TfMode::PaperAdjusted => {
            // A negative cell means the token appears in the paper more
            // than in the report; that carries no meaning here.
            Ok((reports - papers).mapv(|v| v.max(0.0)))
        }
        TfMode::PaperAdjustedNormalized => {
            // Smooth once, before normalization, so no row sum can be zero.
            let smoothed_reports = normalize_rows(reports + 1.0)?;
            let smoothed_papers = normalize_rows(papers + 1.0)?;
            Ok(&smoothed_reports / &smoothed_papers)
        }
    }
}

/// Divide every row by its sum, turning counts into frequencies.
///
/// A zero row sum has no defined frequency distribution; it is reported as
/// an explicit error rather than propagated as NaN.
fn normalize_rows(mut matrix: Array2<f64>) -> Result<Array2<f64>> {
    for (row, mut values) in matrix.outer_iter_mut().enumerate() {
        let total: f64 = values.sum();
        if total == 0.0 {
            return Err(Error::EmptyDocument(row));
        }
        values /= total;
    }
    Ok(matrix)
}
