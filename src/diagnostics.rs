//! Numeric corpus summaries computed from the retained raw count matrices.
//!
//! These back the `describe` subcommand; figure rendering is left to
//! downstream tooling.

use ndarray::Array2;
use serde::Serialize;

use crate::data::COL_FEMALE;
use crate::dataset::Dataset;
use crate::error::Result;

/// Mean and standard error of a sample of per-document values.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SampleSummary {
    pub mean: f64,
    /// Undefined for fewer than two observations.
    pub standard_error: Option<f64>,
    pub count: usize,
}

/// Token length of every document (row sums of a count matrix).
pub fn tokens_per_row(matrix: &Array2<f64>) -> Vec<f64> {
    matrix.rows().into_iter().map(|row| row.sum()).collect()
}

/// Number of documents in which each token appears at least once.
pub fn document_appearances(matrix: &Array2<f64>) -> Vec<usize> {
    (0..matrix.ncols())
        .map(|col| matrix.column(col).iter().filter(|&&v| v > 0.0).count())
        .collect()
}

/// Total occurrences of each token over the rows where `mask` holds.
///
/// With `normalize` set, each row is divided by its token count first, so
/// a token's total is a sum of within-document frequencies; all-zero rows
/// contribute nothing.
fn masked_token_totals(matrix: &Array2<f64>, mask: &[bool], normalize: bool) -> Vec<f64> {
    let mut totals = vec![0.0; matrix.ncols()];
    for (row, &keep) in mask.iter().enumerate() {
        if !keep {
            continue;
        }
        let length: f64 = matrix.row(row).sum();
        let scale = if normalize {
            if length == 0.0 {
                continue;
            }
            1.0 / length
        } else {
            1.0
        };
        for (col, total) in totals.iter_mut().enumerate() {
            *total += matrix[[row, col]] * scale;
        }
    }
    totals
}

fn rank_tokens(vocabulary: &[String], totals: Vec<f64>, k: usize) -> Vec<(String, f64)> {
    let mut ranked: Vec<(String, f64)> = vocabulary.iter().cloned().zip(totals).collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(k);
    ranked
}

/// The `k` most common tokens within the masked rows, count-descending.
pub fn top_tokens(
    matrix: &Array2<f64>,
    vocabulary: &[String],
    mask: &[bool],
    k: usize,
) -> Vec<(String, f64)> {
    rank_tokens(vocabulary, masked_token_totals(matrix, mask, false), k)
}

/// The `k` most common tokens within the masked rows, ranked by summed
/// length-normalized frequency rather than raw count.
pub fn top_normalized_tokens(
    matrix: &Array2<f64>,
    vocabulary: &[String],
    mask: &[bool],
    k: usize,
) -> Vec<(String, f64)> {
    rank_tokens(vocabulary, masked_token_totals(matrix, mask, true), k)
}

fn summarize(values: &[f64]) -> SampleSummary {
    let count = values.len();
    if count == 0 {
        return SampleSummary {
            mean: 0.0,
            standard_error: None,
            count,
        };
    }
    let mean = values.iter().sum::<f64>() / count as f64;
    let standard_error = if count < 2 {
        None
    } else {
        let variance = values
            .iter()
            .map(|value| (value - mean).powi(2))
            .sum::<f64>()
            / (count - 1) as f64;
        Some((variance / count as f64).sqrt())
    };
    SampleSummary {
        mean,
        standard_error,
        count,
    }
}

fn split_by_indicator(values: &[f64], indicator: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let zeros = values
        .iter()
        .zip(indicator)
        .filter(|(_, &flag)| flag == 0.0)
        .map(|(&value, _)| value)
        .collect();
    let ones = values
        .iter()
        .zip(indicator)
        .filter(|(_, &flag)| flag != 0.0)
        .map(|(&value, _)| value)
        .collect();
    (zeros, ones)
}

/// Report-length summaries split by the binary gender indicator.
///
/// Returns `(indicator == 0, indicator == 1)`.
pub fn report_lengths_by_gender(dataset: &Dataset) -> Result<(SampleSummary, SampleSummary)> {
    let indicator = dataset.column(COL_FEMALE)?;
    let lengths = tokens_per_row(dataset.raw_report_counts());
    let (zeros, ones) = split_by_indicator(&lengths, &indicator);
    Ok((summarize(&zeros), summarize(&ones)))
}

/// Cosine similarity between each report vector and its paper vector.
///
/// Cosine similarity is scale-invariant, so this equals the similarity
/// between the length-normalized NR and NP vectors. Rows where either
/// vector is all zero have no defined similarity and yield `None`.
pub fn report_paper_similarities(dataset: &Dataset) -> Vec<Option<f64>> {
    let reports = dataset.raw_report_counts();
    let papers = dataset.raw_paper_counts();
    (0..reports.nrows())
        .map(|row| {
            let report = reports.row(row);
            let paper = papers.row(row);
            let dot = report.dot(&paper);
            let norms = report.dot(&report).sqrt() * paper.dot(&paper).sqrt();
            if norms == 0.0 {
                None
            } else {
                Some(dot / norms)
            }
        })
        .collect()
}

/// Report/paper cosine-similarity summaries split by the gender indicator,
/// skipping rows without a defined similarity.
///
/// Returns `(indicator == 0, indicator == 1)`.
pub fn report_paper_similarity_by_gender(
    dataset: &Dataset,
) -> Result<(SampleSummary, SampleSummary)> {
    let indicator = dataset.column(COL_FEMALE)?;
    let mut zeros = Vec::new();
    let mut ones = Vec::new();
    for (similarity, &flag) in report_paper_similarities(dataset).iter().zip(&indicator) {
        if let Some(value) = similarity {
            if flag == 0.0 {
                zeros.push(*value);
            } else {
                ones.push(*value);
            }
        }
    }
    Ok((summarize(&zeros), summarize(&ones)))
}

/// The `k` most common tokens in reports written by each gender.
///
/// Returns `(indicator == 0, indicator == 1)`.
pub fn top_tokens_by_gender(
    dataset: &Dataset,
    k: usize,
) -> Result<(Vec<(String, f64)>, Vec<(String, f64)>)> {
    let indicator = dataset.column(COL_FEMALE)?;
    let zero_mask: Vec<bool> = indicator.iter().map(|&flag| flag == 0.0).collect();
    let one_mask: Vec<bool> = indicator.iter().map(|&flag| flag != 0.0).collect();
    let matrix = dataset.raw_report_counts();
    Ok((
        top_tokens(matrix, dataset.vocabulary(), &zero_mask, k),
        top_tokens(matrix, dataset.vocabulary(), &one_mask, k),
    ))
}

/// The `k` tokens with the highest summed length-normalized frequency in
/// reports written by each gender.
///
/// Returns `(indicator == 0, indicator == 1)`.
pub fn top_normalized_tokens_by_gender(
    dataset: &Dataset,
    k: usize,
) -> Result<(Vec<(String, f64)>, Vec<(String, f64)>)> {
    let indicator = dataset.column(COL_FEMALE)?;
    let zero_mask: Vec<bool> = indicator.iter().map(|&flag| flag == 0.0).collect();
    let one_mask: Vec<bool> = indicator.iter().map(|&flag| flag != 0.0).collect();
    let matrix = dataset.raw_report_counts();
    Ok((
        top_normalized_tokens(matrix, dataset.vocabulary(), &zero_mask, k),
        top_normalized_tokens(matrix, dataset.vocabulary(), &one_mask, k),
    ))
}
