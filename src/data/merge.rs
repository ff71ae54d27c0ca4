//! Report/paper merge producing the report-level frame.

use std::collections::{HashMap, HashSet};

use polars::prelude::{CategoricalOrdering, DataFrame, DataType, NamedFrom, Series};
use tracing::info;

use crate::data::{
    PaperRecord, ReportRecord, COL_DECISION, COL_FEMALE, COL_PAPER, COL_PAPER_TEXT,
    COL_RECOMMENDATION, COL_REFNUM, COL_REPORT_TEXT,
};
use crate::error::{Error, Result};

/// Join report records with their paper, one output row per report.
///
/// The join is validated many-to-one: a duplicated paper id in the paper
/// corpus or a report referencing an unknown paper fails the merge. Every
/// metadata column lands under its underscore-wrapped name, and the paper,
/// referee, recommendation, and decision columns are cast to categorical.
pub fn merge(reports: &[ReportRecord], papers: &[PaperRecord]) -> Result<DataFrame> {
    let mut by_paper: HashMap<&str, &PaperRecord> = HashMap::new();
    for paper in papers {
        if by_paper.insert(paper.paper.as_str(), paper).is_some() {
            return Err(Error::DuplicatePaper(paper.paper.clone()));
        }
    }

    let mut seen_reports = HashSet::new();
    let mut paper_ids = Vec::with_capacity(reports.len());
    let mut refnums = Vec::with_capacity(reports.len());
    let mut recommendations = Vec::with_capacity(reports.len());
    let mut decisions = Vec::with_capacity(reports.len());
    let mut female = Vec::with_capacity(reports.len());
    let mut report_texts = Vec::with_capacity(reports.len());
    let mut paper_texts = Vec::with_capacity(reports.len());

    for report in reports {
        let paper = by_paper
            .get(report.paper.as_str())
            .ok_or_else(|| Error::OrphanReport(report.paper.clone()))?;
        if !seen_reports.insert((report.paper.as_str(), report.refnum.as_str())) {
            return Err(Error::DuplicateReport {
                paper: report.paper.clone(),
                refnum: report.refnum.clone(),
            });
        }
        paper_ids.push(report.paper.clone());
        refnums.push(report.refnum.clone());
        recommendations.push(report.recommendation.clone());
        decisions.push(report.decision.clone());
        female.push(report.female);
        report_texts.push(report.cleaned_text.clone());
        paper_texts.push(paper.cleaned_text.clone());
    }

    let mut df = DataFrame::new(vec![
        Series::new(COL_PAPER.into(), paper_ids),
        Series::new(COL_REFNUM.into(), refnums),
        Series::new(COL_RECOMMENDATION.into(), recommendations),
        Series::new(COL_DECISION.into(), decisions),
        Series::new(COL_FEMALE.into(), female),
        Series::new(COL_REPORT_TEXT.into(), report_texts),
        Series::new(COL_PAPER_TEXT.into(), paper_texts),
    ])?;

    for column in [COL_PAPER, COL_REFNUM, COL_RECOMMENDATION, COL_DECISION] {
        let cast = df
            .column(column)?
            .cast(&DataType::Categorical(None, CategoricalOrdering::Physical))?;
        df.with_column(cast)?;
    }

    info!(
        reports = reports.len(),
        papers = papers.len(),
        "merged report and paper corpora"
    );
    Ok(df)
}
