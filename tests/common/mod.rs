#![allow(dead_code)]

use refscope::data::{PaperRecord, ReportRecord};

pub fn report(paper: &str, refnum: &str, female: i64, text: &str) -> ReportRecord {
    report_full(paper, refnum, "accept", female, text)
}

pub fn report_full(
    paper: &str,
    refnum: &str,
    recommendation: &str,
    female: i64,
    text: &str,
) -> ReportRecord {
    ReportRecord {
        paper: paper.to_string(),
        refnum: refnum.to_string(),
        recommendation: recommendation.to_string(),
        decision: "accept".to_string(),
        female,
        cleaned_text: text.to_string(),
    }
}

pub fn paper(paper: &str, text: &str) -> PaperRecord {
    PaperRecord {
        paper: paper.to_string(),
        cleaned_text: text.to_string(),
    }
}
