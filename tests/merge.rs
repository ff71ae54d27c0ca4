mod common;

use common::{paper, report};
use refscope::data::merge;
use refscope::Error;

#[test]
fn one_row_per_report_with_paper_attributes_broadcast() {
    let reports = vec![
        report("p1", "r1", 0, "clear contribution"),
        report("p1", "r2", 1, "weak identification"),
    ];
    let papers = vec![paper("p1", "we study labor markets")];

    let df = merge::merge(&reports, &papers).unwrap();
    assert_eq!(df.height(), 2);

    let paper_text = df.column("_cleaned_text_paper_").unwrap();
    let paper_text = paper_text.str().unwrap();
    assert_eq!(paper_text.get(0), paper_text.get(1));
}

#[test]
fn metadata_columns_are_namespaced() {
    let reports = vec![report("p1", "r1", 0, "fine")];
    let papers = vec![paper("p1", "intro")];
    let df = merge::merge(&reports, &papers).unwrap();
    for column in [
        "_paper_",
        "_refnum_",
        "_recommendation_",
        "_decision_",
        "_female_",
        "_cleaned_text_report_",
        "_cleaned_text_paper_",
    ] {
        assert!(df.column(column).is_ok(), "missing {column}");
    }
}

#[test]
fn orphan_report_fails_the_merge() {
    let reports = vec![report("p9", "r1", 0, "text")];
    let papers = vec![paper("p1", "intro")];
    let err = merge::merge(&reports, &papers).unwrap_err();
    assert!(matches!(err, Error::OrphanReport(id) if id == "p9"));
}

#[test]
fn duplicate_paper_id_fails_the_merge() {
    let reports = vec![report("p1", "r1", 0, "text")];
    let papers = vec![paper("p1", "intro"), paper("p1", "other intro")];
    let err = merge::merge(&reports, &papers).unwrap_err();
    assert!(matches!(err, Error::DuplicatePaper(id) if id == "p1"));
}

#[test]
fn duplicate_report_identity_fails_the_merge() {
    let reports = vec![report("p1", "r1", 0, "text"), report("p1", "r1", 1, "again")];
    let papers = vec![paper("p1", "intro")];
    let err = merge::merge(&reports, &papers).unwrap_err();
    assert!(matches!(err, Error::DuplicateReport { .. }));
}
