mod common;

use std::collections::HashMap;

use common::{paper, report_full};
use polars::prelude::{DataFrame, DataType};
use rand::rngs::StdRng;
use rand::SeedableRng;
use refscope::data::{balance, merge};
use refscope::Error;

fn class_counts(df: &DataFrame, column: &str) -> HashMap<String, usize> {
    let values = df.column(column).unwrap().cast(&DataType::String).unwrap();
    let mut counts = HashMap::new();
    for value in values.str().unwrap().into_no_null_iter() {
        *counts.entry(value.to_string()).or_insert(0) += 1;
    }
    counts
}

fn two_paper_frame() -> DataFrame {
    let reports = vec![
        report_full("p1", "r1", "accept", 0, "text"),
        report_full("p1", "r2", "accept", 1, "text"),
        report_full("p1", "r3", "reject", 0, "text"),
        report_full("p2", "r1", "accept", 1, "text"),
        report_full("p2", "r2", "accept", 0, "text"),
        report_full("p2", "r3", "reject", 1, "text"),
    ];
    let papers = vec![paper("p1", "intro"), paper("p2", "intro")];
    merge::merge(&reports, &papers).unwrap()
}

#[test]
fn classes_end_up_at_the_pre_balance_minimum() {
    let df = two_paper_frame();
    let mut rng = StdRng::seed_from_u64(7);
    let (balanced, kept) = balance::balance(df, "_recommendation_", "_paper_", &mut rng).unwrap();

    let counts = class_counts(&balanced, "_recommendation_");
    assert_eq!(counts["accept"], 2);
    assert_eq!(counts["reject"], 2);
    assert_eq!(balanced.height(), 4);
    assert_eq!(kept.len(), 4);
}

#[test]
fn no_paper_loses_its_last_row_of_a_class() {
    let df = two_paper_frame();
    let mut rng = StdRng::seed_from_u64(7);
    let (balanced, _) = balance::balance(df, "_recommendation_", "_paper_", &mut rng).unwrap();

    // Every paper held two "accept" rows; each must keep at least one.
    let papers = balanced
        .column("_paper_")
        .unwrap()
        .cast(&DataType::String)
        .unwrap();
    let classes = balanced
        .column("_recommendation_")
        .unwrap()
        .cast(&DataType::String)
        .unwrap();
    let mut accepts_per_paper: HashMap<String, usize> = HashMap::new();
    for (paper_id, class) in papers
        .str()
        .unwrap()
        .into_no_null_iter()
        .zip(classes.str().unwrap().into_no_null_iter())
    {
        if class == "accept" {
            *accepts_per_paper.entry(paper_id.to_string()).or_insert(0) += 1;
        }
    }
    assert!(accepts_per_paper.values().all(|&count| count >= 1));
    assert_eq!(accepts_per_paper.len(), 2);
}

#[test]
fn same_seed_removes_the_same_rows() {
    let mut rng_a = StdRng::seed_from_u64(11);
    let mut rng_b = StdRng::seed_from_u64(11);
    let (_, kept_a) =
        balance::balance(two_paper_frame(), "_recommendation_", "_paper_", &mut rng_a).unwrap();
    let (_, kept_b) =
        balance::balance(two_paper_frame(), "_recommendation_", "_paper_", &mut rng_b).unwrap();
    assert_eq!(kept_a, kept_b);
}

#[test]
fn unreachable_target_is_reported_not_looped() {
    // Every paper holds at most one "accept" row, so the protection rule
    // forbids every removal.
    let reports = vec![
        report_full("p1", "r1", "accept", 0, "text"),
        report_full("p1", "r2", "reject", 1, "text"),
        report_full("p2", "r1", "accept", 0, "text"),
        report_full("p3", "r1", "accept", 1, "text"),
    ];
    let papers = vec![paper("p1", "intro"), paper("p2", "intro"), paper("p3", "intro")];
    let df = merge::merge(&reports, &papers).unwrap();

    let mut rng = StdRng::seed_from_u64(3);
    let err = balance::balance(df, "_recommendation_", "_paper_", &mut rng).unwrap_err();
    assert!(matches!(err, Error::BalanceTargetUnreachable(class) if class == "accept"));
}
