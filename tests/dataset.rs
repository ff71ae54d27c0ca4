mod common;

use common::{paper, report, report_full};
use indexmap::IndexMap;
use refscope::models::{FittedModel, LikelihoodRatioFit, ModelKind, OlsFit, Penalty, RegularizedFit};
use refscope::{BuildConfig, Dataset, Error};

fn small_corpus() -> Dataset {
    let reports = vec![
        report("p1", "r1", 0, "strong results but weak data"),
        report("p1", "r2", 1, "weak identification strategy"),
        report("p2", "r1", 0, "novel data and strong results"),
        report("p2", "r2", 1, "results are not novel"),
    ];
    let papers = vec![
        paper("p1", "we study weak instruments"),
        paper("p2", "we present novel data"),
    ];
    Dataset::from_records(reports, papers, 42)
}

#[test]
fn build_appends_token_columns_and_drops_text() {
    let mut dataset = small_corpus();
    dataset.build(&BuildConfig::default()).unwrap();

    assert!(!dataset.vocabulary().is_empty());
    for token in dataset.vocabulary() {
        assert!(dataset.frame().column(token).is_ok(), "missing column {token}");
    }
    assert!(dataset.frame().column("_cleaned_text_report_").is_err());
    assert!(dataset.frame().column("_cleaned_text_paper_").is_err());

    // "results" appears once in three of the four reports.
    let results = dataset.column("results").unwrap();
    assert_eq!(results, vec![1.0, 0.0, 1.0, 1.0]);
}

#[test]
fn report_and_paper_matrices_share_the_vocabulary() {
    let mut dataset = small_corpus();
    dataset.build(&BuildConfig::default()).unwrap();
    assert_eq!(
        dataset.raw_report_counts().ncols(),
        dataset.vocabulary().len()
    );
    assert_eq!(
        dataset.raw_paper_counts().ncols(),
        dataset.vocabulary().len()
    );
    assert_eq!(
        dataset.raw_report_counts().nrows(),
        dataset.frame().height()
    );
}

#[test]
fn mixed_gender_restriction_inside_build() {
    let reports = vec![
        report("p1", "r1", 0, "alpha beta"),
        report("p1", "r2", 1, "beta gamma"),
        report("p2", "r1", 0, "gamma delta"),
        report("p2", "r2", 0, "delta alpha"),
    ];
    let papers = vec![paper("p1", "intro one"), paper("p2", "intro two")];
    let mut dataset = Dataset::from_records(reports, papers, 42);
    dataset
        .build(&BuildConfig {
            restrict_to_mixed_gender: true,
            ..BuildConfig::default()
        })
        .unwrap();
    assert_eq!(dataset.frame().height(), 2);
}

#[test]
fn balanced_build_is_deterministic_for_a_seed() {
    let build = || {
        let reports = vec![
            report_full("p1", "r1", "accept", 0, "alpha beta"),
            report_full("p1", "r2", "accept", 1, "beta gamma"),
            report_full("p1", "r3", "reject", 0, "gamma alpha"),
            report_full("p2", "r1", "accept", 1, "alpha alpha"),
            report_full("p2", "r2", "accept", 0, "beta beta"),
            report_full("p2", "r3", "reject", 1, "gamma gamma"),
        ];
        let papers = vec![paper("p1", "intro alpha"), paper("p2", "intro beta")];
        let mut dataset = Dataset::from_records(reports, papers, 99);
        dataset
            .build(&BuildConfig {
                balance_column: Some("_recommendation_".to_string()),
                ..BuildConfig::default()
            })
            .unwrap();
        dataset
    };

    let first = build();
    let second = build();
    assert_eq!(first.frame().height(), second.frame().height());
    for token in first.vocabulary() {
        assert_eq!(first.column(token).unwrap(), second.column(token).unwrap());
    }
    assert_eq!(
        first.column("_female_").unwrap(),
        second.column("_female_").unwrap()
    );
}

#[test]
fn add_column_validates_shape_and_name() {
    let mut dataset = small_corpus();
    dataset.build(&BuildConfig::default()).unwrap();

    let err = dataset.add_column("score", vec![1.0]).unwrap_err();
    assert!(matches!(err, Error::LengthMismatch { expected: 4, actual: 1 }));

    let err = dataset
        .add_column("_female_", vec![0.0; 4])
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateColumn(_)));

    dataset.add_column("score", vec![0.1, 0.2, 0.3, 0.4]).unwrap();
    assert_eq!(dataset.column("score").unwrap(), vec![0.1, 0.2, 0.3, 0.4]);
}

#[test]
fn resample_assigns_exactly_half_ones() {
    let mut dataset = small_corpus();
    dataset.build(&BuildConfig::default()).unwrap();
    dataset.resample_binomial("_female_").unwrap();

    let values = dataset.column("_female_").unwrap();
    let ones = values.iter().filter(|&&v| v == 1.0).count();
    assert_eq!(ones, 2);

    let err = dataset.resample_binomial("missing").unwrap_err();
    assert!(matches!(err, Error::UnknownColumn(_)));
}

#[test]
fn resample_is_deterministic_for_a_seed() {
    let draw = || {
        let mut dataset = small_corpus();
        dataset.build(&BuildConfig::default()).unwrap();
        dataset.resample_binomial("_female_").unwrap();
        dataset.column("_female_").unwrap()
    };
    assert_eq!(draw(), draw());
}

#[test]
fn design_matrix_is_column_validated() {
    let mut dataset = small_corpus();
    dataset.build(&BuildConfig::default()).unwrap();

    let err = dataset.design("_female_", &[]).unwrap_err();
    assert!(matches!(err, Error::NoIndependentVariables));

    let err = dataset.design("_nope_", &["results"]).unwrap_err();
    assert!(matches!(err, Error::UnknownColumn(_)));

    let (y, x) = dataset.design("_female_", &["results", "data"]).unwrap();
    assert_eq!(y.len(), 4);
    assert_eq!(x.shape(), &[4, 2]);
}

fn toy_regularized_fit(coefficient_count: usize) -> RegularizedFit {
    let mut coefficients = IndexMap::new();
    for index in 0..coefficient_count {
        let value = index as f64 - coefficient_count as f64 / 2.0;
        coefficients.insert(format!("token{index}"), value);
    }
    RegularizedFit {
        coefficients,
        dummy_coefficients: IndexMap::new(),
        method: Penalty::Lasso,
        metrics: IndexMap::from([("optimal_alpha".to_string(), 0.3)]),
    }
}

#[test]
fn model_registry_checks_names_and_kinds() {
    let mut dataset = small_corpus();
    dataset.build(&BuildConfig::default()).unwrap();

    dataset.register_model(
        "lasso_female",
        FittedModel::Regularized(toy_regularized_fit(6)),
    );

    assert!(matches!(
        dataset.model("never_fit").unwrap_err(),
        Error::UnknownModel(_)
    ));
    assert!(matches!(
        dataset.results_table("lasso_female", ModelKind::Ols).unwrap_err(),
        Error::WrongModelKind { .. }
    ));
    let table = dataset
        .results_table("lasso_female", ModelKind::Regularized)
        .unwrap();
    assert_eq!(table.len(), 6);

    // Re-registering under the same name replaces the entry.
    dataset.register_model(
        "lasso_female",
        FittedModel::Ols(OlsFit {
            coefficients: IndexMap::from([("_female_".to_string(), 0.12)]),
            standard_errors: IndexMap::from([("_female_".to_string(), 0.05)]),
            r_squared: 0.2,
            observations: 4,
        }),
    );
    assert_eq!(dataset.model("lasso_female").unwrap().kind(), ModelKind::Ols);
}

#[test]
fn top_bottom_coefficients_reject_oversized_requests() {
    let fit = toy_regularized_fit(6);
    let err = fit.top_bottom_coefficients(4).unwrap_err();
    assert!(matches!(
        err,
        Error::InsufficientCoefficients { requested: 4, available: 6 }
    ));

    let (top, bottom) = fit.top_bottom_coefficients(2).unwrap();
    assert_eq!(top[0].1, 2.0);
    assert_eq!(bottom[0].1, -3.0);
}

#[test]
fn likelihood_ratio_table_is_the_pooled_ratios() {
    let fit = LikelihoodRatioFit {
        pooled_ratios: IndexMap::from([("weak".to_string(), 1.8)]),
        within_group_ratios: IndexMap::from([("weak".to_string(), 1.4)]),
        document_frequencies: IndexMap::from([("weak".to_string(), 0.5)]),
        group_frequencies: IndexMap::from([("weak".to_string(), 1.0)]),
    };
    let model = FittedModel::LikelihoodRatio(fit);
    assert_eq!(model.kind(), ModelKind::LikelihoodRatio);
    assert_eq!(model.results_table()["weak"], 1.8);
    assert_eq!(
        match model {
            FittedModel::LikelihoodRatio(ref fit) => fit.group_frequencies["weak"],
            _ => unreachable!(),
        },
        1.0
    );
}

#[test]
fn model_results_serialize_to_json() {
    let mut dataset = small_corpus();
    dataset.build(&BuildConfig::default()).unwrap();
    dataset.register_model(
        "lasso_female",
        FittedModel::Regularized(toy_regularized_fit(4)),
    );

    let json = dataset.model_results_json("lasso_female").unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["Regularized"]["method"], "Lasso");
    assert_eq!(value["Regularized"]["coefficients"]["token0"], -2.0);

    let err = dataset.model_results_json("never_fit").unwrap_err();
    assert!(matches!(err, Error::UnknownModel(_)));
}

#[test]
fn degenerate_frequency_thresholds_fail_fast() {
    let mut dataset = small_corpus();
    let err = dataset
        .build(&BuildConfig {
            min_df: 10,
            ..BuildConfig::default()
        })
        .unwrap_err();
    assert!(matches!(err, Error::EmptyVocabulary));
}
