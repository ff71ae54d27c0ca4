//! `describe` sub-command: numeric corpus summaries.

use std::fs::{self, File};

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use polars::prelude::{CsvWriter, DataFrame, NamedFrom, SerWriter, Series};
use serde::Serialize;
use tracing::info;

use crate::config::Settings;
use crate::data;
use crate::dataset::{BuildConfig, Dataset};
use crate::diagnostics::{self, SampleSummary};

/// Per-gender report summaries persisted as `gender_summaries.json`.
#[derive(Debug, Serialize)]
struct GenderSummaries {
    report_length_non_female: SampleSummary,
    report_length_female: SampleSummary,
    report_paper_similarity_non_female: SampleSummary,
    report_paper_similarity_female: SampleSummary,
}

/// Args for the `describe` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Report corpus CSV, relative to the data dir.
    #[arg(long, default_value = "reports.csv")]
    pub reports: String,
    /// Paper corpus CSV, relative to the data dir.
    #[arg(long, default_value = "papers.csv")]
    pub papers: String,
    /// Keep only papers refereed by more than one gender.
    #[arg(long)]
    pub mixed_gender_only: bool,
    #[arg(long, default_value_t = 1)]
    pub ngrams: usize,
    #[arg(long, default_value_t = 1)]
    pub min_df: usize,
    #[arg(long, default_value_t = 1.0)]
    pub max_df: f64,
    /// How many of the most common tokens to report per gender.
    #[arg(long, default_value_t = 50)]
    pub top_tokens: usize,
}

pub fn run(args: Args, settings: Settings) -> Result<()> {
    let reports = data::load_reports(settings.join_data(&args.reports))?;
    let papers = data::load_papers(settings.join_data(&args.papers))?;

    let mut dataset = Dataset::from_records(reports, papers, settings.seed);
    dataset.build(&BuildConfig {
        restrict_to_mixed_gender: args.mixed_gender_only,
        ngrams: args.ngrams,
        min_df: args.min_df,
        max_df: args.max_df,
        ..BuildConfig::default()
    })?;

    let report_lengths = diagnostics::tokens_per_row(dataset.raw_report_counts());
    let paper_lengths = diagnostics::tokens_per_row(dataset.raw_paper_counts());
    let mut lengths = DataFrame::new(vec![
        Series::new("report_tokens".into(), report_lengths),
        Series::new("paper_tokens".into(), paper_lengths),
    ])?;
    write_csv(&mut lengths, &settings, "tokens_per_document.csv")?;

    let appearances = diagnostics::document_appearances(dataset.raw_report_counts());
    let mut frequencies = DataFrame::new(vec![
        Series::new("token".into(), dataset.vocabulary().to_vec()),
        Series::new(
            "reports_appearing_in".into(),
            appearances.iter().map(|&n| n as i64).collect::<Vec<_>>(),
        ),
    ])?;
    write_csv(&mut frequencies, &settings, "token_document_frequency.csv")?;

    let (length_non_female, length_female) = diagnostics::report_lengths_by_gender(&dataset)?;
    info!(
        non_female_mean = length_non_female.mean,
        female_mean = length_female.mean,
        "report lengths by referee gender"
    );
    let (similarity_non_female, similarity_female) =
        diagnostics::report_paper_similarity_by_gender(&dataset)?;
    info!(
        non_female_mean = similarity_non_female.mean,
        female_mean = similarity_female.mean,
        "report/paper cosine similarity by referee gender"
    );
    let summaries = GenderSummaries {
        report_length_non_female: length_non_female,
        report_length_female: length_female,
        report_paper_similarity_non_female: similarity_non_female,
        report_paper_similarity_female: similarity_female,
    };
    let summaries_path = settings.join_output("gender_summaries.json");
    fs::write(&summaries_path, serde_json::to_string_pretty(&summaries)?)
        .with_context(|| format!("writing {}", summaries_path.display()))?;
    info!(path = %summaries_path.display(), "wrote gender summaries");

    let (top_non_female, top_female) = diagnostics::top_tokens_by_gender(&dataset, args.top_tokens)?;
    let mut common = token_table(&top_non_female, &top_female)?;
    write_csv(&mut common, &settings, "most_common_tokens_by_gender.csv")?;

    let (normalized_non_female, normalized_female) =
        diagnostics::top_normalized_tokens_by_gender(&dataset, args.top_tokens)?;
    let mut normalized = token_table(&normalized_non_female, &normalized_female)?;
    write_csv(
        &mut normalized,
        &settings,
        "most_common_normalized_tokens_by_gender.csv",
    )?;
    Ok(())
}

fn token_table(non_female: &[(String, f64)], female: &[(String, f64)]) -> Result<DataFrame> {
    Ok(DataFrame::new(vec![
        Series::new(
            "non_female_token".into(),
            non_female.iter().map(|(t, _)| t.clone()).collect::<Vec<_>>(),
        ),
        Series::new(
            "non_female_count".into(),
            non_female.iter().map(|(_, c)| *c).collect::<Vec<_>>(),
        ),
        Series::new(
            "female_token".into(),
            female.iter().map(|(t, _)| t.clone()).collect::<Vec<_>>(),
        ),
        Series::new(
            "female_count".into(),
            female.iter().map(|(_, c)| *c).collect::<Vec<_>>(),
        ),
    ])?)
}

fn write_csv(frame: &mut DataFrame, settings: &Settings, name: &str) -> Result<()> {
    let path = settings.join_output(name);
    let mut file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    CsvWriter::new(&mut file).finish(frame)?;
    info!(path = %path.display(), rows = frame.height(), "wrote summary");
    Ok(())
}
