//! `build` sub-command: assemble and persist the dataset.

use std::fs::File;
use std::io::Write;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use polars::prelude::{CsvWriter, SerWriter};
use tracing::info;

use crate::config::Settings;
use crate::data;
use crate::dataset::{BuildConfig, Dataset};

/// Args for the `build` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Report corpus CSV, relative to the data dir.
    #[arg(long, default_value = "reports.csv")]
    pub reports: String,
    /// Paper corpus CSV, relative to the data dir.
    #[arg(long, default_value = "papers.csv")]
    pub papers: String,
    /// Subtract or ratio-divide paper token vectors out of report vectors.
    #[arg(long)]
    pub adjust_with_papers: bool,
    /// Divide each document vector by its token count.
    #[arg(long)]
    pub normalize_by_length: bool,
    /// Keep only papers refereed by more than one gender.
    #[arg(long)]
    pub mixed_gender_only: bool,
    /// Balance classes of this column to equal frequency.
    #[arg(long)]
    pub balance_column: Option<String>,
    #[arg(long, default_value_t = 1)]
    pub ngrams: usize,
    #[arg(long, default_value_t = 1)]
    pub min_df: usize,
    #[arg(long, default_value_t = 1.0)]
    pub max_df: f64,
    /// Override the configured seed.
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn run(args: Args, settings: Settings) -> Result<()> {
    let reports = data::load_reports(settings.join_data(&args.reports))?;
    let papers = data::load_papers(settings.join_data(&args.papers))?;

    let seed = args.seed.unwrap_or(settings.seed);
    let mut dataset = Dataset::from_records(reports, papers, seed);
    dataset.build(&BuildConfig {
        adjust_with_papers: args.adjust_with_papers,
        normalize_by_length: args.normalize_by_length,
        restrict_to_mixed_gender: args.mixed_gender_only,
        balance_column: args.balance_column.clone(),
        ngrams: args.ngrams,
        min_df: args.min_df,
        max_df: args.max_df,
    })?;

    let dataset_path = settings.join_output("dataset.csv");
    let mut file = File::create(&dataset_path)
        .with_context(|| format!("creating {}", dataset_path.display()))?;
    let mut frame = dataset.frame().clone();
    CsvWriter::new(&mut file).finish(&mut frame)?;
    info!(path = %dataset_path.display(), rows = frame.height(), "wrote dataset");

    let vocab_path = settings.join_output("vocabulary.txt");
    let mut vocab_file = File::create(&vocab_path)
        .with_context(|| format!("creating {}", vocab_path.display()))?;
    for token in dataset.vocabulary() {
        writeln!(vocab_file, "{token}")?;
    }
    info!(path = %vocab_path.display(), tokens = dataset.vocabulary().len(), "wrote vocabulary");
    Ok(())
}
