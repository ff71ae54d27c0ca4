//! Dataset facade: assembly orchestration, validated accessors, and the
//! model registry.

use std::collections::HashMap;

use ndarray::{Array1, Array2};
use polars::prelude::{DataFrame, DataType, NamedFrom, Series};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::data::{
    balance, merge, restrict, PaperRecord, ReportRecord, COL_FEMALE, COL_PAPER, COL_PAPER_TEXT,
    COL_REPORT_TEXT,
};
use crate::error::{Error, Result};
use crate::models::{FittedModel, ModelKind};
use crate::text::{transform, TfMode, Vocabulary, VocabularyOptions};

/// Build-time switches for one dataset assembly.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub adjust_with_papers: bool,
    pub normalize_by_length: bool,
    pub restrict_to_mixed_gender: bool,
    /// Balance classes of this column to equal frequency, if set.
    pub balance_column: Option<String>,
    pub ngrams: usize,
    pub min_df: usize,
    pub max_df: f64,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            adjust_with_papers: false,
            normalize_by_length: false,
            restrict_to_mixed_gender: false,
            balance_column: None,
            ngrams: 1,
            min_df: 1,
            max_df: 1.0,
        }
    }
}

/// Report-level dataset: one row per referee report, one numeric column per
/// vocabulary token after `build`.
///
/// The row index is implicitly dense and zero-based throughout; every
/// row-dropping stage re-indexes by construction.
pub struct Dataset {
    reports: Vec<ReportRecord>,
    papers: Vec<PaperRecord>,
    df: DataFrame,
    vocabulary: Vec<String>,
    // Raw (pre-mode) count matrices, row-aligned with `df`, retained for
    // diagnostics.
    tf_reports: Array2<f64>,
    tf_papers: Array2<f64>,
    models: HashMap<String, FittedModel>,
    rng: StdRng,
}

impl Dataset {
    /// Wrap deserialized corpora; `seed` drives every stochastic operation.
    pub fn from_records(reports: Vec<ReportRecord>, papers: Vec<PaperRecord>, seed: u64) -> Self {
        Self {
            reports,
            papers,
            df: DataFrame::empty(),
            vocabulary: Vec::new(),
            tf_reports: Array2::zeros((0, 0)),
            tf_papers: Array2::zeros((0, 0)),
            models: HashMap::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Assemble the dataset: merge, optional restriction, vectorization and
    /// transform, optional balancing.
    ///
    /// Each stage is a pure frame-to-frame function; the working value is
    /// only installed once the whole chain has succeeded.
    pub fn build(&mut self, config: &BuildConfig) -> Result<()> {
        let mut df = merge::merge(&self.reports, &self.papers)?;

        if config.restrict_to_mixed_gender {
            df = restrict::mixed_gender_only(df, COL_PAPER, COL_FEMALE)?;
        }

        let report_texts = string_column(&df, COL_REPORT_TEXT)?;
        let paper_texts = string_column(&df, COL_PAPER_TEXT)?;
        let options = VocabularyOptions {
            min_df: config.min_df,
            max_df: config.max_df,
            ngrams: config.ngrams,
        };
        let vocabulary = Vocabulary::fit(&report_texts, &options);
        if vocabulary.is_empty() {
            return Err(Error::EmptyVocabulary);
        }
        let mut tf_reports = vocabulary.transform(&report_texts);
        let mut tf_papers = vocabulary.transform(&paper_texts);

        let mode = TfMode::from_flags(config.adjust_with_papers, config.normalize_by_length);
        let transformed = transform::apply(mode, &tf_reports, &tf_papers)?;

        let token_columns: Vec<Series> = vocabulary
            .tokens()
            .iter()
            .enumerate()
            .map(|(col, token)| {
                Series::new(token.as_str().into(), transformed.column(col).to_vec())
            })
            .collect();
        df = df.hstack(&token_columns)?;
        // Text columns only drop once the matrices exist.
        df = df.drop(COL_REPORT_TEXT)?;
        df = df.drop(COL_PAPER_TEXT)?;

        if let Some(column) = &config.balance_column {
            let (balanced, kept) = balance::balance(df, column, COL_PAPER, &mut self.rng)?;
            df = balanced;
            tf_reports = select_rows(&tf_reports, &kept);
            tf_papers = select_rows(&tf_papers, &kept);
        }

        info!(
            rows = df.height(),
            tokens = vocabulary.len(),
            mode = ?mode,
            "assembled dataset"
        );
        self.vocabulary = vocabulary.tokens().to_vec();
        self.tf_reports = tf_reports;
        self.tf_papers = tf_papers;
        self.df = df;
        Ok(())
    }

    /// The assembled frame: metadata plus token columns.
    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    /// The fitted token list, in column order.
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Raw report counts before any mode was applied.
    pub fn raw_report_counts(&self) -> &Array2<f64> {
        &self.tf_reports
    }

    /// Raw paper counts, broadcast per report row.
    pub fn raw_paper_counts(&self) -> &Array2<f64> {
        &self.tf_papers
    }

    /// A numeric column by name.
    pub fn column(&self, name: &str) -> Result<Vec<f64>> {
        let series = self
            .df
            .column(name)
            .map_err(|_| Error::UnknownColumn(name.to_string()))?;
        let values = series.cast(&DataType::Float64)?;
        Ok(values.f64()?.into_no_null_iter().collect())
    }

    /// Validated design matrix for an external estimator: dependent vector
    /// `y` plus one column per independent variable.
    pub fn design(&self, y: &str, x: &[&str]) -> Result<(Array1<f64>, Array2<f64>)> {
        if x.is_empty() {
            return Err(Error::NoIndependentVariables);
        }
        let dependent = Array1::from_vec(self.column(y)?);
        let mut independent = Array2::zeros((self.df.height(), x.len()));
        for (col, name) in x.iter().enumerate() {
            for (row, value) in self.column(name)?.into_iter().enumerate() {
                independent[[row, col]] = value;
            }
        }
        Ok((dependent, independent))
    }

    /// Attach an externally computed column.
    ///
    /// The column must match the current row count (the index is dense, so
    /// index equality reduces to length equality) and must not shadow an
    /// existing column.
    pub fn add_column(&mut self, name: &str, values: Vec<f64>) -> Result<()> {
        if values.len() != self.df.height() {
            return Err(Error::LengthMismatch {
                expected: self.df.height(),
                actual: values.len(),
            });
        }
        if self.df.column(name).is_ok() {
            return Err(Error::DuplicateColumn(name.to_string()));
        }
        self.df.with_column(Series::new(name.into(), values))?;
        Ok(())
    }

    /// Deterministically reassign a binary column: exactly `floor(N/2)`
    /// rows, drawn by the seeded generator, get 1; the rest get 0.
    ///
    /// Used for placebo and permutation exercises.
    pub fn resample_binomial(&mut self, column: &str) -> Result<()> {
        if self.df.column(column).is_err() {
            return Err(Error::UnknownColumn(column.to_string()));
        }
        let rows = self.df.height();
        let mut values = vec![0i64; rows];
        for index in rand::seq::index::sample(&mut self.rng, rows, rows / 2) {
            values[index] = 1;
        }
        self.df.with_column(Series::new(column.into(), values))?;
        Ok(())
    }

    /// Register a fitted model under a name, replacing any previous entry.
    pub fn register_model(&mut self, name: &str, model: FittedModel) {
        if self.models.insert(name.to_string(), model).is_some() {
            info!(name, "replaced previously registered model");
        }
    }

    /// Look up a registered model.
    pub fn model(&self, name: &str) -> Result<&FittedModel> {
        self.models
            .get(name)
            .ok_or_else(|| Error::UnknownModel(name.to_string()))
    }

    /// Look up a registered model, checking it has the expected kind.
    pub fn model_of_kind(&self, name: &str, kind: ModelKind) -> Result<&FittedModel> {
        let model = self.model(name)?;
        if model.kind() != kind {
            return Err(Error::WrongModelKind {
                name: name.to_string(),
                expected: kind,
                actual: model.kind(),
            });
        }
        Ok(model)
    }

    /// The result table of a registered model of the expected kind.
    pub fn results_table(
        &self,
        name: &str,
        kind: ModelKind,
    ) -> Result<&indexmap::IndexMap<String, f64>> {
        Ok(self.model_of_kind(name, kind)?.results_table())
    }

    /// A registered model's full payload as pretty-printed JSON, for
    /// external table renderers.
    pub fn model_results_json(&self, name: &str) -> Result<String> {
        Ok(serde_json::to_string_pretty(self.model(name)?)?)
    }
}

fn string_column(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    Ok(df
        .column(name)?
        .str()?
        .into_no_null_iter()
        .map(|s| s.to_string())
        .collect())
}

fn select_rows(matrix: &Array2<f64>, rows: &[usize]) -> Array2<f64> {
    let mut out = Array2::zeros((rows.len(), matrix.ncols()));
    for (target, &source) in rows.iter().enumerate() {
        out.row_mut(target).assign(&matrix.row(source));
    }
    out
}
