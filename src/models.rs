//! Fitted-model payloads and the uniform result-table contract.
//!
//! The estimators themselves live outside this crate; collaborators fit on
//! matrices obtained from [`crate::Dataset::design`] and register the
//! resulting payload under a name. The closed set of model kinds is a
//! tagged variant, so "model type" dispatch needs no runtime inspection.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ModelKind {
    Ols,
    Regularized,
    LikelihoodRatio,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ols => write!(f, "OLS"),
            Self::Regularized => write!(f, "regularized"),
            Self::LikelihoodRatio => write!(f, "likelihood-ratio"),
        }
    }
}

/// Regularization method used by an external regularized fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Penalty {
    Lasso,
    Ridge,
    ElasticNet,
}

/// Result of an external OLS (or logistic) fit.
#[derive(Debug, Clone, Serialize)]
pub struct OlsFit {
    /// Coefficient estimates keyed by covariate name.
    pub coefficients: IndexMap<String, f64>,
    /// Standard errors keyed by covariate name.
    pub standard_errors: IndexMap<String, f64>,
    pub r_squared: f64,
    pub observations: usize,
}

/// Result of an external regularized fit.
#[derive(Debug, Clone, Serialize)]
pub struct RegularizedFit {
    /// Token coefficients only; dummies and metrics live in their own fields.
    pub coefficients: IndexMap<String, f64>,
    pub dummy_coefficients: IndexMap<String, f64>,
    pub method: Penalty,
    /// Fit metrics such as the optimal penalty weight.
    pub metrics: IndexMap<String, f64>,
}

/// Per-token likelihood ratios comparing two document classes.
#[derive(Debug, Clone, Serialize)]
pub struct LikelihoodRatioFit {
    /// Ratios estimated over the pooled sample.
    pub pooled_ratios: IndexMap<String, f64>,
    /// Ratios estimated within paper groups.
    pub within_group_ratios: IndexMap<String, f64>,
    /// Fraction of documents in which each token appears.
    pub document_frequencies: IndexMap<String, f64>,
    /// Fraction of paper groups in which each token appears.
    pub group_frequencies: IndexMap<String, f64>,
}

#[derive(Debug, Clone, Serialize)]
pub enum FittedModel {
    Ols(OlsFit),
    Regularized(RegularizedFit),
    LikelihoodRatio(LikelihoodRatioFit),
}

impl FittedModel {
    pub fn kind(&self) -> ModelKind {
        match self {
            Self::Ols(_) => ModelKind::Ols,
            Self::Regularized(_) => ModelKind::Regularized,
            Self::LikelihoodRatio(_) => ModelKind::LikelihoodRatio,
        }
    }

    /// The headline statistic table of the fit, uniform across kinds.
    pub fn results_table(&self) -> &IndexMap<String, f64> {
        match self {
            Self::Ols(fit) => &fit.coefficients,
            Self::Regularized(fit) => &fit.coefficients,
            Self::LikelihoodRatio(fit) => &fit.pooled_ratios,
        }
    }
}

impl RegularizedFit {
    /// The `k` largest and `k` smallest nonzero coefficients, each paired
    /// with its token, largest-magnitude first on both sides.
    pub fn top_bottom_coefficients(
        &self,
        k: usize,
    ) -> Result<(Vec<(String, f64)>, Vec<(String, f64)>)> {
        if self.coefficients.len() < k * 2 {
            return Err(Error::InsufficientCoefficients {
                requested: k,
                available: self.coefficients.len(),
            });
        }
        let mut sorted: Vec<(String, f64)> = self
            .coefficients
            .iter()
            .map(|(token, value)| (token.clone(), *value))
            .collect();
        sorted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let top: Vec<(String, f64)> = sorted
            .iter()
            .take(k)
            .filter(|(_, value)| *value != 0.0)
            .cloned()
            .collect();
        let bottom: Vec<(String, f64)> = sorted
            .iter()
            .rev()
            .take(k)
            .filter(|(_, value)| *value != 0.0)
            .cloned()
            .collect();
        Ok((top, bottom))
    }
}
