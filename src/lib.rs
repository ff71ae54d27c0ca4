//! Report-level peer-review text dataset assembly.
//!
//! The pipeline merges referee reports with their papers, restricts and
//! balances the sample, vectorizes the cleaned text into term-frequency
//! matrices, and hands validated columns to external model collaborators.

pub mod cli;
pub mod config;
pub mod data;
pub mod dataset;
pub mod diagnostics;
pub mod error;
pub mod logging;
pub mod models;
pub mod text;

pub use dataset::{BuildConfig, Dataset};
pub use error::{Error, Result};
