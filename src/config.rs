//! Runtime configuration utilities for refscope.

use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::Context;

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Root folder holding the report and paper corpora.
    pub data_dir: PathBuf,
    /// Root folder for analytic outputs.
    pub outputs_dir: PathBuf,
    /// Seed driving every stochastic operation (balancing, resampling).
    pub seed: u64,
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));
        let outputs_dir = env::var("OUTPUTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./outputs"));
        let seed = env::var("REFSCOPE_SEED")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(42);

        std::fs::create_dir_all(&data_dir).context("creating data dir")?;
        std::fs::create_dir_all(&outputs_dir).context("creating outputs dir")?;

        Ok(Self {
            data_dir,
            outputs_dir,
            seed,
        })
    }

    /// Convenience helper for derived data path segments.
    pub fn join_data<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.data_dir.join(path)
    }

    /// Convenience helper for derived output path segments.
    pub fn join_output<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.outputs_dir.join(path)
    }
}
