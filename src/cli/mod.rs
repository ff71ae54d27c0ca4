//! Command-line interface wiring for refscope.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Settings;

pub mod build;
pub mod describe;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "Peer-review text dataset builder", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Build(args) => build::run(args, settings),
            Commands::Describe(args) => describe::run(args, settings),
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Assemble the report-level dataset and persist it with its vocabulary.
    Build(build::Args),
    /// Write numeric corpus summaries for the assembled dataset.
    Describe(describe::Args),
}
