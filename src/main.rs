//! Entry point wiring CLI dispatch to pipeline modules.

use anyhow::Result;
use refscope::cli::Cli;
use refscope::config::Settings;
use refscope::logging;
use tracing::info;

fn main() -> Result<()> {
    logging::init_tracing()?;
    let settings = Settings::load()?;
    let cli = Cli::parse();

    info!(?cli, "starting command");
    cli.dispatch(settings)
}
