use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::{ArgMatches, Command};

use crate::config::PlumeConfig;
use crate::tasks::add_common_args;

pub fn make_subcommand() -> Command {
    add_common_args(Command::new("clean")).about("Remove generated output")
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    let config = PlumeConfig::load(args)?;

    clean_output(Path::new(&config.tasks.output))
}

/// Remove and recreate the output directory. A missing directory is not
/// an error; the step is logged and skipped.
pub(crate) fn clean_output(output: &Path) -> Result<()> {
    if !output.is_dir() {
        log::info!("nothing to clean, {} does not exist", output.display());
        return Ok(());
    }

    fs::remove_dir_all(output)
        .with_context(|| format!("failed to remove {}", output.display()))?;
    fs::create_dir_all(output)
        .with_context(|| format!("failed to recreate {}", output.display()))?;

    println!("Cleaned {}", output.display());

    Ok(())
}
