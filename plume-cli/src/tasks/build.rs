use std::path::Path;

use anyhow::Result;
use clap::{ArgMatches, Command};
use plume_core::Profile;

use crate::config::PlumeConfig;
use crate::tasks::{add_common_args, clean, generator_for};

pub fn make_subcommand() -> Command {
    add_common_args(Command::new("build")).about("Build the local version of the site")
}

pub fn make_rebuild_subcommand() -> Command {
    add_common_args(Command::new("rebuild")).about("Clean, then build")
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    let config = PlumeConfig::load(args)?;

    build(&config)
}

/// `clean` then `build`, as one task.
pub fn execute_rebuild(args: &ArgMatches) -> Result<()> {
    let config = PlumeConfig::load(args)?;

    clean::clean_output(Path::new(&config.tasks.output))?;
    build(&config)
}

pub(crate) fn build(config: &PlumeConfig) -> Result<()> {
    generator_for(config).build(&config.site, Profile::Development, false)?;
    println!("Site built in {}", config.tasks.output);

    Ok(())
}
