use anyhow::Result;
use clap::{ArgMatches, Command};
use plume_core::Profile;

use crate::config::PlumeConfig;
use crate::tasks::{add_common_args, generator_for};

pub fn make_subcommand() -> Command {
    add_common_args(Command::new("preview")).about("Build the production version of the site")
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    let config = PlumeConfig::load(args)?;

    build(&config)
}

/// A production build: the publish overlay applied, stale output deleted.
pub(crate) fn build(config: &PlumeConfig) -> Result<()> {
    generator_for(config).build(&config.site, Profile::Publish, true)?;
    println!("Production site built in {}", config.tasks.output);

    Ok(())
}
