use std::path::Path;

use anyhow::{Result, bail};
use clap::{ArgMatches, Command};

use crate::config::PlumeConfig;
use crate::process;
use crate::tasks::{add_common_args, preview};

pub fn make_subcommand() -> Command {
    add_common_args(Command::new("publish"))
        .about("Build the production site and rsync it to the remote host")
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    let config = PlumeConfig::load(args)?;

    if config.tasks.rsync.destination.is_empty() {
        bail!("no rsync destination configured (set [tasks.rsync] destination in plume.toml)");
    }

    preview::build(&config)?;

    let rsync = rsync_args(
        Path::new(&config.tasks.output),
        &config.tasks.rsync.destination,
        &config.tasks.rsync.excludes,
    );
    process::run("rsync", &rsync)?;

    println!("Published to {}", config.tasks.rsync.destination);

    Ok(())
}

/// Mirror the output directory to the remote: checksum-based comparison,
/// deleting remote files no longer present locally.
pub(crate) fn rsync_args(output: &Path, destination: &str, excludes: &[String]) -> Vec<String> {
    // rsync treats `output` and `output/` differently; a trailing slash
    // syncs the directory's contents rather than the directory itself
    let mut source = output.to_string_lossy().trim_end_matches('/').to_string();
    source.push('/');

    let mut args = vec!["--delete".to_string()];
    for pattern in excludes {
        args.push("--exclude".to_string());
        args.push(pattern.clone());
    }
    args.push("-pthrvz".to_string());
    args.push("-c".to_string());
    args.push(source);
    args.push(destination.to_string());

    args
}
