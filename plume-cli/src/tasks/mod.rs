//! The named tasks an operator invokes. Each one is a strictly
//! sequential list of steps; the first failing step aborts the task and
//! partial output is left as-is for the operator to inspect.

pub mod build;
pub mod check;
pub mod clean;
pub mod gh_pages;
pub mod preview;
pub mod publish;
pub mod regenerate;
pub mod serve;

use clap::{Arg, Command};
use plume_core::Generator;

use crate::config::PlumeConfig;

/// Arguments shared by every task.
pub(crate) fn add_common_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Site configuration file [default: ./plume.toml]"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("DIR")
                .help("Generated output directory [default: ./output]"),
        )
        .arg(
            Arg::new("generator")
                .short('g')
                .long("generator")
                .value_name("BIN")
                .help("Static-site generator binary [default: pelican]"),
        )
}

pub(crate) fn generator_for(config: &PlumeConfig) -> Generator {
    Generator::new(&config.tasks.generator, &config.tasks.work_dir)
}
