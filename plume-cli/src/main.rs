use anyhow::Result;
use clap::Command;

mod config;
mod git;
mod process;
mod tasks;

fn cli() -> Command {
    Command::new("plume")
        .about("Build, preview and publish a generator-backed static blog")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(tasks::clean::make_subcommand())
        .subcommand(tasks::build::make_subcommand())
        .subcommand(tasks::build::make_rebuild_subcommand())
        .subcommand(tasks::regenerate::make_subcommand())
        .subcommand(tasks::serve::make_subcommand())
        .subcommand(tasks::serve::make_reserve_subcommand())
        .subcommand(tasks::preview::make_subcommand())
        .subcommand(tasks::publish::make_subcommand())
        .subcommand(tasks::gh_pages::make_subcommand())
        .subcommand(tasks::check::make_subcommand())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = cli().get_matches();

    match matches.subcommand() {
        Some(("clean", args)) => tasks::clean::execute(args),
        Some(("build", args)) => tasks::build::execute(args),
        Some(("rebuild", args)) => tasks::build::execute_rebuild(args),
        Some(("regenerate", args)) => tasks::regenerate::execute(args),
        Some(("serve", args)) => tasks::serve::execute(args).await,
        Some(("reserve", args)) => tasks::serve::execute_reserve(args).await,
        Some(("preview", args)) => tasks::preview::execute(args),
        Some(("publish", args)) => tasks::publish::execute(args),
        Some(("gh-pages", args)) => tasks::gh_pages::execute(args),
        Some(("check", args)) => tasks::check::execute(args),
        _ => unreachable!("subcommand required"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        cli().debug_assert();
    }
}
