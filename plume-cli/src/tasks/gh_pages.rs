use std::path::Path;

use anyhow::{Result, bail};
use clap::{ArgMatches, Command};

use crate::config::{GithubConfig, PlumeConfig};
use crate::tasks::{add_common_args, preview};
use crate::{git, process};

pub fn make_subcommand() -> Command {
    add_common_args(Command::new("gh-pages"))
        .about("Build the production site and publish it to GitHub Pages")
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    let config = PlumeConfig::load(args)?;
    let gh = &config.tasks.github;

    if gh.repo.is_empty() {
        bail!("no pages repository configured (set [tasks.github] repo in plume.toml)");
    }

    let output = Path::new(&config.tasks.output);
    if git::is_submodule(output) {
        if git::is_dirty(output)? {
            log::warn!(
                "output submodule at {} has uncommitted changes, leaving it as-is",
                output.display()
            );
        } else {
            log::info!("updating output submodule before build");
            git::update_submodule(output)?;
        }
    }

    preview::build(&config)?;

    // Publishing mirrors committed content; uncommitted edits stay local
    if git::in_work_tree(Path::new(".")) && git::is_dirty(Path::new("."))? {
        log::warn!("working tree has uncommitted changes, skipping GitHub Pages import and push");
        return Ok(());
    }

    let message = commit_message(&gh.commit_message);
    process::run("ghp-import", &import_args(output, gh, &message))?;
    process::run("git", &push_args(gh))?;

    println!("Published to {}", gh.repo);

    Ok(())
}

fn commit_message(template: &str) -> String {
    template.replace("{date}", &chrono::Local::now().date_naive().to_string())
}

pub(crate) fn import_args(output: &Path, gh: &GithubConfig, message: &str) -> Vec<String> {
    let mut args = vec![
        output.to_string_lossy().into_owned(),
        "-b".to_string(),
        gh.branch.clone(),
        "-m".to_string(),
        message.to_string(),
    ];
    if !gh.domain.is_empty() {
        args.push("-c".to_string());
        args.push(gh.domain.clone());
    }

    args
}

pub(crate) fn push_args(gh: &GithubConfig) -> Vec<String> {
    vec![
        "push".to_string(),
        "-f".to_string(),
        gh.repo.clone(),
        format!("{}:{}", gh.branch, gh.remote_branch),
    ]
}
