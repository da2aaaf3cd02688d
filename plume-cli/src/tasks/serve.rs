use std::path::PathBuf;

use anyhow::Result;
use clap::{Arg, ArgMatches, Command};
use plume_dev_server::{PreviewConfig, PreviewServer};

use crate::config::PlumeConfig;
use crate::tasks::{add_common_args, regenerate};

fn add_serve_args(command: Command) -> Command {
    add_common_args(command)
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Port to serve on [default: 8000]"),
        )
        .arg(
            Arg::new("host")
                .long("host")
                .value_name("HOST")
                .help("Host to bind to [default: 127.0.0.1]"),
        )
        .arg(
            Arg::new("open")
                .long("open")
                .help("Open browser automatically")
                .action(clap::ArgAction::SetTrue),
        )
}

pub fn make_subcommand() -> Command {
    add_serve_args(Command::new("serve")).about("Serve the generated output directory")
}

pub fn make_reserve_subcommand() -> Command {
    add_serve_args(Command::new("reserve"))
        .about("Build, then serve while watching for changes")
}

pub async fn execute(args: &ArgMatches) -> Result<()> {
    let config = PlumeConfig::load(args)?;

    server_for(&config).run().await
}

/// `build`, then the preview server and the watch loop side by side.
pub async fn execute_reserve(args: &ArgMatches) -> Result<()> {
    let config = PlumeConfig::load(args)?;

    crate::tasks::build::build(&config)?;

    let server = server_for(&config);
    let watcher_config = config.clone();

    race(
        tokio::spawn(async move { server.run().await }),
        tokio::task::spawn_blocking(move || regenerate::watch_loop(&watcher_config)),
    )
    .await
}

/// Whichever side finishes first decides the task. Both sides normally
/// block until interrupt, so the first to return has failed (a port
/// already bound, a dead watcher) and its error must abort the task
/// instead of leaving the other side running alone.
async fn race(
    server: tokio::task::JoinHandle<Result<()>>,
    watcher: tokio::task::JoinHandle<Result<()>>,
) -> Result<()> {
    tokio::select! {
        res = server => res?,
        res = watcher => res?,
    }
}

fn server_for(config: &PlumeConfig) -> PreviewServer {
    PreviewServer::new(PreviewConfig {
        host: config.tasks.host.clone(),
        port: config.tasks.port,
        root: PathBuf::from(&config.tasks.output),
        open: config.tasks.open,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_race_surfaces_server_error_while_watcher_blocks() {
        // The watcher side sits on a channel like the real watch loop does
        let (tx, rx) = std::sync::mpsc::channel::<()>();

        let err = race(
            tokio::spawn(async { Err(anyhow::anyhow!("address already in use")) }),
            tokio::task::spawn_blocking(move || {
                let _ = rx.recv();
                Ok(())
            }),
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("address already in use"));
        drop(tx);
    }

    #[tokio::test]
    async fn test_race_surfaces_watcher_error_while_server_blocks() {
        let err = race(
            tokio::spawn(std::future::pending::<Result<()>>()),
            tokio::task::spawn_blocking(|| Err(anyhow::anyhow!("watch failed"))),
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("watch failed"));
    }
}
