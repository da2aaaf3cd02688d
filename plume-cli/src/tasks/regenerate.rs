use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::{ArgMatches, Command};
use notify_debouncer_mini::{DebounceEventResult, new_debouncer};
use plume_core::Profile;

use crate::config::PlumeConfig;
use crate::tasks::{add_common_args, generator_for};

pub fn make_subcommand() -> Command {
    add_common_args(Command::new("regenerate"))
        .about("Rebuild the site whenever a watched file changes")
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    let config = PlumeConfig::load(args)?;

    // Initial build so the watcher starts from fresh output
    crate::tasks::build::build(&config)?;
    watch_loop(&config)
}

/// Block indefinitely, rebuilding after each debounced batch of changes
/// under the content path, theme directory or config file. Triggers never
/// overlap: the rebuild runs synchronously inside the receive loop.
pub(crate) fn watch_loop(config: &PlumeConfig) -> Result<()> {
    let (tx, rx) = mpsc::channel();

    let mut debouncer = new_debouncer(
        Duration::from_millis(500),
        move |res: DebounceEventResult| {
            if let Ok(events) = res {
                for event in events {
                    let _ = tx.send(event.path);
                }
            }
        },
    )?;

    let targets = watch_targets(config);
    if targets.is_empty() {
        bail!("nothing to watch: no content directory, theme directory or config file found");
    }
    for (path, mode) in &targets {
        debouncer.watcher().watch(path, *mode)?;
        println!("Watching {}", path.display());
    }

    println!("Waiting for changes (Ctrl-C to stop)...");

    let generator = generator_for(config);
    while let Ok(changed) = rx.recv() {
        log::info!("change detected: {}", changed.display());
        // Fold the rest of the batch into this rebuild
        while rx.try_recv().is_ok() {}

        match generator.build(&config.site, Profile::Development, false) {
            Ok(()) => println!("Site rebuilt"),
            Err(e) => log::error!("rebuild failed: {}", e),
        }
    }

    Ok(())
}

/// The paths a rebuild should be triggered from. Missing paths are
/// logged and skipped rather than treated as errors.
pub(crate) fn watch_targets(config: &PlumeConfig) -> Vec<(PathBuf, notify::RecursiveMode)> {
    let mut targets = Vec::new();

    let content = PathBuf::from(&config.site.content.path);
    if content.exists() {
        targets.push((content, notify::RecursiveMode::Recursive));
    } else {
        log::warn!(
            "content directory {} does not exist, not watching it",
            content.display()
        );
    }

    let theme = PathBuf::from(&config.site.theme.dir);
    if theme.exists() {
        targets.push((theme, notify::RecursiveMode::Recursive));
    }

    let config_file = PathBuf::from(&config.tasks.config);
    if config_file.exists() {
        targets.push((config_file, notify::RecursiveMode::NonRecursive));
    }

    targets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_under(dir: &std::path::Path) -> PlumeConfig {
        let mut config = PlumeConfig::default();
        config.site.content.path = dir.join("content").display().to_string();
        config.site.theme.dir = dir.join("theme").display().to_string();
        config.tasks.config = dir.join("plume.toml").display().to_string();

        config
    }

    #[test]
    fn test_watch_targets_empty_when_nothing_exists() {
        let dir = tempfile::tempdir().unwrap();

        assert!(watch_targets(&config_under(dir.path())).is_empty());
    }

    #[test]
    fn test_watch_targets_skips_missing_paths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("content")).unwrap();
        std::fs::write(dir.path().join("plume.toml"), "").unwrap();

        let targets = watch_targets(&config_under(dir.path()));

        assert_eq!(targets.len(), 2);
        assert!(targets[0].0.ends_with("content"));
        assert_eq!(targets[0].1, notify::RecursiveMode::Recursive);
        assert!(targets[1].0.ends_with("plume.toml"));
        assert_eq!(targets[1].1, notify::RecursiveMode::NonRecursive);
    }
}
