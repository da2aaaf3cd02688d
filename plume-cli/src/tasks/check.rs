use std::path::Path;

use anyhow::{Context, Result};
use clap::{ArgMatches, Command};
use plume_core::{SiteConfig, filters};

use crate::config::PlumeConfig;
use crate::tasks::add_common_args;

pub fn make_subcommand() -> Command {
    add_common_args(Command::new("check"))
        .about("Validate the configuration and theme templates without building")
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    let config = PlumeConfig::load(args)?;

    let site = SiteConfig::read(&config.tasks.config)
        .with_context(|| format!("invalid site configuration in {}", config.tasks.config))?;

    let publish = site.publish_profile();
    if publish.site.url.is_empty() {
        log::warn!("publish profile has no canonical site URL");
    }
    println!(
        "config ok: {} plugins, {} markdown extensions",
        site.plugins.len(),
        site.markdown.extensions.len()
    );

    let theme = Path::new(&site.theme.dir);
    if !theme.is_dir() {
        log::warn!(
            "theme directory {} does not exist, skipping template check",
            theme.display()
        );
        return Ok(());
    }

    let tera = filters::theme_templates(theme)
        .with_context(|| format!("theme templates in {} failed to compile", theme.display()))?;
    println!("theme ok: {} templates", tera.get_template_names().count());

    Ok(())
}
