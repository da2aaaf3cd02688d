use anyhow::Result;
use clap::ArgMatches;
use config::{Config as ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete runtime configuration: task-runner settings plus the site
/// record handed to the generator (from plume-core)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlumeConfig {
    /// Task-runner configuration
    pub tasks: TaskConfig,
    /// Site configuration (from plume-core)
    #[serde(flatten)]
    pub site: plume_core::SiteConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TaskConfig {
    /// Configuration file path
    pub config: String,
    /// Output directory the generator writes into
    pub output: String,
    /// Static-site generator binary
    pub generator: String,
    /// Work directory for materialized per-profile config files
    pub work_dir: String,
    /// Host for the preview server
    pub host: String,
    /// Port for the preview server
    pub port: u16,
    /// Open browser automatically
    pub open: bool,
    /// rsync publishing target
    pub rsync: RsyncConfig,
    /// GitHub Pages publishing target
    pub github: GithubConfig,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            config: "./plume.toml".to_string(),
            output: "./output".to_string(),
            generator: "pelican".to_string(),
            work_dir: "./.plume".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8000,
            open: false,
            rsync: RsyncConfig::default(),
            github: GithubConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RsyncConfig {
    /// Remote destination, e.g. `deploy@example.com:/var/www/blog`
    pub destination: String,
    /// Patterns excluded from the mirror
    pub excludes: Vec<String>,
}

impl Default for RsyncConfig {
    fn default() -> Self {
        Self {
            destination: String::new(),
            excludes: vec![".DS_Store".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GithubConfig {
    /// Remote pages repository, e.g. `git@github.com:user/user.github.io.git`
    pub repo: String,
    /// Local branch ghp-import writes
    pub branch: String,
    /// Branch the pages remote serves from
    pub remote_branch: String,
    /// Custom domain written as CNAME
    pub domain: String,
    /// Commit message template; `{date}` expands to today's date
    pub commit_message: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            repo: String::new(),
            branch: "gh-pages".to_string(),
            remote_branch: "master".to_string(),
            domain: String::new(),
            commit_message: "Publish site on {date}".to_string(),
        }
    }
}

impl Default for PlumeConfig {
    fn default() -> Self {
        Self {
            tasks: TaskConfig::default(),
            site: plume_core::SiteConfig::default(),
        }
    }
}

impl PlumeConfig {
    /// Load configuration with cascading precedence:
    /// 1. CLI arguments (highest priority)
    /// 2. Environment variables (PLUME_*)
    /// 3. Configuration file
    /// 4. Defaults (lowest priority)
    pub fn load(args: &ArgMatches) -> Result<Self> {
        let config_file = args
            .get_one::<String>("config")
            .cloned()
            .unwrap_or_else(|| "./plume.toml".to_string());

        let mut builder = ConfigBuilder::builder();

        // 1. Start with defaults
        let defaults = Self::default();
        builder = builder.add_source(config::Config::try_from(&defaults)?);

        // 2. Add configuration file if it exists
        if Path::new(&config_file).exists() {
            builder = builder.add_source(File::with_name(&config_file.replace(".toml", "")));
        }

        // 3. Add environment variables with PLUME_ prefix
        builder = builder.add_source(
            Environment::with_prefix("PLUME")
                .prefix_separator("_")
                .separator("__"), // Use double underscore for nested keys
        );

        // 4. Override with CLI arguments (highest priority)
        let mut cli_overrides = std::collections::HashMap::new();

        cli_overrides.insert("tasks.config".to_string(), config_file);
        if let Some(output) = args.get_one::<String>("output") {
            cli_overrides.insert("tasks.output".to_string(), output.clone());
        }
        if let Some(generator) = args.get_one::<String>("generator") {
            cli_overrides.insert("tasks.generator".to_string(), generator.clone());
        }
        // Only override with CLI args that are actually defined for this command
        if let Some(host) = args.try_get_one::<String>("host").unwrap_or(None) {
            cli_overrides.insert("tasks.host".to_string(), host.clone());
        }
        if let Some(port) = args.try_get_one::<String>("port").unwrap_or(None) {
            cli_overrides.insert("tasks.port".to_string(), port.clone());
        }
        if args
            .try_get_one::<bool>("open")
            .unwrap_or(None)
            .copied()
            .unwrap_or(false)
        {
            cli_overrides.insert("tasks.open".to_string(), "true".to_string());
        }

        if !cli_overrides.is_empty() {
            builder = builder.add_source(config::Config::try_from(&cli_overrides)?);
        }

        // Build and deserialize
        let config = builder.build()?;
        let plume_config: PlumeConfig = config.try_deserialize()?;

        Ok(plume_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{Arg, Command};
    use std::io::Write;

    fn test_command() -> Command {
        Command::new("test")
            .arg(Arg::new("config").long("config").value_name("FILE"))
            .arg(Arg::new("output").long("output").value_name("DIR"))
            .arg(Arg::new("generator").long("generator").value_name("BIN"))
    }

    #[test]
    fn test_default_config() {
        let config = PlumeConfig::default();
        assert_eq!(config.tasks.output, "./output");
        assert_eq!(config.tasks.generator, "pelican");
        assert_eq!(config.tasks.port, 8000);
        assert_eq!(config.tasks.github.branch, "gh-pages");
        assert_eq!(config.tasks.rsync.excludes, vec![".DS_Store".to_string()]);
    }

    #[test]
    fn test_cli_args_override() {
        let matches = test_command()
            .try_get_matches_from(vec![
                "test",
                "--output",
                "/custom/output",
                "--generator",
                "my-generator",
            ])
            .unwrap();

        let config = PlumeConfig::load(&matches).unwrap();
        assert_eq!(config.tasks.output, "/custom/output");
        assert_eq!(config.tasks.generator, "my-generator");
        // Should still have defaults for non-overridden values
        assert_eq!(config.tasks.host, "127.0.0.1");
    }

    #[test]
    fn test_file_values_survive_when_not_overridden() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plume.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"
[tasks]
output = "./rendered"
port = 9001

[site]
author = "Cristian Prieto"
"#
        )
        .unwrap();

        let matches = test_command()
            .try_get_matches_from(vec!["test", "--config", path.to_str().unwrap()])
            .unwrap();

        let config = PlumeConfig::load(&matches).unwrap();
        assert_eq!(config.tasks.output, "./rendered");
        assert_eq!(config.tasks.port, 9001);
        assert_eq!(config.site.site.author, "Cristian Prieto");
        // Untouched keys keep their defaults
        assert_eq!(config.tasks.generator, "pelican");
    }
}
