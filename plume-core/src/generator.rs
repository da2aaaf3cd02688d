use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;

use crate::config::{Profile, SiteConfig};

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("failed to write effective config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize effective config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("failed to launch `{program}`: {source}")]
    Launch {
        program: String,
        source: std::io::Error,
    },
    #[error("`{program}` exited with {status}")]
    Failed { program: String, status: ExitStatus },
}

/// Handle on the external static-site generator binary.
///
/// The contract is narrow: the generator takes a configuration-file path
/// via `-s` and an optional `-d` flag to delete stale output before
/// building. It writes rendered files under the configured output
/// directory or exits non-zero; its stdout/stderr are inherited so its
/// diagnostics reach the operator verbatim.
pub struct Generator {
    program: String,
    work_dir: PathBuf,
}

impl Generator {
    /// `program` is the generator binary name or path; `work_dir` is where
    /// effective per-profile config files are materialized.
    pub fn new<P: AsRef<Path>>(program: &str, work_dir: P) -> Self {
        Self {
            program: program.to_string(),
            work_dir: work_dir.as_ref().to_path_buf(),
        }
    }

    /// Serialize the merged record for `profile` under the work directory
    /// and return its path, which is what the generator is pointed at.
    pub fn write_effective_config(
        &self,
        site: &SiteConfig,
        profile: Profile,
    ) -> Result<PathBuf, GeneratorError> {
        let merged = site.for_profile(profile);
        let rendered = toml::to_string_pretty(&merged)?;

        std::fs::create_dir_all(&self.work_dir)?;
        let path = self.work_dir.join(format!("{profile}.toml"));
        std::fs::write(&path, rendered)?;

        Ok(path)
    }

    /// Run one generator build against the given profile. `delete` asks
    /// the generator to clear stale output first.
    pub fn build(
        &self,
        site: &SiteConfig,
        profile: Profile,
        delete: bool,
    ) -> Result<(), GeneratorError> {
        let config_path = self.write_effective_config(site, profile)?;
        let args = build_args(&config_path, delete);

        log::debug!(
            "running generator: {} {}",
            self.program,
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let status = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .status()
            .map_err(|source| GeneratorError::Launch {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(GeneratorError::Failed {
                program: self.program.clone(),
                status,
            });
        }

        Ok(())
    }
}

/// Argument vector for one generator invocation.
pub fn build_args(config_path: &Path, delete: bool) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::new();
    if delete {
        args.push("-d".into());
    }
    args.push("-s".into());
    args.push(config_path.into());

    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_args() {
        let args = build_args(Path::new(".plume/development.toml"), false);
        assert_eq!(args, vec!["-s", ".plume/development.toml"]);
    }

    #[test]
    fn test_build_args_with_delete() {
        let args = build_args(Path::new(".plume/publish.toml"), true);
        assert_eq!(args, vec!["-d", "-s", ".plume/publish.toml"]);
    }

    #[test]
    fn test_effective_config_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Generator::new("generator", dir.path());

        let mut site = SiteConfig::default();
        site.site.author = "Cristian Prieto".to_string();
        site.publish = Some(crate::config::PublishOverlay {
            url: "https://example.com".to_string(),
            relative_urls: false,
            feed_all_atom: Some("atom.xml".to_string()),
            feed_category_atom: None,
            analytics: None,
        });

        let path = generator
            .write_effective_config(&site, Profile::Publish)
            .unwrap();
        assert!(path.ends_with("publish.toml"));

        let reread = SiteConfig::read(&path).unwrap();
        assert_eq!(reread.site.author, "Cristian Prieto");
        assert_eq!(reread.site.url, "https://example.com");
        assert_eq!(reread.feeds.all_atom.as_deref(), Some("atom.xml"));
        // The overlay table itself is not part of the effective config
        assert!(reread.publish.is_none());
    }

    #[test]
    fn test_development_config_has_no_feeds() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Generator::new("generator", dir.path());

        let path = generator
            .write_effective_config(&SiteConfig::default(), Profile::Development)
            .unwrap();
        let reread = SiteConfig::read(&path).unwrap();

        assert!(reread.feeds.all_atom.is_none());
        assert!(reread.analytics.is_none());
    }

    #[test]
    fn test_missing_generator_binary() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Generator::new("plume-no-such-binary", dir.path());

        let err = generator
            .build(&SiteConfig::default(), Profile::Development, false)
            .unwrap_err();
        assert!(matches!(err, GeneratorError::Launch { .. }));
    }
}
