use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};

/// Whether `dir` is itself a git checkout (worktree or submodule).
pub fn is_repo(dir: &Path) -> bool {
    dir.join(".git").exists()
}

/// Whether `dir` is embedded as a submodule. A submodule checkout carries
/// a `.git` gitlink file instead of a `.git` directory.
pub fn is_submodule(dir: &Path) -> bool {
    dir.join(".git").is_file()
}

/// Whether `dir` sits anywhere inside a git working tree, not just at
/// its root the way [`is_repo`] checks.
pub fn in_work_tree(dir: &Path) -> bool {
    Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(["rev-parse", "--is-inside-work-tree"])
        .output()
        .map(|out| out.status.success() && String::from_utf8_lossy(&out.stdout).trim() == "true")
        .unwrap_or(false)
}

/// Whether the working tree at `dir` has uncommitted changes.
pub fn is_dirty(dir: &Path) -> Result<bool> {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(["status", "--porcelain"])
        .output()
        .context("failed to launch `git` (is it installed?)")?;

    if !output.status.success() {
        bail!(
            "`git status` failed in {}: {}",
            dir.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok(has_changes(&String::from_utf8_lossy(&output.stdout)))
}

/// Sync a submodule checkout to the revision pinned by the superproject.
pub fn update_submodule(dir: &Path) -> Result<()> {
    let path = dir.to_string_lossy().into_owned();
    crate::process::run("git", &["submodule", "update", "--init", "--", &path])
}

fn has_changes(porcelain: &str) -> bool {
    porcelain.lines().any(|line| !line.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_changes() {
        assert!(!has_changes(""));
        assert!(!has_changes("\n"));
        assert!(has_changes(" M plume.toml\n?? content/draft.md\n"));
    }

    #[test]
    fn test_plain_directory_is_not_a_repo() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!is_repo(dir.path()));
        assert!(!is_submodule(dir.path()));
    }

    #[test]
    fn test_submodule_detection() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".git"), "gitdir: ../.git/modules/output\n").unwrap();

        assert!(is_repo(dir.path()));
        assert!(is_submodule(dir.path()));
    }

    #[test]
    fn test_in_work_tree_from_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("content/posts");
        std::fs::create_dir_all(&nested).unwrap();
        assert!(!in_work_tree(&nested));

        std::process::Command::new("git")
            .arg("-C")
            .arg(dir.path())
            .arg("init")
            .output()
            .unwrap();

        assert!(in_work_tree(&nested));
        // A subdirectory is inside the tree without holding .git itself
        assert!(!is_repo(&nested));
    }

    #[test]
    fn test_worktree_detection() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();

        assert!(is_repo(dir.path()));
        assert!(!is_submodule(dir.path()));
    }
}
