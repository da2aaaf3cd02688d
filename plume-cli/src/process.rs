use std::ffi::OsStr;
use std::process::Command;

use anyhow::{Context, Result, bail};

/// Run an external tool to completion, inheriting stdio so its own
/// output and errors reach the operator verbatim. A non-zero exit
/// aborts the current task.
pub fn run<S: AsRef<OsStr>>(program: &str, args: &[S]) -> Result<()> {
    log::debug!("running: {} {}", program, display_args(args));

    let status = Command::new(program)
        .args(args)
        .status()
        .with_context(|| format!("failed to launch `{}` (is it installed?)", program))?;

    if !status.success() {
        bail!("`{}` exited with {}", program, status);
    }

    Ok(())
}

fn display_args<S: AsRef<OsStr>>(args: &[S]) -> String {
    args.iter()
        .map(|a| a.as_ref().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}
