//! Startup preconditions: root privileges and a writable log directory.

use crate::error::{Result, SetupError};
use crate::host::Host;
use std::fs;
use std::path::{Path, PathBuf};

/// Fail fast unless running as root with a writable log directory
pub async fn check(host: &dyn Host, log_file: &Path) -> Result<()> {
    let uid = host.effective_uid().await?;
    if uid != 0 {
        return Err(SetupError::NotPrivileged(uid));
    }
    ensure_writable_dir(&log_dir(log_file))
}

fn log_dir(log_file: &Path) -> PathBuf {
    match log_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn ensure_writable_dir(dir: &Path) -> Result<()> {
    let not_writable = || SetupError::LogPathNotWritable(dir.to_path_buf());
    if !dir.is_dir() {
        return Err(not_writable());
    }

    let probe = dir.join(format!(".hyperlane-setup-probe-{}", std::process::id()));
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&probe)
        .map_err(|_| not_writable())?;
    fs::remove_file(&probe)?;
    Ok(())
}
