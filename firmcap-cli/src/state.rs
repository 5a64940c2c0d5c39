use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `$FIRMCAP_HOME`, or `~/.firmcap`.
pub fn firmcap_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("FIRMCAP_HOME") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".firmcap"))
}

pub fn ensure_firmcap_home() -> Result<PathBuf> {
    let dir = firmcap_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}
