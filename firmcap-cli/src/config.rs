use anyhow::{Context, Result};
use firmcap_core::Assumptions;
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::ensure_firmcap_home;

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_firmcap_home()?.join("assumptions.toml"))
}

/// Load assumptions from `path`, or the default location. Missing file means defaults.
pub fn load_assumptions(path: Option<&Path>) -> Result<Assumptions> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };
    if !p.exists() {
        log::debug!("no assumptions at {}, using defaults", p.display());
        return Ok(Assumptions::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    let assumptions = parse_assumptions(&s).with_context(|| format!("load {}", p.display()))?;
    Ok(assumptions)
}

pub fn parse_assumptions(s: &str) -> Result<Assumptions> {
    let assumptions: Assumptions = toml::from_str(s).context("parse assumptions.toml")?;
    assumptions.validate()?;
    Ok(assumptions)
}

pub fn save_assumptions(path: &Path, a: &Assumptions) -> Result<()> {
    let s = toml::to_string_pretty(a).context("serialize assumptions")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_assumptions(&p, &Assumptions::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}
