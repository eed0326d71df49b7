//! `mi env` - manage the environments stored in the configuration file

use crate::config::Config;
use anyhow::Result;
use std::io::Write;
use std::path::Path;

/// Add or replace an environment and persist it
pub fn add(path: &Path, name: &str, url: &str, insecure: bool, out: &mut impl Write) -> Result<()> {
    let mut config = Config::load(path)?;
    let replaced = config.environments.contains_key(name);
    config.add_environment(name, url, insecure)?;
    config.save(path)?;

    if replaced {
        writeln!(out, "Updated environment '{}'", name)?;
    } else {
        writeln!(out, "Added environment '{}'", name)?;
    }
    Ok(())
}

/// Remove an environment and persist the change
pub fn remove(path: &Path, name: &str, out: &mut impl Write) -> Result<()> {
    let mut config = Config::load(path)?;
    config.remove_environment(name)?;
    config.save(path)?;

    writeln!(out, "Removed environment '{}'", name)?;
    Ok(())
}

/// Print configured environments, one per line
pub fn list(path: &Path, out: &mut impl Write) -> Result<()> {
    let config = Config::load(path)?;

    if config.environments.is_empty() {
        writeln!(out, "No environments configured")?;
        return Ok(());
    }

    writeln!(out, "NAME\tURL")?;
    for (name, env) in &config.environments {
        let note = if env.insecure { "\t(insecure)" } else { "" };
        writeln!(out, "{}\t{}{}", name, env.url, note)?;
    }
    Ok(())
}
