//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.scriptshare/config.json`) and environment.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::scripts::Program;

/// Program used when neither the environment nor the config names one.
pub const DEFAULT_PROGRAM: &str = "maya";

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Scripts root and default program.
    #[serde(default)]
    pub scripts: ScriptsConfig,
}

/// Where shared script packages live and which descriptor variant to read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptsConfig {
    /// Override the scripts root. Relative paths are resolved against the config file's parent. Omit to use the `scripts` subdirectory of the config directory.
    #[serde(default)]
    pub directory: Option<PathBuf>,
    /// Program whose descriptors are read (e.g. "maya"). Overridden by SCRIPTSHARE_PROGRAM env.
    #[serde(default)]
    pub program: Option<String>,
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("SCRIPTSHARE_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(".scriptshare").join("config.json"))
                .unwrap_or_else(|| PathBuf::from("config.json"))
        })
}

/// Load config from the given path, or the default path (or SCRIPTSHARE_CONFIG_PATH). Missing file => default config.
/// Returns the config and the path that was used (for resolving the config directory).
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    Ok((config, path))
}

fn config_parent(config_path: &Path) -> &Path {
    config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

/// Default scripts root when no override is set: `scripts` subdirectory of the config file's parent.
pub fn scripts_dir(config_path: &Path) -> PathBuf {
    config_parent(config_path).join("scripts")
}

/// Resolve the scripts root: `config.scripts.directory` if set (relative paths resolved against the config file's parent), otherwise the default.
pub fn resolve_scripts_dir(config: &Config, config_path: &Path) -> PathBuf {
    match &config.scripts.directory {
        Some(d) if !d.as_os_str().is_empty() => {
            if d.is_absolute() {
                d.clone()
            } else {
                config_parent(config_path).join(d)
            }
        }
        _ => scripts_dir(config_path),
    }
}

/// Resolve the program: env SCRIPTSHARE_PROGRAM overrides config, which overrides [`DEFAULT_PROGRAM`].
pub fn resolve_program(config: &Config) -> Program {
    std::env::var("SCRIPTSHARE_PROGRAM")
        .ok()
        .and_then(Program::new)
        .or_else(|| config.scripts.program.clone().and_then(Program::new))
        .unwrap_or_else(|| Program::from_static(DEFAULT_PROGRAM))
}
