//! Initialize the configuration directory: create ~/.scriptshare, the default config, and the scripts root.
//!
//! Layout mirrors `crates/lib/config/`: `config/scripts/` → `~/.scriptshare/scripts/`. The bundled
//! `__templates` package is reserved, so it is copied along but never indexed.

use anyhow::{Context, Result};
use include_dir::{include_dir, Dir};
use std::path::{Path, PathBuf};

use crate::config;

static BUNDLED_SCRIPTS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/config/scripts");

/// Ensure the configuration directory has been initialized (config file and scripts root exist).
pub fn require_initialized(config_path: &Path, config: &config::Config) -> Result<()> {
    if !config_path.exists() {
        anyhow::bail!(
            "configuration not initialized; run `scriptshare init` first (config file not found: {})",
            config_path.display()
        );
    }
    let scripts_dir = config::resolve_scripts_dir(config, config_path);
    if !scripts_dir.is_dir() {
        anyhow::bail!(
            "configuration not initialized; run `scriptshare init` first (scripts directory not found: {})",
            scripts_dir.display()
        );
    }
    Ok(())
}

/// Create the config directory and default files if they do not exist.
/// - Creates the config directory (parent of config file path).
/// - Writes `config.json` with `{}` if missing.
/// - Creates the `scripts` subdirectory and extracts the bundled templates into it if it does not exist.
pub fn init_config_dir(config_path: &Path) -> Result<PathBuf> {
    let config_dir = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(config_dir)
        .with_context(|| format!("creating config directory {}", config_dir.display()))?;

    if !config_path.exists() {
        std::fs::write(config_path, b"{}")
            .with_context(|| format!("writing default config to {}", config_path.display()))?;
        log::info!("created default config at {}", config_path.display());
    }

    let scripts_dir = config::scripts_dir(config_path);
    if !scripts_dir.exists() {
        std::fs::create_dir_all(&scripts_dir)
            .with_context(|| format!("creating scripts directory {}", scripts_dir.display()))?;
        if let Err(e) = BUNDLED_SCRIPTS.extract(&scripts_dir) {
            anyhow::bail!(
                "extracting bundled templates to {}: {}",
                scripts_dir.display(),
                e
            );
        }
        log::info!("extracted bundled templates to {}", scripts_dir.display());
    } else {
        log::debug!("scripts directory already exists at {}, skipping", scripts_dir.display());
    }

    Ok(config_dir.to_path_buf())
}
