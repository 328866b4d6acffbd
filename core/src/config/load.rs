use std::path::{Path, PathBuf};

use crate::error::ConfigError;

use super::types::AppConfig;

pub const CONFIG_FILE_NAME: &str = "cargo-bridge.toml";

/// Loads `cargo-bridge.toml` from the working directory, falling back to the
/// user config directory and then to defaults, then applies `CARGO_BRIDGE_*`
/// environment overrides.
pub fn load_default() -> Result<AppConfig, ConfigError> {
    let mut cfg = match candidate_paths().into_iter().find(|p| p.is_file()) {
        Some(path) => load_from_path(&path)?,
        None => AppConfig::default(),
    };
    apply_env_overrides(&mut cfg, |key| std::env::var(key).ok())?;
    Ok(cfg)
}

pub fn load_from_path(path: &Path) -> Result<AppConfig, ConfigError> {
    let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let cfg = toml::from_str::<AppConfig>(&s).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(cfg)
}

fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("cargo-bridge").join("config.toml"));
    }
    paths
}

fn apply_env_overrides<F>(cfg: &mut AppConfig, var: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = non_empty("CARGO_BRIDGE_LOG") {
        cfg.logging.level = v;
    }
    if let Some(v) = non_empty("CARGO_BRIDGE_LOG_FILE") {
        cfg.logging.file = Some(v);
    }
    if let Some(v) = non_empty("CARGO_BRIDGE_OUTPUT_FORMAT") {
        cfg.output.format = v.parse()?;
    }
    Ok(())
}
