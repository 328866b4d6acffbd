use std::path::{Path, PathBuf};

use anyhow::Context;
use cargo_bridge_core::api::Project;
use serde::Deserialize;

const MANIFEST: &str = "Cargo.toml";

#[derive(Debug, Deserialize)]
struct Manifest {
    package: Option<Package>,
}

#[derive(Debug, Deserialize)]
struct Package {
    name: String,
}

/// Finds the nearest directory at or above `start` holding a `Cargo.toml`
/// and names the project after its package, or after the directory for a
/// virtual workspace manifest.
pub fn discover(start: &Path) -> anyhow::Result<Project> {
    let start = start
        .canonicalize()
        .with_context(|| format!("cannot access {}", start.display()))?;
    let root = start
        .ancestors()
        .find(|dir| dir.join(MANIFEST).is_file())
        .map(Path::to_path_buf)
        .with_context(|| format!("no {MANIFEST} found in {} or its parents", start.display()))?;

    let name = package_name(&root.join(MANIFEST))?.unwrap_or_else(|| dir_name(&root));
    tracing::debug!(project = %name, root = %root.display(), "project discovered");
    Ok(Project::new(name, root))
}

fn package_name(manifest: &Path) -> anyhow::Result<Option<String>> {
    let text = std::fs::read_to_string(manifest)
        .with_context(|| format!("failed to read {}", manifest.display()))?;
    let parsed: Manifest = toml::from_str(&text)
        .with_context(|| format!("failed to parse {}", manifest.display()))?;
    Ok(parsed.package.map(|p| p.name))
}

fn dir_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| PathBuf::from(root).display().to_string())
}
